//! Application model: the playback session plus the terminal-only state
//! around it (track-list cursor, follow mode, scrubber, popups).

use crate::audio::AudioHandle;
use crate::session::PlaybackSession;

/// The main application model.
pub struct App<H: AudioHandle> {
    pub session: PlaybackSession<H>,
    /// Highlighted row in the track list. Independent of the current track.
    pub cursor: usize,
    pub follow_playback: bool,
    pub metadata_window: bool,

    // Scrubber position as a fraction of the duration while a drag is active.
    scrub: Option<f64>,
}

impl<H: AudioHandle> App<H> {
    pub fn new(session: PlaybackSession<H>, follow_playback: bool) -> Self {
        let cursor = session.current_index();
        Self {
            session,
            cursor,
            follow_playback,
            metadata_window: false,
            scrub: None,
        }
    }

    fn track_count(&self) -> usize {
        self.session.album().tracks.len()
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    /// Enable following playback (cursor follows the current track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the cursor down, wrapping to the first row.
    pub fn cursor_next(&mut self) {
        let len = self.track_count();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }

    /// Move the cursor up, wrapping to the last row.
    pub fn cursor_prev(&mut self) {
        let len = self.track_count();
        if len > 0 {
            self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
        }
    }

    pub fn cursor_first(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_last(&mut self) {
        self.cursor = self.track_count().saturating_sub(1);
    }

    /// Toggle playback of the track under the cursor.
    pub fn activate(&mut self) {
        self.follow_playback_on();
        self.session.toggle_play_at(self.cursor);
    }

    /// Toggle playback of the current track, wherever the cursor is.
    pub fn toggle_current(&mut self) {
        let current = self.session.current_track().clone();
        self.session.toggle_play(&current);
    }

    pub fn next_track(&mut self) {
        self.session.next();
    }

    pub fn previous_track(&mut self) {
        self.session.previous();
    }

    /// Shift the volume by `delta`, clamped to `[0, 1]` by the session.
    pub fn nudge_volume(&mut self, delta: f64) {
        let target = self.session.volume() + delta;
        self.session.set_volume(target);
    }

    pub fn toggle_mute(&mut self) {
        self.session.toggle_mute();
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_some()
    }

    /// Scrubber position while a drag is active.
    pub fn scrub_position(&self) -> Option<f64> {
        self.scrub
    }

    /// Grab the scrubber at the current position. No-op while already dragging.
    pub fn begin_scrub(&mut self) {
        if self.scrub.is_some() {
            return;
        }
        let at = self.session.snapshot().progress().unwrap_or(0.0);
        self.session.begin_seek_drag();
        self.scrub = Some(at);
    }

    /// Move the grabbed scrubber by `seconds` and seek there.
    pub fn move_scrub(&mut self, seconds: f64) {
        let Some(at) = self.scrub else {
            return;
        };
        let duration = self.session.duration();
        let step = if duration.is_finite() && duration > 0.0 {
            seconds / duration
        } else {
            0.0
        };
        let at = (at + step).clamp(0.0, 1.0);
        self.session.seek_to(at);
        self.scrub = Some(at);
    }

    /// Release the scrubber.
    pub fn end_scrub(&mut self) {
        if self.scrub.take().is_some() {
            self.session.end_seek_drag();
        }
    }

    pub fn toggle_scrub(&mut self) {
        if self.is_scrubbing() {
            self.end_scrub();
        } else {
            self.begin_scrub();
        }
    }

    /// `H` / `L`: move the scrubber during a drag, otherwise a one-step drag.
    pub fn scrub_by(&mut self, seconds: f64) {
        if self.is_scrubbing() {
            self.move_scrub(seconds);
        } else {
            self.begin_scrub();
            self.move_scrub(seconds);
            self.end_scrub();
        }
    }

    /// Apply pending media events, then let the cursor follow the current track.
    pub fn pump(&mut self) -> usize {
        let handled = self.session.pump_events();
        if self.follow_playback {
            self.cursor = self.session.current_index();
        }
        handled
    }
}
