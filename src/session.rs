//! Playback session for one album.
//!
//! A [`PlaybackSession`] owns the selected track, the transport state, the
//! mirrored position/duration/volume, and the single [`AudioHandle`] that
//! plays the album. User intents come in as method calls; hardware reports
//! come in as [`MediaEvent`]s drained by [`PlaybackSession::pump_events`].
//! Views never read the handle, only a [`SessionSnapshot`].

mod format;

use std::sync::mpsc::{self, Receiver};

use tracing::{debug, info, warn};

use crate::audio::{
    AudioHandle, MediaEvent, PlayError, PlayStart, PlayTicket, SourceId, Subscription,
};
use crate::catalog::{Album, Track};
use crate::error::{Error, Result};

pub use format::format_time;

/// Whether audio is actively playing, paused, or stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Read-only view of a session, handed to the renderers.
#[derive(Debug, Clone, Copy)]
pub struct SessionSnapshot<'a> {
    pub album: &'a Album,
    pub current_index: usize,
    pub current_track: &'a Track,
    pub transport: TransportState,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub is_muted: bool,
    pub pre_mute_volume: f64,
    pub is_seeking: bool,
    pub play_pending: bool,
}

impl SessionSnapshot<'_> {
    /// Position as a fraction of the duration, when the duration is known.
    pub fn progress(&self) -> Option<f64> {
        if self.duration.is_finite() && self.duration > 0.0 {
            Some((self.current_time / self.duration).clamp(0.0, 1.0))
        } else {
            None
        }
    }
}

pub struct PlaybackSession<H: AudioHandle> {
    album: Album,
    // Invariant: current_track == album.tracks[current_index].
    current_index: usize,
    current_track: Track,

    transport: TransportState,
    current_time: f64,
    duration: f64,
    volume: f64,
    is_muted: bool,
    pre_mute_volume: f64,
    is_seeking: bool,

    // Events about any other source are stale.
    loaded: SourceId,

    last_ticket: PlayTicket,
    // Only a resolution for this ticket may switch the transport to Playing.
    pending_play: Option<PlayTicket>,

    handle: H,
    events: Receiver<MediaEvent>,
    subscription: Option<Subscription>,
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

impl<H: AudioHandle> PlaybackSession<H> {
    /// Start a session on `album`: subscribe to `handle`, load track 0 and
    /// apply `initial_volume`. Transport starts `Stopped`.
    pub fn start(mut album: Album, mut handle: H, initial_volume: f64) -> Result<Self> {
        album.number_tracks();
        let Some(first) = album.tracks.first().cloned() else {
            return Err(Error::EmptyAlbum(album.slug.clone()));
        };

        let (tx, rx) = mpsc::channel();
        let subscription = handle.subscribe(tx);

        let volume = clamp_unit(initial_volume);
        let loaded = SourceId::default().next();
        handle.set_source(&first.source, loaded);
        handle.set_volume(volume);
        info!(album = %album.slug, tracks = album.tracks.len(), "session started");

        Ok(Self {
            duration: first.duration.unwrap_or(f64::NAN),
            current_index: 0,
            current_track: first,
            album,
            transport: TransportState::Stopped,
            current_time: 0.0,
            volume,
            is_muted: false,
            pre_mute_volume: volume,
            is_seeking: false,
            loaded,
            last_ticket: PlayTicket::default(),
            pending_play: None,
            handle,
            events: rx,
            subscription: Some(subscription),
        })
    }

    pub fn album(&self) -> &Album {
        &self.album
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_track(&self) -> &Track {
        &self.current_track
    }

    pub fn transport(&self) -> TransportState {
        self.transport
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn pre_mute_volume(&self) -> f64 {
        self.pre_mute_volume
    }

    pub fn is_seeking(&self) -> bool {
        self.is_seeking
    }

    /// True while a play command awaits the handle's answer.
    pub fn is_play_pending(&self) -> bool {
        self.pending_play.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            album: &self.album,
            current_index: self.current_index,
            current_track: &self.current_track,
            transport: self.transport,
            current_time: self.current_time,
            duration: self.duration,
            volume: self.volume,
            is_muted: self.is_muted,
            pre_mute_volume: self.pre_mute_volume,
            is_seeking: self.is_seeking,
            play_pending: self.is_play_pending(),
        }
    }

    /// Point the selection and the handle at `track`. Playback is not started.
    ///
    /// Returns `false`, changing nothing, when `track` is not part of the album.
    pub fn select_track(&mut self, track: &Track) -> bool {
        match self.album.position_of(track) {
            Some(index) => self.select_index(index),
            None => {
                warn!(title = %track.title, "track is not part of this album; ignoring");
                false
            }
        }
    }

    /// [`PlaybackSession::select_track`] by position.
    pub fn select_index(&mut self, index: usize) -> bool {
        let Some(track) = self.album.tracks.get(index) else {
            warn!(index, "track index out of range; ignoring");
            return false;
        };
        self.loaded = self.loaded.next();
        self.handle.set_source(&track.source, self.loaded);
        self.current_index = index;
        self.current_track = track.clone();
        debug!(index, title = %track.title, "track selected");
        true
    }

    /// Pause when `track` is the one playing; otherwise select it if needed and play.
    pub fn toggle_play(&mut self, track: &Track) {
        match self.album.position_of(track) {
            Some(index) => self.toggle_play_at(index),
            None => warn!(title = %track.title, "track is not part of this album; ignoring"),
        }
    }

    /// [`PlaybackSession::toggle_play`] by position.
    pub fn toggle_play_at(&mut self, index: usize) {
        let is_current = index == self.current_index;
        if self.transport == TransportState::Playing && is_current {
            self.pause_current();
            return;
        }
        if !is_current && !self.select_index(index) {
            return;
        }
        self.play_current();
    }

    /// Ask the handle to play the selected track.
    ///
    /// The transport becomes `Playing` only once the handle confirms; a
    /// failed play leaves it untouched.
    pub fn play_current(&mut self) {
        self.last_ticket = self.last_ticket.next();
        let ticket = self.last_ticket;
        match self.handle.play(ticket) {
            PlayStart::Started => {
                self.pending_play = None;
                self.transport = TransportState::Playing;
            }
            PlayStart::Pending => self.pending_play = Some(ticket),
            PlayStart::Failed(e) => {
                debug!(error = %e, "play command failed; ignoring");
            }
        }
    }

    pub fn pause_current(&mut self) {
        self.handle.pause();
        self.pending_play = None;
        self.transport = TransportState::Paused;
    }

    /// Step back one track (clamped at the first) and play it.
    pub fn previous(&mut self) {
        self.select_index(self.current_index.saturating_sub(1));
        self.play_current();
    }

    /// Advance and play; after the last track, select the first and stop.
    pub fn next(&mut self) {
        if self.current_index + 1 < self.album.tracks.len() {
            self.select_index(self.current_index + 1);
            self.play_current();
        } else {
            self.select_index(0);
            self.pending_play = None;
            self.transport = TransportState::Stopped;
            info!(album = %self.album.slug, "end of album");
        }
    }

    /// Set the output level. Leaves the mute flag alone.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = clamp_unit(volume);
        self.volume = volume;
        self.handle.set_volume(volume);
    }

    pub fn toggle_mute(&mut self) {
        if self.is_muted {
            self.volume = self.pre_mute_volume;
            self.is_muted = false;
            self.handle.set_volume(self.pre_mute_volume);
        } else {
            self.pre_mute_volume = self.volume;
            self.volume = 0.0;
            self.is_muted = true;
            self.handle.set_volume(0.0);
        }
    }

    /// Jump to `fraction` of the duration; an unknown duration counts as zero.
    pub fn seek_to(&mut self, fraction: f64) {
        let duration = if self.duration.is_finite() {
            self.duration
        } else {
            0.0
        };
        let time = duration * clamp_unit(fraction);
        self.handle.set_current_time(time);
        self.current_time = time;
    }

    pub fn begin_seek_drag(&mut self) {
        self.is_seeking = true;
    }

    /// Finish a drag. A drag that ends at the very end counts as the track
    /// ending, since the handle may never report it.
    pub fn end_seek_drag(&mut self) {
        self.is_seeking = false;
        if self.current_time >= self.duration {
            self.next();
        }
    }

    fn on_ended(&mut self, source: SourceId) {
        if source != self.loaded {
            debug!(?source, "end of an earlier source ignored");
            return;
        }
        // The pending drag end owns the transition.
        if self.is_seeking {
            debug!("track ended during a seek drag; deferring");
            return;
        }
        self.next();
    }

    fn on_play_resolved(&mut self, ticket: PlayTicket, result: std::result::Result<(), PlayError>) {
        let current = self.pending_play == Some(ticket);
        match result {
            Ok(()) if current => {
                self.pending_play = None;
                self.transport = TransportState::Playing;
            }
            Ok(()) => debug!(?ticket, "stale play confirmation ignored"),
            Err(e) => {
                if current {
                    self.pending_play = None;
                }
                debug!(?ticket, error = %e, "play failed; ignoring");
            }
        }
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::TimeAdvanced => self.current_time = self.handle.current_time(),
            MediaEvent::DurationChanged => self.duration = self.handle.duration(),
            MediaEvent::VolumeChanged => self.volume = self.handle.volume(),
            MediaEvent::Ended { source } => self.on_ended(source),
            MediaEvent::PlayResolved { ticket, result } => self.on_play_resolved(ticket, result),
        }
    }

    /// Apply every media event delivered so far. Returns how many were handled.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }
}

impl<H: AudioHandle> Drop for PlaybackSession<H> {
    fn drop(&mut self) {
        self.handle.pause();
        self.subscription.take();
        debug!(album = %self.album.slug, "session closed");
    }
}
