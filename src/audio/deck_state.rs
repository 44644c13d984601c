//! Position and end-of-source bookkeeping for the audio thread's deck.
//!
//! Nothing here touches the output device: the deck asks this state what a
//! command means, then does the sink work itself. Times are passed in so the
//! clock can be driven from tests.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::handle::{PlayError, SourceId};

/// What a play command needs from the sink.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PlayPlan {
    pub path: PathBuf,
    /// Where a freshly built sink should start.
    pub offset: Duration,
    /// The source had ended; any existing sink must be discarded.
    pub restart: bool,
}

/// Result of a tick while playing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct TickReport {
    pub position: Duration,
    /// Set on the first tick that finds the sink drained.
    pub ended: Option<SourceId>,
}

#[derive(Debug)]
pub(super) struct DeckState {
    source: Option<PathBuf>,
    loaded: SourceId,
    duration: Option<Duration>,
    paused: bool,
    ended: bool,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Default for DeckState {
    fn default() -> Self {
        Self {
            source: None,
            loaded: SourceId::default(),
            duration: None,
            paused: true,
            ended: false,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }
}

impl DeckState {
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Playback position at `now`, capped at the known duration.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let running = self
            .started_at
            .map_or(Duration::ZERO, |st| now.saturating_duration_since(st));
        let raw = self.accumulated + running;
        match self.duration {
            Some(d) => raw.min(d),
            None => raw,
        }
    }

    /// A new source, paused at the start.
    pub fn load(&mut self, path: PathBuf, id: SourceId, duration: Option<Duration>) {
        *self = Self {
            source: Some(path),
            loaded: id,
            duration,
            ..Self::default()
        };
    }

    /// Decide how to honor a play command. Playing an ended source starts it over.
    pub fn plan_play(&mut self) -> Result<PlayPlan, PlayError> {
        let path = self.source.clone().ok_or(PlayError::NoSource)?;
        let restart = self.ended;
        if restart {
            self.ended = false;
            self.accumulated = Duration::ZERO;
        }
        Ok(PlayPlan {
            path,
            offset: self.accumulated,
            restart,
        })
    }

    /// The sink is playing as of `now`.
    pub fn started(&mut self, now: Instant) {
        if self.paused {
            self.paused = false;
            self.started_at = Some(now);
        }
    }

    /// Freeze the clock. Returns the position when playback was running.
    pub fn pause(&mut self, now: Instant) -> Option<Duration> {
        if self.paused {
            return None;
        }
        self.accumulated = self.elapsed(now);
        self.started_at = None;
        self.paused = true;
        Some(self.accumulated)
    }

    /// Move to `to`, clamped to the known duration. Returns the new position.
    pub fn seek(&mut self, to: Duration, now: Instant) -> Duration {
        let to = match self.duration {
            Some(d) => to.min(d),
            None => to,
        };
        self.accumulated = to;
        self.ended = false;
        self.started_at = if self.paused { None } else { Some(now) };
        to
    }

    /// Periodic report; `drained` says whether the sink has run dry.
    ///
    /// The first drained tick pauses at the end of the source and reports it.
    pub fn tick(&mut self, now: Instant, drained: bool) -> Option<TickReport> {
        if self.paused {
            return None;
        }
        let position = self.elapsed(now);
        if !drained || self.ended {
            return Some(TickReport {
                position,
                ended: None,
            });
        }
        self.ended = true;
        self.paused = true;
        self.started_at = None;
        self.accumulated = self.duration.unwrap_or(position);
        Some(TickReport {
            position: self.accumulated,
            ended: Some(self.loaded),
        })
    }

    /// Stop the clock without touching the position.
    pub fn halt(&mut self) {
        self.paused = true;
        self.started_at = None;
    }
}
