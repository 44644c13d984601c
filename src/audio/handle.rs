//! The audio-playback capability a session drives.

use std::path::Path;
use std::sync::mpsc::Sender;

use thiserror::Error;

use super::events::{MediaEvent, Subscription};

/// Identifies one play command. Newer commands carry larger tickets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PlayTicket(pub u64);

impl PlayTicket {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifies one loaded source. Each load gets a larger id than the last,
/// so events about an earlier source can be recognized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceId(pub u64);

impl SourceId {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Immediate answer to [`AudioHandle::play`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlayStart {
    /// Playback began synchronously.
    Started,
    /// The handle will emit [`MediaEvent::PlayResolved`] for this ticket later.
    Pending,
    /// Playback could not start.
    Failed(PlayError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlayError {
    #[error("no source loaded")]
    NoSource,
    #[error("{0}")]
    Load(String),
}

/// A single audio output bound to one source at a time.
///
/// Setters take effect immediately on the readable properties; the matching
/// [`MediaEvent`] is delivered asynchronously to subscribers.
pub trait AudioHandle {
    /// Load `source` as `id`, resetting the position to zero. Does not start
    /// playback. The source's `Ended` event carries `id`.
    fn set_source(&mut self, source: &Path, id: SourceId);
    fn play(&mut self, ticket: PlayTicket) -> PlayStart;
    fn pause(&mut self);
    /// Output level in `[0, 1]`.
    fn set_volume(&mut self, volume: f64);
    /// Move the position, in seconds.
    fn set_current_time(&mut self, seconds: f64);

    fn current_time(&self) -> f64;
    /// Length of the loaded source in seconds, `NaN` while unknown.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;

    /// Deliver media events to `tx` until the returned guard is dropped.
    fn subscribe(&mut self, tx: Sender<MediaEvent>) -> Subscription;
}
