//! Commands and shared state between [`super::RodioHandle`] and its audio thread.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::handle::{PlayTicket, SourceId};

#[derive(Debug)]
pub enum AudioCmd {
    /// Load a new source, paused at the start.
    Load(PathBuf, SourceId),
    /// Start or resume playback; answered with `PlayResolved(ticket)`.
    Play(PlayTicket),
    Pause,
    SetVolume(f32),
    /// Jump to an absolute position.
    Seek(Duration),
    /// Stop playback and end the audio thread.
    Quit,
}

/// Playback state published by the audio thread.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    pub position: Duration,
    /// Length of the loaded source, when known.
    pub duration: Option<Duration>,
    pub volume: f32,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            position: Duration::ZERO,
            duration: None,
            volume: 1.0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
