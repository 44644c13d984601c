//! Scripted [`AudioHandle`] for tests.
//!
//! Clones share state, so a test keeps one clone to inspect commands and
//! fire media events while the session owns the other.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::Sender;

use super::events::{EventBus, MediaEvent, Subscription};
use super::handle::{AudioHandle, PlayError, PlayStart, PlayTicket, SourceId};
use crate::catalog::Album;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetSource(PathBuf),
    Play(PlayTicket),
    Pause,
    SetVolume(f64),
    SetCurrentTime(f64),
}

#[derive(Debug, Default)]
struct FakeState {
    commands: Vec<Command>,
    current_time: f64,
    duration: f64,
    volume: f64,
    defer_play: bool,
    fail_play: bool,
    pending: Vec<PlayTicket>,
    loaded: SourceId,
    durations: HashMap<PathBuf, f64>,
}

#[derive(Clone, Default)]
pub struct FakeHandle {
    state: Rc<RefCell<FakeState>>,
    bus: EventBus,
}

impl FakeHandle {
    /// A handle whose `play` starts synchronously.
    pub fn new() -> Self {
        let h = Self::default();
        {
            let mut s = h.state.borrow_mut();
            s.duration = f64::NAN;
            s.volume = 1.0;
        }
        h
    }

    /// A handle that reports the length of each of `album`'s sources once loaded.
    pub fn for_album(album: &Album) -> Self {
        let h = Self::new();
        h.state.borrow_mut().durations = album
            .tracks
            .iter()
            .filter_map(|t| t.duration.map(|d| (t.source.clone(), d)))
            .collect();
        h
    }

    /// Answer every play with `Pending`; resolve later with [`FakeHandle::resolve`].
    pub fn defer_play(self) -> Self {
        self.state.borrow_mut().defer_play = true;
        self
    }

    pub fn fail_play(self) -> Self {
        self.state.borrow_mut().fail_play = true;
        self
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.state.borrow_mut().commands.clear();
    }

    pub fn pending(&self) -> Vec<PlayTicket> {
        self.state.borrow().pending.clone()
    }

    /// Resolve a pending play with `result`.
    pub fn resolve(&self, ticket: PlayTicket, result: Result<(), PlayError>) {
        self.state.borrow_mut().pending.retain(|t| *t != ticket);
        self.bus.emit(MediaEvent::PlayResolved { ticket, result });
    }

    /// Id of the most recently loaded source.
    pub fn loaded(&self) -> SourceId {
        self.state.borrow().loaded
    }

    /// Report that the loaded source played to its end.
    pub fn finish_source(&self) {
        let source = self.loaded();
        self.bus.emit(MediaEvent::Ended { source });
    }

    pub fn emit(&self, event: MediaEvent) {
        self.bus.emit(event);
    }

    /// Move the hardware position and report it.
    pub fn advance_to(&self, seconds: f64) {
        self.state.borrow_mut().current_time = seconds;
        self.bus.emit(MediaEvent::TimeAdvanced);
    }

    /// Change the level outside the session, as an OS mixer would.
    pub fn external_volume(&self, volume: f64) {
        self.state.borrow_mut().volume = volume;
        self.bus.emit(MediaEvent::VolumeChanged);
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}

impl AudioHandle for FakeHandle {
    fn set_source(&mut self, source: &Path, id: SourceId) {
        {
            let mut s = self.state.borrow_mut();
            s.commands.push(Command::SetSource(source.to_path_buf()));
            s.loaded = id;
            s.current_time = 0.0;
            let duration = s.durations.get(source).copied().unwrap_or(f64::NAN);
            s.duration = duration;
        }
        self.bus.emit(MediaEvent::TimeAdvanced);
        self.bus.emit(MediaEvent::DurationChanged);
    }

    fn play(&mut self, ticket: PlayTicket) -> PlayStart {
        let mut s = self.state.borrow_mut();
        s.commands.push(Command::Play(ticket));
        if s.fail_play {
            PlayStart::Failed(PlayError::Load("scripted failure".to_string()))
        } else if s.defer_play {
            s.pending.push(ticket);
            PlayStart::Pending
        } else {
            PlayStart::Started
        }
    }

    fn pause(&mut self) {
        self.state.borrow_mut().commands.push(Command::Pause);
    }

    fn set_volume(&mut self, volume: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.commands.push(Command::SetVolume(volume));
            s.volume = volume;
        }
        self.bus.emit(MediaEvent::VolumeChanged);
    }

    fn set_current_time(&mut self, seconds: f64) {
        {
            let mut s = self.state.borrow_mut();
            s.commands.push(Command::SetCurrentTime(seconds));
            s.current_time = seconds;
        }
        self.bus.emit(MediaEvent::TimeAdvanced);
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn duration(&self) -> f64 {
        self.state.borrow().duration
    }

    fn volume(&self) -> f64 {
        self.state.borrow().volume
    }

    fn subscribe(&mut self, tx: Sender<MediaEvent>) -> Subscription {
        self.bus.subscribe(tx)
    }
}
