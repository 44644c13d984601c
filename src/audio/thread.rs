use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use crate::error::Result;

use super::deck_state::DeckState;
use super::events::{EventBus, MediaEvent};
use super::handle::{PlayError, PlayTicket, SourceId};
use super::sink::{create_sink_at, probe_duration};
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// The audio thread's sink, driven by [`DeckState`].
struct Deck<'a> {
    stream: &'a OutputStream,
    info: PlaybackHandle,
    bus: EventBus,
    state: DeckState,
    sink: Option<Sink>,
    volume: f32,
}

impl<'a> Deck<'a> {
    fn new(stream: &'a OutputStream, info: PlaybackHandle, bus: EventBus) -> Self {
        let volume = info.lock().map(|i| i.volume).unwrap_or(1.0);
        Self {
            stream,
            info,
            bus,
            state: DeckState::default(),
            sink: None,
            volume,
        }
    }

    fn publish(&self, f: impl FnOnce(&mut PlaybackInfo)) {
        if let Ok(mut info) = self.info.lock() {
            f(&mut info);
        }
    }

    fn apply(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load(path, id) => self.load(path, id),
            AudioCmd::Play(ticket) => self.play(ticket),
            AudioCmd::Pause => self.pause(),
            AudioCmd::SetVolume(v) => self.set_volume(v),
            AudioCmd::Seek(to) => self.seek(to),
            AudioCmd::Quit => self.stop(),
        }
    }

    fn load(&mut self, path: PathBuf, id: SourceId) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        let duration = probe_duration(&path);
        debug!(source = %path.display(), ?id, ?duration, "source loaded");
        self.state.load(path, id, duration);

        self.publish(|info| {
            info.position = Duration::ZERO;
            info.duration = duration;
        });
        self.bus.emit(MediaEvent::TimeAdvanced);
        self.bus.emit(MediaEvent::DurationChanged);
    }

    fn play(&mut self, ticket: PlayTicket) {
        let plan = match self.state.plan_play() {
            Ok(plan) => plan,
            Err(e) => {
                self.bus.emit(MediaEvent::PlayResolved {
                    ticket,
                    result: Err(e),
                });
                return;
            }
        };
        if plan.restart {
            self.sink = None;
        }

        if self.sink.is_none() {
            match create_sink_at(self.stream, &plan.path, plan.offset, self.volume) {
                Ok(s) => self.sink = Some(s),
                Err(e) => {
                    warn!(error = %e, "play failed");
                    self.bus.emit(MediaEvent::PlayResolved {
                        ticket,
                        result: Err(PlayError::Load(e.to_string())),
                    });
                    return;
                }
            }
        }

        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        self.state.started(Instant::now());
        self.bus.emit(MediaEvent::PlayResolved {
            ticket,
            result: Ok(()),
        });
    }

    fn pause(&mut self) {
        let Some(position) = self.state.pause(Instant::now()) else {
            return;
        };
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.publish(|info| info.position = position);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
        self.publish(|info| info.volume = volume);
        self.bus.emit(MediaEvent::VolumeChanged);
    }

    fn seek(&mut self, to: Duration) {
        let to = self.state.seek(to, Instant::now());

        // Scrubbing: rebuild the current sink and skip into the file.
        if let Some(s) = self.sink.take() {
            s.stop();
            if let Some(path) = self.state.source() {
                match create_sink_at(self.stream, path, to, self.volume) {
                    Ok(new_sink) => {
                        if !self.state.is_paused() {
                            new_sink.play();
                        }
                        self.sink = Some(new_sink);
                    }
                    Err(e) => warn!(error = %e, "seek failed"),
                }
            }
        }

        self.publish(|info| info.position = to);
        self.bus.emit(MediaEvent::TimeAdvanced);
    }

    /// Periodic position report and end-of-source detection.
    fn tick(&mut self) {
        let drained = self.sink.as_ref().is_none_or(|s| s.empty());
        let Some(report) = self.state.tick(Instant::now(), drained) else {
            return;
        };
        self.publish(|info| info.position = report.position);
        self.bus.emit(MediaEvent::TimeAdvanced);
        if let Some(source) = report.ended {
            debug!(?source, duration = ?self.state.duration(), "source ended");
            self.bus.emit(MediaEvent::Ended { source });
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.state.halt();
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    info: PlaybackHandle,
    bus: EventBus,
    tick: Duration,
    ready: SyncSender<Result<()>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(e.into()));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut deck = Deck::new(&stream, info, bus);
        let mut last_tick = Instant::now();

        loop {
            match rx.recv_timeout(tick) {
                Ok(AudioCmd::Quit) | Err(RecvTimeoutError::Disconnected) => {
                    deck.stop();
                    break;
                }
                Ok(cmd) => deck.apply(cmd),
                Err(RecvTimeoutError::Timeout) => {}
            }

            // A steady command stream must not starve position reports.
            if last_tick.elapsed() >= tick {
                deck.tick();
                last_tick = Instant::now();
            }
        }
        debug!("audio thread finished");
    })
}
