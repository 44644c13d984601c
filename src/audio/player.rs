use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use crate::config::AudioSettings;
use crate::error::{Error, Result};

use super::events::{EventBus, MediaEvent, Subscription};
use super::handle::{AudioHandle, PlayStart, PlayTicket, SourceId};
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// [`AudioHandle`] backed by a `rodio` output on a dedicated thread.
///
/// Every play is answered asynchronously through `PlayResolved`.
pub struct RodioHandle {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    bus: EventBus,
    join: Option<JoinHandle<()>>,
}

impl RodioHandle {
    /// Open the default output device and start the audio thread.
    pub fn new(audio_settings: &AudioSettings) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let bus = EventBus::default();

        let join = spawn_audio_thread(
            rx,
            playback.clone(),
            bus.clone(),
            Duration::from_millis(audio_settings.tick_ms.max(1)),
            ready_tx,
        );
        ready_rx.recv().map_err(|_| Error::AudioThreadGone)??;

        Ok(Self {
            tx,
            playback,
            bus,
            join: Some(join),
        })
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("audio thread is gone; command dropped");
        }
    }

    fn info(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|i| i.clone())
            .unwrap_or_default()
    }
}

impl AudioHandle for RodioHandle {
    fn set_source(&mut self, source: &Path, id: SourceId) {
        if let Ok(mut info) = self.playback.lock() {
            info.position = Duration::ZERO;
            info.duration = None;
        }
        self.send(AudioCmd::Load(source.to_path_buf(), id));
    }

    fn play(&mut self, ticket: PlayTicket) -> PlayStart {
        self.send(AudioCmd::Play(ticket));
        PlayStart::Pending
    }

    fn pause(&mut self) {
        self.send(AudioCmd::Pause);
    }

    fn set_volume(&mut self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0) as f32;
        if let Ok(mut info) = self.playback.lock() {
            info.volume = volume;
        }
        self.send(AudioCmd::SetVolume(volume));
    }

    fn set_current_time(&mut self, seconds: f64) {
        let to = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        if let Ok(mut info) = self.playback.lock() {
            info.position = to;
        }
        self.send(AudioCmd::Seek(to));
    }

    fn current_time(&self) -> f64 {
        self.info().position.as_secs_f64()
    }

    fn duration(&self) -> f64 {
        self.info()
            .duration
            .map_or(f64::NAN, |d| d.as_secs_f64())
    }

    fn volume(&self) -> f64 {
        f64::from(self.info().volume)
    }

    fn subscribe(&mut self, tx: Sender<MediaEvent>) -> Subscription {
        self.bus.subscribe(tx)
    }
}

impl Drop for RodioHandle {
    fn drop(&mut self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}
