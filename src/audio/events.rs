//! Media events and the subscriber list that fans them out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, Weak};

use super::handle::{PlayError, PlayTicket, SourceId};

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeAdvanced,
    DurationChanged,
    VolumeChanged,
    /// The source loaded as `source` played to its end.
    Ended { source: SourceId },
    PlayResolved {
        ticket: PlayTicket,
        result: Result<(), PlayError>,
    },
}

type Listeners = Mutex<Vec<(u64, Sender<MediaEvent>)>>;

/// Subscriber list shared between a handle and its backend.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Arc<Listeners>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn subscribe(&self, tx: Sender<MediaEvent>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut l) = self.listeners.lock() {
            l.push((id, tx));
        }
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    /// Send `event` to every live subscriber, forgetting disconnected ones.
    pub fn emit(&self, event: MediaEvent) {
        if let Ok(mut l) = self.listeners.lock() {
            l.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        }
    }

    #[cfg(test)]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }
}

/// Live subscription; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            if let Ok(mut l) = listeners.lock() {
                l.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
