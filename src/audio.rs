//! Audio output: the [`AudioHandle`] capability, its media events and the
//! `rodio` backend used by the binary.

mod deck_state;
mod events;
mod handle;
mod player;
mod sink;
mod thread;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use events::{EventBus, MediaEvent, Subscription};
pub use handle::{AudioHandle, PlayError, PlayStart, PlayTicket, SourceId};
pub use player::RodioHandle;

#[cfg(test)]
mod tests;
