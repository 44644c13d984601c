//! Application module: the model driven by the TUI and runtime.
//!
//! `App` lives in `app::model` and wraps the playback session with the
//! cursor, follow mode and scrubber state of the terminal front end.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
