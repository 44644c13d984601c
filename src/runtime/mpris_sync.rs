use crate::audio::AudioHandle;
use crate::mpris::MprisHandle;
use crate::session::{PlaybackSession, TransportState};

/// What MPRIS last saw, so the loop only republishes on change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Published {
    pub index: usize,
    pub transport: TransportState,
    pub duration_known: bool,
}

impl Published {
    pub fn of<H: AudioHandle>(session: &PlaybackSession<H>) -> Self {
        Self {
            index: session.current_index(),
            transport: session.transport(),
            duration_known: session.duration().is_finite(),
        }
    }
}

pub fn update_mpris<H: AudioHandle>(mpris: &MprisHandle, session: &PlaybackSession<H>) {
    mpris.set_track_metadata(
        session.album(),
        Some(session.current_index()),
        session.duration(),
    );
    mpris.set_playback(session.transport());
}
