use std::path::{Path, PathBuf};

use serde::Deserialize;

/// One playable item of an album.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    pub title: String,
    /// Declared length in seconds; `None` when unknown.
    #[serde(default)]
    pub duration: Option<f64>,
    /// Audio file backing the track.
    pub source: PathBuf,
    /// Position in the owning album, set by [`Album::number_tracks`].
    /// Tells apart tracks that are otherwise identical.
    #[serde(skip)]
    pub(crate) slot: usize,
}

impl Track {
    pub fn new(title: impl Into<String>, duration: Option<f64>, source: impl AsRef<Path>) -> Self {
        Self {
            title: title.into(),
            duration,
            source: source.as_ref().to_path_buf(),
            slot: 0,
        }
    }
}

// Content equality; the slot is bookkeeping.
impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.duration == other.duration && self.source == other.source
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Album {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub release_info: String,
    #[serde(default)]
    pub cover: Option<PathBuf>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Album {
    /// Stamp every track with its position.
    pub fn number_tracks(&mut self) {
        for (slot, track) in self.tracks.iter_mut().enumerate() {
            track.slot = slot;
        }
    }

    /// Position of `track` in the album.
    ///
    /// A track taken from this album resolves to its own position even when
    /// an identical track sits elsewhere; any other track is matched by value.
    pub fn position_of(&self, track: &Track) -> Option<usize> {
        if self.tracks.get(track.slot).is_some_and(|t| t == track) {
            return Some(track.slot);
        }
        self.tracks.iter().position(|t| t == track)
    }
}
