//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No album in the catalog carries the requested slug.
    #[error("no album with slug `{0}`")]
    AlbumNotFound(String),

    /// A session needs at least one track to select.
    #[error("album `{0}` has no tracks")]
    EmptyAlbum(String),

    #[error("duplicate album slug `{0}` in catalog")]
    DuplicateSlug(String),

    #[error("failed to read catalog {path:?}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path:?}: {source}")]
    CatalogParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("audio output unavailable: {0}")]
    OutputStream(#[from] rodio::StreamError),

    #[error("failed to open {path:?}: {source}")]
    OpenSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("audio thread is gone")]
    AudioThreadGone,
}

pub type Result<T> = std::result::Result<T, Error>;
