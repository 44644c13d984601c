use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::model::Album;
use crate::error::{Error, Result};

/// Read-only album list, usually loaded from `albums.toml`.
///
/// ```toml
/// [[albums]]
/// slug = "the-colors"
/// title = "The Colors"
/// artist = "Pablo Picasso"
/// release_info = "1909 Picasso Music"
/// cover = "covers/01.png"
///
/// [[albums.tracks]]
/// title = "Blue"
/// duration = 161.71
/// source = "audio/blue.mp3"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl Catalog {
    /// Load a catalog file. Relative `source` and `cover` paths are resolved
    /// against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| Error::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&raw, path)?;
        debug!(path = %path.display(), albums = catalog.albums.len(), "catalog loaded");
        Ok(catalog)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self> {
        let mut catalog: Catalog = toml::from_str(raw).map_err(|source| Error::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut seen = HashSet::new();
        for album in &mut catalog.albums {
            if !seen.insert(album.slug.clone()) {
                return Err(Error::DuplicateSlug(album.slug.clone()));
            }
            if let Some(cover) = album.cover.take() {
                album.cover = Some(resolve(base, cover));
            }
            for track in &mut album.tracks {
                track.source = resolve(base, std::mem::take(&mut track.source));
            }
            album.number_tracks();
        }
        Ok(catalog)
    }

    pub fn find_album_by_slug(&self, slug: &str) -> Option<&Album> {
        self.albums.iter().find(|a| a.slug == slug)
    }

    /// Like [`Catalog::find_album_by_slug`], but a missing slug is an error.
    pub fn open_album(&self, slug: &str) -> Result<Album> {
        self.find_album_by_slug(slug)
            .cloned()
            .ok_or_else(|| Error::AlbumNotFound(slug.to_string()))
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.albums.iter().map(|a| a.slug.as_str())
    }
}

fn resolve(base: &Path, p: PathBuf) -> PathBuf {
    if p.is_absolute() { p } else { base.join(p) }
}
