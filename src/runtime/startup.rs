use std::path::Path;

use tracing::{info, warn};

use crate::catalog::{Album, Catalog, scan_album};
use crate::config;
use crate::error::{Error, Result};

/// Resolve the command-line target to an album: a directory is scanned,
/// anything else is looked up as a slug in the catalog file.
pub fn open_album(target: &str, settings: &config::Settings) -> Result<Album> {
    let dir = Path::new(target);
    if dir.is_dir() {
        let album = scan_album(dir, &settings.library);
        info!(dir = %dir.display(), slug = %album.slug, "opened album directory");
        return Ok(album);
    }

    let Some(path) = settings.catalog_path() else {
        return Err(Error::AlbumNotFound(target.to_string()));
    };
    let catalog = Catalog::load(&path)?;
    if catalog.find_album_by_slug(target).is_none() {
        let known: Vec<&str> = catalog.slugs().collect();
        warn!(slug = target, known = %known.join(", "), "album not in catalog");
    }
    let album = catalog.open_album(target)?;
    info!(catalog = %path.display(), slug = %album.slug, "opened catalog album");
    Ok(album)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings_with_catalog(path: &Path) -> config::Settings {
        let mut settings = config::Settings::default();
        settings.catalog.path = Some(path.to_path_buf());
        settings
    }

    #[test]
    fn slug_is_looked_up_in_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("albums.toml");
        fs::write(
            &catalog,
            r#"
[[albums]]
slug = "demo"
title = "Demo"

[[albums.tracks]]
title = "Intro"
source = "intro.mp3"
"#,
        )
        .unwrap();

        let album = open_album("demo", &settings_with_catalog(&catalog)).unwrap();
        assert_eq!(album.title, "Demo");
        assert_eq!(album.tracks[0].source, dir.path().join("intro.mp3"));

        let err = open_album("missing", &settings_with_catalog(&catalog)).unwrap_err();
        assert!(matches!(err, Error::AlbumNotFound(s) if s == "missing"));
    }

    #[test]
    fn directory_is_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let album_dir = dir.path().join("Live Set");
        fs::create_dir(&album_dir).unwrap();
        fs::write(album_dir.join("01.mp3"), b"").unwrap();
        fs::write(album_dir.join("cover.jpg"), b"").unwrap();

        let target = album_dir.to_string_lossy().to_string();
        let album = open_album(&target, &config::Settings::default()).unwrap();
        assert_eq!(album.slug, "live-set");
        assert_eq!(album.tracks.len(), 1);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("nope.toml");
        let err = open_album("demo", &settings_with_catalog(&catalog)).unwrap_err();
        assert!(matches!(err, Error::CatalogRead { .. }));
    }
}
