use std::path::Path;

use lofty::prelude::*;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::{Album, Track};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Lowercase, ASCII alphanumerics kept, every other run collapsed into one `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

struct ScannedTrack {
    track: Track,
    number: Option<u32>,
    artist: Option<String>,
    album: Option<String>,
}

fn read_track(path: &Path) -> ScannedTrack {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut duration = None;
    let mut number = None;
    let mut artist = None;
    let mut album = None;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration = Some(tagged.properties().duration().as_secs_f64());

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.title() {
                if !v.trim().is_empty() {
                    title = v.trim().to_string();
                }
            }
            artist = tag
                .artist()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            album = tag
                .album()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            number = tag.track();
        }
    }

    ScannedTrack {
        track: Track::new(title, duration, path),
        number,
        artist,
        album,
    }
}

/// Build an album from the audio files found under `dir`.
///
/// Tracks are ordered by tag track number, then by path. Album title and artist
/// come from the first tagged track, falling back to the directory name.
pub fn scan_album(dir: &Path, settings: &LibrarySettings) -> Album {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut scanned: Vec<ScannedTrack> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), settings))
        .map(|e| read_track(e.path()))
        .collect();

    scanned.sort_by(|a, b| {
        a.number
            .unwrap_or(u32::MAX)
            .cmp(&b.number.unwrap_or(u32::MAX))
            .then_with(|| a.track.source.cmp(&b.track.source))
    });

    let dir_name = dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().and_then(|s| s.to_str()).map(str::to_string))
        .unwrap_or_else(|| dir.display().to_string());

    let title = scanned
        .iter()
        .find_map(|s| s.album.clone())
        .unwrap_or_else(|| dir_name.clone());
    let artist = scanned
        .iter()
        .find_map(|s| s.artist.clone())
        .unwrap_or_default();
    let release_info = match scanned.len() {
        1 => "1 track".to_string(),
        n => format!("{n} tracks"),
    };

    let mut album = Album {
        slug: slugify(&dir_name),
        title,
        artist,
        release_info,
        cover: None,
        tracks: scanned.into_iter().map(|s| s.track).collect(),
    };
    album.number_tracks();
    album
}
