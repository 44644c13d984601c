//! UI rendering for the terminal user interface.
//!
//! Everything here is a pure function of the session snapshot and the app's
//! view state; nothing reads the audio handle.

mod player_bar;
mod track_list;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::audio::AudioHandle;
use crate::catalog::Track;
use crate::config::{ControlsSettings, UiSettings};
use crate::session::format_time;

pub use player_bar::render_player_bar;
pub use track_list::render_track_list;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("gg/G", "top/bottom");
    map.insert("enter", "play/pause selected");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next track");
    // H/L is filled dynamically from config.
    map.insert("s", "scrub");
    map.insert("+/-", "volume");
    map.insert("m", "mute");
    map.insert("K", "metadata");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "gg/G", "s", "+/-", "m", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

fn metadata_text(track: &Track, artist: &str, album: &str) -> String {
    let duration = track
        .duration
        .and_then(format_time)
        .unwrap_or_else(|| "-".to_string());
    format!(
        "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}",
        track.title,
        if artist.is_empty() { "-" } else { artist },
        album,
        duration,
        track.source.display()
    )
}

/// Render the entire UI into `frame`.
pub fn draw<H: AudioHandle>(
    frame: &mut Frame,
    app: &App<H>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let snapshot = app.session.snapshot();
    let album = snapshot.album;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header: album details.
    let mut details = vec![album.title.clone()];
    if !album.artist.is_empty() {
        details.push(album.artist.clone());
    }
    if !album.release_info.is_empty() {
        details.push(album.release_info.clone());
    }
    let header = Paragraph::new(format!("{}\n{}", details.join(" • "), ui_settings.header_text))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" albumdeck ")
                .title_alignment(Alignment::Center),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(header, chunks[0]);

    render_track_list(frame, chunks[1], &snapshot, app.cursor);

    if app.metadata_window {
        let popup_area = centered_rect_sized(72, 9, chunks[1]);
        frame.render_widget(Clear, popup_area);

        let meta = match album.tracks.get(app.cursor) {
            Some(track) => metadata_text(track, &album.artist, &album.title),
            None => "No track selected".to_string(),
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(left_pad())
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    render_player_bar(
        frame,
        chunks[2],
        &snapshot,
        app.scrub_position(),
        &ui_settings.time_separator,
    );

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
