use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::session::{SessionSnapshot, TransportState, format_time};

const HIGHLIGHT: &str = "> ";

/// Glyph in front of the current track; other rows get a blank.
fn marker(snapshot: &SessionSnapshot<'_>, index: usize) -> &'static str {
    if index != snapshot.current_index {
        return " ";
    }
    match snapshot.transport {
        TransportState::Playing => "▶",
        TransportState::Paused => "⏸",
        TransportState::Stopped => "•",
    }
}

/// One row: marker, number, title, and the duration pushed to the right edge.
pub(super) fn row_text(snapshot: &SessionSnapshot<'_>, index: usize, width: usize) -> String {
    let track = &snapshot.album.tracks[index];
    let left = format!("{} {:>2}. {}", marker(snapshot, index), index + 1, track.title);
    let right = track.duration.and_then(format_time).unwrap_or_default();

    let used = left.chars().count() + right.chars().count();
    let gap = width.saturating_sub(used).max(1);
    format!("{left}{}{right}", " ".repeat(gap))
}

/// Render the album's tracks, keeping `cursor` centered when the list overflows.
pub fn render_track_list(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot<'_>, cursor: usize) {
    let total = snapshot.album.tracks.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let row_width = (area.width as usize).saturating_sub(2 + HIGHLIGHT.len());
    let cursor = cursor.min(total.saturating_sub(1));

    // Only build items for the visible window.
    let (start, end, selected_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, cursor)
    } else {
        let half = list_height / 2;
        let mut start = cursor.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, cursor - start)
    };

    let items: Vec<ListItem> = (start..end)
        .map(|i| ListItem::new(row_text(snapshot, i, row_width)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(HIGHLIGHT);
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
