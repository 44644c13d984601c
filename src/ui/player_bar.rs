use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::session::{SessionSnapshot, TransportState, format_time};

const UNKNOWN_TIME: &str = "-:--";

fn transport_label(snapshot: &SessionSnapshot<'_>) -> &'static str {
    if snapshot.play_pending && snapshot.transport != TransportState::Playing {
        return "Starting";
    }
    match snapshot.transport {
        TransportState::Playing => "Playing",
        TransportState::Paused => "Paused",
        TransportState::Stopped => "Stopped",
    }
}

/// `elapsed<sep>total`, with a placeholder for unknown values.
pub(super) fn time_text(current_time: f64, duration: f64, separator: &str) -> String {
    let elapsed = format_time(current_time).unwrap_or_else(|| UNKNOWN_TIME.to_string());
    let total = format_time(duration).unwrap_or_else(|| UNKNOWN_TIME.to_string());
    format!("{elapsed}{separator}{total}")
}

pub(super) fn volume_text(snapshot: &SessionSnapshot<'_>) -> String {
    if snapshot.is_muted {
        format!("Vol: muted ({:.0}%)", snapshot.pre_mute_volume * 100.0)
    } else {
        format!("Vol: {:.0}%", snapshot.volume * 100.0)
    }
}

/// Render the player bar. `scrub` is the scrubber position while a drag is
/// active; the gauge then shows it instead of the playback position.
pub fn render_player_bar(
    frame: &mut Frame,
    area: Rect,
    snapshot: &SessionSnapshot<'_>,
    scrub: Option<f64>,
    time_separator: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" player ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let now = format!(
        "{}: {}",
        transport_label(snapshot),
        snapshot.current_track.title
    );
    frame.render_widget(Paragraph::new(now), rows[0]);

    let time = time_text(snapshot.current_time, snapshot.duration, time_separator);
    let (ratio, label) = match scrub {
        Some(at) => (at, format!("seek {time}")),
        None => (snapshot.progress().unwrap_or(0.0), time),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, rows[1]);

    frame.render_widget(Paragraph::new(volume_text(snapshot)), rows[2]);
}
