use super::*;
use crate::audio::fake::{Command, FakeHandle};
use crate::catalog::{Album, Track};
use crate::session::{PlaybackSession, TransportState};

fn t(title: &str, secs: f64) -> Track {
    Track::new(title, Some(secs), format!("/music/{title}.flac"))
}

fn album() -> Album {
    Album {
        slug: "trio".into(),
        title: "Trio".into(),
        artist: "Someone".into(),
        release_info: String::new(),
        cover: None,
        tracks: vec![t("one", 100.0), t("two", 200.0), t("three", 50.0)],
    }
}

fn app(hw: &FakeHandle) -> App<FakeHandle> {
    let session = PlaybackSession::start(album(), hw.clone(), 0.5).unwrap();
    let mut app = App::new(session, true);
    app.pump();
    app
}

#[test]
fn cursor_wraps_in_both_directions() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    assert_eq!(app.cursor, 0);

    app.cursor_prev();
    assert_eq!(app.cursor, 2);
    app.cursor_next();
    assert_eq!(app.cursor, 0);

    app.cursor_last();
    assert_eq!(app.cursor, 2);
    app.cursor_first();
    assert_eq!(app.cursor, 0);
}

#[test]
fn moving_the_cursor_does_not_select() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    app.follow_playback_off();
    app.cursor_next();
    app.pump();
    assert_eq!(app.cursor, 1);
    assert_eq!(app.session.current_index(), 0);
}

#[test]
fn activate_plays_cursor_track_and_follows() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    app.follow_playback_off();
    app.cursor_next();
    app.cursor_next();

    app.activate();
    assert!(app.follow_playback);
    assert_eq!(app.session.current_index(), 2);
    assert_eq!(app.session.transport(), TransportState::Playing);

    app.activate();
    assert_eq!(app.session.transport(), TransportState::Paused);
}

#[test]
fn cursor_follows_auto_advance() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    app.activate();

    hw.finish_source();
    app.pump();
    assert_eq!(app.session.current_index(), 1);
    assert_eq!(app.cursor, 1);
}

#[test]
fn toggle_current_ignores_cursor() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    app.follow_playback_off();
    app.cursor_last();

    app.toggle_current();
    assert_eq!(app.session.current_index(), 0);
    assert_eq!(app.session.transport(), TransportState::Playing);
}

#[test]
fn volume_nudges_are_clamped() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);

    app.nudge_volume(0.25);
    assert_eq!(app.session.volume(), 0.75);
    app.nudge_volume(1.0);
    assert_eq!(app.session.volume(), 1.0);
    app.nudge_volume(-2.0);
    assert_eq!(app.session.volume(), 0.0);
}

#[test]
fn scrub_drag_seeks_and_releases() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    app.activate();

    app.toggle_scrub();
    assert!(app.is_scrubbing());
    assert!(app.session.is_seeking());
    assert_eq!(app.scrub_position(), Some(0.0));

    app.move_scrub(25.0);
    assert_eq!(app.scrub_position(), Some(0.25));
    assert_eq!(hw.commands().last(), Some(&Command::SetCurrentTime(25.0)));

    app.toggle_scrub();
    assert!(!app.is_scrubbing());
    assert!(!app.session.is_seeking());
    assert_eq!(app.session.current_index(), 0);
}

#[test]
fn one_shot_scrub_past_the_end_advances() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    app.activate();
    hw.advance_to(98.0);
    app.pump();

    app.scrub_by(5.0);
    assert!(!app.is_scrubbing());
    assert_eq!(app.session.current_index(), 1);
    assert_eq!(app.session.transport(), TransportState::Playing);
}

#[test]
fn one_shot_scrub_backwards_clamps_at_zero() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    hw.advance_to(3.0);
    app.pump();

    app.scrub_by(-5.0);
    assert_eq!(app.session.current_time(), 0.0);
    assert_eq!(app.session.current_index(), 0);
}

#[test]
fn move_scrub_without_drag_is_ignored() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    hw.clear_commands();

    app.move_scrub(10.0);
    app.end_scrub();
    assert!(hw.commands().is_empty());
}

#[test]
fn metadata_window_toggles() {
    let hw = FakeHandle::for_album(&album());
    let mut app = app(&hw);
    assert!(!app.metadata_window);
    app.toggle_metadata_window();
    assert!(app.metadata_window);
}
