use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::AudioHandle;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::{Published, update_mpris};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// What was last published to MPRIS.
    pub last_published: Published,
}

impl EventLoopState {
    pub fn new<H: AudioHandle>(app: &App<H>) -> Self {
        Self {
            pending_gg: false,
            last_published: Published::of(&app.session),
        }
    }
}

/// Main terminal event loop: applies media events, draws, and handles input
/// from the keyboard and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run<H: AudioHandle>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<H>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        app.pump();

        // Keep MPRIS in sync even when changes come from media keys or auto-advance.
        let published = Published::of(&app.session);
        if published != state.last_published {
            update_mpris(mpris, &app.session);
            state.last_published = published;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply a media-key command. Returns `true` when the app should quit.
pub(super) fn handle_control_cmd<H: AudioHandle>(cmd: ControlCmd, app: &mut App<H>) -> bool {
    debug!(?cmd, "control command");
    if cmd == ControlCmd::Quit {
        return true;
    }
    app.follow_playback_on();
    match cmd {
        ControlCmd::Play => app.session.play_current(),
        ControlCmd::Pause | ControlCmd::Stop => app.session.pause_current(),
        ControlCmd::PlayPause => app.toggle_current(),
        ControlCmd::Next => app.next_track(),
        ControlCmd::Prev => app.previous_track(),
        ControlCmd::Quit => {}
    }
    false
}

/// Apply a key press. Returns `true` when the app should quit.
pub(super) fn handle_key_event<H: AudioHandle>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App<H>,
    state: &mut EventLoopState,
) -> bool {
    let scrub = settings.controls.scrub_seconds as f64;
    let volume_step = settings.controls.volume_step;

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.cursor_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.cursor_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.cursor_next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.cursor_prev();
        }
        KeyCode::Enter => app.activate(),
        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_current(),
        KeyCode::Char('l') => app.next_track(),
        KeyCode::Char('h') => app.previous_track(),
        KeyCode::Char('L') => app.scrub_by(scrub),
        KeyCode::Char('H') => app.scrub_by(-scrub),
        KeyCode::Right => app.move_scrub(scrub),
        KeyCode::Left => app.move_scrub(-scrub),
        KeyCode::Char('s') => app.toggle_scrub(),
        KeyCode::Esc => app.end_scrub(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.nudge_volume(volume_step),
        KeyCode::Char('-') => app.nudge_volume(-volume_step),
        KeyCode::Char('m') => app.toggle_mute(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::fake::FakeHandle;
    use crate::catalog::{Album, Track};
    use crate::session::{PlaybackSession, TransportState};
    use crossterm::event::KeyModifiers;

    fn album() -> Album {
        Album {
            slug: "demo".into(),
            title: "Demo".into(),
            artist: String::new(),
            release_info: String::new(),
            cover: None,
            tracks: (1..=4)
                .map(|n| {
                    Track::new(format!("Track {n}"), Some(60.0), format!("/music/{n}.ogg"))
                })
                .collect(),
        }
    }

    fn setup() -> (App<FakeHandle>, EventLoopState, config::Settings) {
        let hw = FakeHandle::for_album(&album());
        let session = PlaybackSession::start(album(), hw, 0.5).unwrap();
        let mut app = App::new(session, true);
        app.pump();
        let state = EventLoopState::new(&app);
        (app, state, config::Settings::default())
    }

    fn press(
        code: KeyCode,
        settings: &config::Settings,
        app: &mut App<FakeHandle>,
        state: &mut EventLoopState,
    ) -> bool {
        handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), settings, app, state)
    }

    #[test]
    fn gg_needs_two_presses_and_is_cancelled_by_other_keys() {
        let (mut app, mut state, settings) = setup();
        press(KeyCode::Char('G'), &settings, &mut app, &mut state);
        assert_eq!(app.cursor, 3);

        press(KeyCode::Char('g'), &settings, &mut app, &mut state);
        assert_eq!(app.cursor, 3);
        press(KeyCode::Char('k'), &settings, &mut app, &mut state);
        press(KeyCode::Char('g'), &settings, &mut app, &mut state);
        assert_eq!(app.cursor, 2);
        press(KeyCode::Char('g'), &settings, &mut app, &mut state);
        assert_eq!(app.cursor, 0);
        assert!(!app.follow_playback);
    }

    #[test]
    fn enter_plays_the_cursor_track() {
        let (mut app, mut state, settings) = setup();
        press(KeyCode::Char('j'), &settings, &mut app, &mut state);
        press(KeyCode::Enter, &settings, &mut app, &mut state);
        assert_eq!(app.session.current_index(), 1);
        assert_eq!(app.session.transport(), TransportState::Playing);

        press(KeyCode::Char(' '), &settings, &mut app, &mut state);
        assert_eq!(app.session.transport(), TransportState::Paused);
    }

    #[test]
    fn scrub_keys_move_only_while_dragging() {
        let (mut app, mut state, settings) = setup();
        press(KeyCode::Right, &settings, &mut app, &mut state);
        assert_eq!(app.session.current_time(), 0.0);

        press(KeyCode::Char('s'), &settings, &mut app, &mut state);
        press(KeyCode::Right, &settings, &mut app, &mut state);
        press(KeyCode::Right, &settings, &mut app, &mut state);
        assert!(app.is_scrubbing());
        assert!((app.session.current_time() - 10.0).abs() < 1e-9);

        press(KeyCode::Esc, &settings, &mut app, &mut state);
        assert!(!app.session.is_seeking());
    }

    #[test]
    fn volume_and_mute_keys() {
        let (mut app, mut state, settings) = setup();
        press(KeyCode::Char('+'), &settings, &mut app, &mut state);
        assert!((app.session.volume() - 0.55).abs() < 1e-9);
        press(KeyCode::Char('m'), &settings, &mut app, &mut state);
        assert!(app.session.is_muted());
    }

    #[test]
    fn q_quits() {
        let (mut app, mut state, settings) = setup();
        assert!(press(KeyCode::Char('q'), &settings, &mut app, &mut state));
    }

    #[test]
    fn control_commands_map_to_session_intents() {
        let (mut app, _state, _settings) = setup();

        assert!(!handle_control_cmd(ControlCmd::Play, &mut app));
        assert_eq!(app.session.transport(), TransportState::Playing);
        handle_control_cmd(ControlCmd::Stop, &mut app);
        assert_eq!(app.session.transport(), TransportState::Paused);
        handle_control_cmd(ControlCmd::PlayPause, &mut app);
        assert_eq!(app.session.transport(), TransportState::Playing);
        handle_control_cmd(ControlCmd::Next, &mut app);
        assert_eq!(app.session.current_index(), 1);
        handle_control_cmd(ControlCmd::Prev, &mut app);
        assert_eq!(app.session.current_index(), 0);
        assert!(handle_control_cmd(ControlCmd::Quit, &mut app));
    }
}
