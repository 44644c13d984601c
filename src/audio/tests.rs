use super::deck_state::DeckState;
use super::*;
use std::sync::mpsc;
use std::time::{Duration, Instant};

#[test]
fn emit_reaches_every_live_subscriber() {
    let bus = EventBus::default();
    let (tx1, rx1) = mpsc::channel();
    let (tx2, rx2) = mpsc::channel();
    let _s1 = bus.subscribe(tx1);
    let _s2 = bus.subscribe(tx2);

    let ended = MediaEvent::Ended {
        source: SourceId(3),
    };
    bus.emit(ended.clone());
    assert_eq!(rx1.try_recv(), Ok(ended.clone()));
    assert_eq!(rx2.try_recv(), Ok(ended));
}

#[test]
fn dropping_subscription_unsubscribes() {
    let bus = EventBus::default();
    let (tx, rx) = mpsc::channel();
    let sub = bus.subscribe(tx);
    assert_eq!(bus.listener_count(), 1);

    drop(sub);
    assert_eq!(bus.listener_count(), 0);
    bus.emit(MediaEvent::TimeAdvanced);
    assert!(rx.try_recv().is_err());
}

#[test]
fn disconnected_receivers_are_forgotten_on_emit() {
    let bus = EventBus::default();
    let (tx, rx) = mpsc::channel();
    let _sub = bus.subscribe(tx);
    drop(rx);

    bus.emit(MediaEvent::VolumeChanged);
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn subscription_outliving_bus_drops_cleanly() {
    let bus = EventBus::default();
    let (tx, _rx) = mpsc::channel();
    let sub = bus.subscribe(tx);
    drop(bus);
    drop(sub);
}

#[test]
fn play_tickets_increase() {
    let t = PlayTicket::default();
    assert!(t.next() > t);
    assert_eq!(t.next().next(), PlayTicket(2));
}

fn loaded_deck(duration: Option<Duration>) -> DeckState {
    let mut deck = DeckState::default();
    deck.load("/music/a.ogg".into(), SourceId(7), duration);
    deck
}

#[test]
fn play_without_source_is_refused() {
    let mut deck = DeckState::default();
    assert_eq!(deck.plan_play(), Err(PlayError::NoSource));
}

#[test]
fn deck_clock_runs_only_while_playing() {
    let t0 = Instant::now();
    let mut deck = loaded_deck(Some(Duration::from_secs(60)));
    assert_eq!(deck.tick(t0, false), None);

    let plan = deck.plan_play().unwrap();
    assert_eq!(plan.offset, Duration::ZERO);
    assert!(!plan.restart);
    deck.started(t0);
    assert_eq!(deck.elapsed(t0 + Duration::from_secs(5)), Duration::from_secs(5));

    assert_eq!(
        deck.pause(t0 + Duration::from_secs(5)),
        Some(Duration::from_secs(5))
    );
    assert_eq!(deck.pause(t0 + Duration::from_secs(9)), None);
    assert_eq!(deck.elapsed(t0 + Duration::from_secs(30)), Duration::from_secs(5));

    // Resuming continues from the paused position.
    assert_eq!(deck.plan_play().unwrap().offset, Duration::from_secs(5));
}

#[test]
fn seek_is_clamped_to_duration() {
    let t0 = Instant::now();
    let mut deck = loaded_deck(Some(Duration::from_secs(60)));
    assert_eq!(
        deck.seek(Duration::from_secs(90), t0),
        Duration::from_secs(60)
    );

    let mut unknown = loaded_deck(None);
    assert_eq!(
        unknown.seek(Duration::from_secs(90), t0),
        Duration::from_secs(90)
    );
}

#[test]
fn drained_sink_ends_the_source_once() {
    let t0 = Instant::now();
    let mut deck = loaded_deck(Some(Duration::from_secs(60)));
    deck.plan_play().unwrap();
    deck.started(t0);

    let running = deck.tick(t0 + Duration::from_secs(2), false).unwrap();
    assert_eq!(running.position, Duration::from_secs(2));
    assert_eq!(running.ended, None);

    let end = deck.tick(t0 + Duration::from_secs(59), true).unwrap();
    assert_eq!(end.position, Duration::from_secs(60));
    assert_eq!(end.ended, Some(SourceId(7)));
    assert!(deck.is_paused());
    assert_eq!(deck.tick(t0 + Duration::from_secs(61), true), None);
}

#[test]
fn playing_an_ended_source_restarts_it() {
    let t0 = Instant::now();
    let mut deck = loaded_deck(Some(Duration::from_secs(60)));
    deck.plan_play().unwrap();
    deck.started(t0);
    deck.tick(t0 + Duration::from_secs(60), true);

    let plan = deck.plan_play().unwrap();
    assert!(plan.restart);
    assert_eq!(plan.offset, Duration::ZERO);
    assert_eq!(plan.path, std::path::PathBuf::from("/music/a.ogg"));

    deck.started(t0 + Duration::from_secs(70));
    assert_eq!(
        deck.elapsed(t0 + Duration::from_secs(73)),
        Duration::from_secs(3)
    );
}

#[test]
fn loading_resets_the_clock() {
    let t0 = Instant::now();
    let mut deck = loaded_deck(Some(Duration::from_secs(60)));
    deck.seek(Duration::from_secs(30), t0);
    deck.load("/music/b.ogg".into(), SourceId(8), None);

    assert!(deck.is_paused());
    assert_eq!(deck.elapsed(t0), Duration::ZERO);
    assert_eq!(deck.duration(), None);
    assert_eq!(deck.plan_play().unwrap().path, std::path::PathBuf::from("/music/b.ogg"));
}
