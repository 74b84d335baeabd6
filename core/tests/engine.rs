//! Engine lifecycle tests, driven entirely by a ManualClock.

use idle_core::{
    clock::ManualClock,
    command::PlayerCommand,
    config::GameConfig,
    engine::IdleEngine,
    event::GameEvent,
    persistence::{MemoryStorage, SaveStorage},
    state::TimeOfDay,
    types::EpochMillis,
};

const T0: EpochMillis = 1_700_000_000_000;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn engine_with(storage: MemoryStorage) -> (IdleEngine<ManualClock, MemoryStorage>, ManualClock) {
    init_logs();
    let clock = ManualClock::new(T0);
    let engine = IdleEngine::new(GameConfig::study_wizard(), clock.clone(), storage);
    (engine, clock)
}

fn fresh_engine() -> (IdleEngine<ManualClock, MemoryStorage>, ManualClock) {
    engine_with(MemoryStorage::new())
}

fn count(events: &[GameEvent], name: &str) -> usize {
    events.iter().filter(|e| e.type_name() == name).count()
}

#[test]
fn start_on_empty_storage_is_a_fresh_game() {
    let (mut engine, _) = fresh_engine();

    let events = engine.start();

    assert_eq!(events, vec![GameEvent::Loaded { restored: false }]);
    assert!(engine.is_started());
    assert_eq!(engine.state().resources.currency.amount, 0.0);
    assert!(engine.start().is_empty(), "second start is a no-op");
}

#[test]
fn pump_starts_the_engine_lazily() {
    let (mut engine, _) = fresh_engine();

    let events = engine.pump();

    assert_eq!(count(&events, "loaded"), 1);
    assert_eq!(count(&events, "accrued"), 0);
}

#[test]
fn one_tick_interval_accrues_one_tenth_of_the_rate() {
    let (mut engine, clock) = fresh_engine();
    engine.start();

    clock.advance(100);
    let events = engine.pump();

    match events.as_slice() {
        [GameEvent::Accrued { dt_secs, rate, gained }] => {
            assert!((dt_secs - 0.1).abs() < 1e-12);
            assert!((rate - 0.2).abs() < 1e-12);
            assert!((gained - 0.02).abs() < 1e-12);
        }
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn nothing_happens_before_the_interval_elapses() {
    let (mut engine, clock) = fresh_engine();
    engine.start();

    clock.advance(99);
    assert!(engine.pump().is_empty());
    assert_eq!(engine.state().resources.currency.amount, 0.0);
}

#[test]
fn late_tick_credits_the_whole_gap() {
    let (mut engine, clock) = fresh_engine();
    engine.start();

    clock.advance(730);
    engine.pump();

    assert!((engine.state().resources.currency.amount - 0.2 * 0.73).abs() < 1e-12);
}

#[test]
fn clock_going_backwards_pays_nothing() {
    let (mut engine, clock) = fresh_engine();
    engine.start();

    clock.set(T0 - 60_000);
    assert_eq!(count(&engine.pump(), "accrued"), 0);
    clock.advance(100);
    assert_eq!(count(&engine.pump(), "accrued"), 1);
    assert!((engine.state().resources.currency.amount - 0.02).abs() < 1e-12);
}

#[test]
fn autosave_fires_every_five_seconds() {
    let (mut engine, clock) = fresh_engine();
    engine.start();

    let mut saves = Vec::new();
    for _ in 0..100 {
        clock.advance(100);
        for event in engine.pump() {
            if let GameEvent::Saved { at } = event {
                saves.push(at);
            }
        }
    }

    assert_eq!(saves, vec![T0 + 5_000, T0 + 10_000]);
    assert_eq!(engine.state().last_saved, Some(T0 + 10_000));
    let key = engine.config().storage_key.clone();
    assert!(engine.storage().get_raw(&key).is_some());
}

#[test]
fn player_actions_save_immediately() {
    let (mut engine, _) = fresh_engine();
    engine.start();

    let events = engine.apply(PlayerCommand::Click);

    assert_eq!(events[0], GameEvent::Clicked { gained: 1.0 });
    assert_eq!(events.last(), Some(&GameEvent::Saved { at: T0 }));
    let key = engine.config().storage_key.clone();
    let saved = engine.storage().read(&key).unwrap().expect("payload");
    assert!(saved.contains("\"total_clicks\":1"));
}

#[test]
fn rejected_purchase_does_not_save() {
    let (mut engine, _) = fresh_engine();
    engine.start();

    let events = engine.apply(PlayerCommand::Purchase { upgrade_id: "apprentice".into() });

    assert!(matches!(
        events.as_slice(),
        [GameEvent::PurchaseRejected { upgrade_id, .. }] if upgrade_id == "apprentice"
    ));
    assert!(engine.state().last_saved.is_none());
}

#[test]
fn purchase_through_engine_raises_rate() {
    let (mut engine, _) = fresh_engine();
    engine.start();
    for _ in 0..15 {
        engine.apply(PlayerCommand::Click);
    }

    let events = engine.apply(PlayerCommand::Purchase { upgrade_id: "candlelight".into() });

    assert!(events.contains(&GameEvent::Purchased {
        upgrade_id: "candlelight".into(),
        level: 1,
        cost: 15.0,
    }));
    assert!((engine.rate() - 0.4).abs() < 1e-12);
    assert_eq!(engine.state().resources.currency.amount, 0.0);
}

#[test]
fn boost_lifecycle_emits_start_and_expiry() {
    let (mut engine, clock) = fresh_engine();
    engine.start();

    let events = engine.apply(PlayerCommand::StartBoost);
    assert!(events.contains(&GameEvent::BoostStarted { duration_secs: 1_500.0 }));
    assert!((engine.rate() - 0.3).abs() < 1e-12);
    assert_eq!(count(&engine.apply(PlayerCommand::StartBoost), "saved"), 0);

    clock.advance(1_500 * 1_000);
    let events = engine.pump();
    assert_eq!(count(&events, "boost_expired"), 1);
    assert!(!engine.state().boost.active);
    // the boosted span also earned first_drop
    assert!((engine.rate() - 0.2 * 1.02).abs() < 1e-12);
}

#[test]
fn settings_commands_persist() {
    let (mut engine, _) = fresh_engine();
    engine.start();

    engine.apply(PlayerCommand::SetSound { enabled: false });
    engine.apply(PlayerCommand::SetTimeOfDay { time_of_day: TimeOfDay::Dawn });

    let settings = engine.state().settings;
    assert!(!settings.sound);
    assert!(settings.particles);
    assert_eq!(settings.time_of_day, TimeOfDay::Dawn);
}

#[test]
fn achievements_unlock_once() {
    let (mut engine, _) = fresh_engine();
    engine.start();

    let mut unlocked = Vec::new();
    for _ in 0..120 {
        for event in engine.apply(PlayerCommand::Click) {
            if let GameEvent::AchievementUnlocked { achievement_id } = event {
                unlocked.push(achievement_id);
            }
        }
    }

    assert_eq!(unlocked, vec!["first_drop".to_string()]);
    assert!((engine.rate() - 0.2 * 1.02).abs() < 1e-12);
}

#[test]
fn failing_storage_never_stops_the_loop() {
    let (mut engine, clock) = engine_with(MemoryStorage::with_quota(0));
    engine.start();

    let events = engine.apply(PlayerCommand::Click);
    assert_eq!(count(&events, "save_failed"), 1);
    assert_eq!(engine.state().total_clicks, 1);

    clock.advance(5_000);
    let events = engine.pump();
    assert_eq!(count(&events, "accrued"), 1);
    assert_eq!(count(&events, "save_failed"), 1);

    assert!(engine.save_now().is_err());
    engine.shutdown();
    assert!(engine.state().last_saved.is_none());
}

#[test]
fn reopening_after_time_away_replays_offline_progress() {
    let (mut engine, clock) = fresh_engine();
    engine.start();
    engine.shutdown();
    assert_eq!(engine.state().last_saved, Some(T0));

    clock.advance(60 * 60 * 1_000);
    let storage = engine.into_storage();
    let mut engine = IdleEngine::new(GameConfig::study_wizard(), clock.clone(), storage);
    let events = engine.start();

    assert_eq!(events[0], GameEvent::Loaded { restored: true });
    match &events[1] {
        GameEvent::OfflineProgress { elapsed_ms, capped, gained } => {
            assert_eq!(*elapsed_ms, 3_600_000);
            assert!(!capped);
            assert!((gained - 720.0).abs() < 1e-9);
        }
        other => panic!("expected offline progress, got {other:?}"),
    }
    assert!(events.contains(&GameEvent::AchievementUnlocked { achievement_id: "first_drop".into() }));
    assert!((engine.state().resources.currency.amount - 720.0).abs() < 1e-9);
}

#[test]
fn corrupted_save_starts_over_with_a_notice() {
    let mut storage = MemoryStorage::new();
    storage.insert_raw(&GameConfig::study_wizard().storage_key, "{{{");
    let (mut engine, _) = engine_with(storage);

    let events = engine.start();

    assert!(matches!(events[0], GameEvent::StateRecovered { .. }));
    assert_eq!(events[1], GameEvent::Loaded { restored: false });
    assert_eq!(engine.state().total_clicks, 0);
}

#[test]
fn shutdown_before_start_writes_nothing() {
    let (mut engine, _) = fresh_engine();
    engine.shutdown();
    assert!(engine.storage().get_raw(&engine.config().storage_key).is_none());
}
