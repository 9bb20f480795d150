//! End-to-end session flows through `App`.
//!
//! Each test builds the composition root over an in-memory store and a
//! recording alert dispatcher, then drives it the way a front end would.

use std::sync::Arc;

use pomospace_core::{
    App, Event, MemoryStore, Persistence, Phase, RecordingAlerts, RouteCatalog,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn catalog() -> Arc<RouteCatalog> {
    Arc::new(RouteCatalog::builtin().unwrap())
}

fn open(store: &MemoryStore, alerts: &RecordingAlerts) -> App {
    App::load(
        catalog(),
        Box::new(alerts.clone()),
        Persistence::new(Box::new(store.clone())),
    )
}

/// Tick until the showing phase completes, returning the completion events.
fn run_out(app: &mut App) -> Vec<Event> {
    app.start();
    loop {
        let events = app.tick();
        if !events.is_empty() {
            return events;
        }
    }
}

// ============================================================================
// Flows
// ============================================================================

#[test]
fn full_default_cycle_ends_in_long_break() {
    let store = MemoryStore::new();
    let alerts = RecordingAlerts::default();
    let mut app = open(&store, &alerts);
    app.set_duration(Phase::Focus, 1);
    app.set_duration(Phase::ShortBreak, 1);

    let mut phases = Vec::new();
    for _ in 0..7 {
        phases.push(app.timer().phase());
        run_out(&mut app);
    }
    phases.push(app.timer().phase());

    use Phase::*;
    assert_eq!(
        phases,
        vec![Focus, ShortBreak, Focus, ShortBreak, Focus, ShortBreak, Focus, LongBreak]
    );
    assert_eq!(app.timer().pomodoros_completed(), 4);
    assert_eq!(app.timer().seconds_remaining(), 15 * 60);
    assert_eq!(alerts.phases().len(), 7);
}

#[test]
fn one_minute_focus_takes_sixty_ticks() {
    let store = MemoryStore::new();
    let mut app = open(&store, &RecordingAlerts::default());
    app.set_duration(Phase::Focus, 1);
    app.start();
    for _ in 0..59 {
        assert!(app.tick().is_empty());
    }
    assert_eq!(app.timer().seconds_remaining(), 1);
    let events = app.tick();
    assert!(matches!(
        events[..],
        [Event::PhaseCompleted { completed: Phase::Focus, next: Phase::ShortBreak, skipped: false, .. }]
    ));
    assert!(!app.is_running());
}

#[test]
fn auto_start_chains_phases() {
    let store = MemoryStore::new();
    let mut app = open(&store, &RecordingAlerts::default());
    app.set_auto_start(true);
    app.set_duration(Phase::Focus, 1);
    let events = run_out(&mut app);
    assert!(matches!(events[0], Event::PhaseCompleted { auto_started: true, .. }));
    assert!(app.is_running());
    assert_eq!(app.timer().phase(), Phase::ShortBreak);
}

#[test]
fn travel_route_drives_cycle_and_arrival() {
    let store = MemoryStore::new();
    let mut app = open(&store, &RecordingAlerts::default());
    app.choose_path("gamma").unwrap();
    assert_eq!(app.cycle_length(), 3);

    let mut reached = Vec::new();
    for _ in 0..3 {
        // focus then break
        for event in app.skip_phase() {
            if let Event::DistanceAdvanced { waypoints_reached, .. } = event {
                reached.extend(waypoints_reached);
            }
        }
        if app.timer().phase() != Phase::Focus {
            app.skip_phase();
        }
    }

    assert_eq!(reached, vec!["gamma-1", "gamma-2", "gamma-3"]);
    assert!(app.travel().has_arrived());
    assert_eq!(app.travel().distance_traveled(), 30);
    assert_eq!(app.timer().pomodoros_completed(), 3);

    // Arrival is sticky; further focus sessions do not move the ship.
    let events = app.skip_phase();
    assert_eq!(events.len(), 1);
    assert_eq!(app.travel().distance_traveled(), 30);
}

#[test]
fn third_focus_on_gamma_is_followed_by_long_break() {
    let store = MemoryStore::new();
    let mut app = open(&store, &RecordingAlerts::default());
    app.choose_path("gamma").unwrap();
    app.skip_phase();
    app.skip_phase();
    app.skip_phase();
    app.skip_phase();
    let events = app.skip_phase();
    assert!(matches!(
        events[0],
        Event::PhaseCompleted { completed: Phase::Focus, next: Phase::LongBreak, pomodoros_completed: 3, .. }
    ));
}

#[test]
fn choosing_a_route_restarts_the_count() {
    let store = MemoryStore::new();
    let mut app = open(&store, &RecordingAlerts::default());
    app.skip_phase();
    app.skip_phase();
    assert_eq!(app.timer().pomodoros_completed(), 1);

    assert!(app.choose_path("omega").is_err());
    assert_eq!(app.timer().pomodoros_completed(), 0);
    assert!(app.travel().active_route().is_none());
    assert_eq!(app.cycle_length(), 4);
}

#[test]
fn break_completion_does_not_move_the_ship() {
    let store = MemoryStore::new();
    let mut app = open(&store, &RecordingAlerts::default());
    app.choose_path("alpha").unwrap();
    app.skip_phase();
    assert_eq!(app.travel().distance_traveled(), 10);
    let events = app.skip_phase();
    assert_eq!(events.len(), 1);
    assert_eq!(app.travel().distance_traveled(), 10);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn reload_restores_phase_count_route_and_settings() {
    let store = MemoryStore::new();
    let alerts = RecordingAlerts::default();
    {
        let mut app = open(&store, &alerts);
        app.set_duration(Phase::ShortBreak, 7);
        app.choose_path("beta").unwrap();
        app.skip_phase();
        app.start();
        app.tick();
        app.persist();
    }

    let app = open(&store, &alerts);
    assert_eq!(app.timer().phase(), Phase::ShortBreak);
    assert_eq!(app.timer().pomodoros_completed(), 1);
    // Countdown restarts at full length and paused.
    assert_eq!(app.timer().seconds_remaining(), 7 * 60);
    assert!(!app.is_running());
    assert_eq!(app.travel().active_route().map(|r| r.id.as_str()), Some("beta"));
    assert_eq!(app.travel().distance_traveled(), 10);
    assert!(app.travel().is_visited("beta-1"));
    assert_eq!(app.cycle_length(), 5);
}

#[test]
fn reload_forgets_completion_banner() {
    let store = MemoryStore::new();
    let alerts = RecordingAlerts::default();
    {
        let mut app = open(&store, &alerts);
        app.skip_phase();
        assert!(app.timer().completion_banner().is_some());
    }
    let app = open(&store, &alerts);
    assert!(app.timer().completion_banner().is_none());
}

#[test]
fn travel_reset_survives_reload() {
    let store = MemoryStore::new();
    let alerts = RecordingAlerts::default();
    {
        let mut app = open(&store, &alerts);
        app.choose_path("delta").unwrap();
        app.skip_phase();
        app.reset_travel();
    }
    let app = open(&store, &alerts);
    assert!(app.travel().active_route().is_none());
    assert_eq!(app.travel().distance_traveled(), 0);
    assert_eq!(app.timer().pomodoros_completed(), 0);
}
