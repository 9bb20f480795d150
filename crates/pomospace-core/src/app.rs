//! Composition root.
//!
//! [`App`] owns the settings, timer and travel state together with the
//! alert dispatcher and the persistence adapter. Every mutation goes through
//! `&mut App`, which makes it the single writer: a tick and a user command
//! can never interleave.
//!
//! ## Usage
//!
//! ```ignore
//! let mut app = App::load(catalog, Box::new(alerts), persistence);
//! app.start();
//! // once per elapsed second while app.is_running():
//! for event in app.tick() { /* ... */ }
//! ```

use chrono::Utc;
use std::sync::Arc;

use crate::alerts::AlertDispatcher;
use crate::driver::Control;
use crate::error::Result;
use crate::events::Event;
use crate::settings::Settings;
use crate::storage::{Config, Database, Persistence};
use crate::timer::{format_clock, Collaborators, Phase, TimerEngine};
use crate::travel::{RouteCatalog, TravelEngine};

pub struct App {
    settings: Settings,
    timer: TimerEngine,
    travel: TravelEngine,
    alerts: Box<dyn AlertDispatcher>,
    persistence: Persistence,
}

impl App {
    /// Open the configured database and catalog and load state from them.
    ///
    /// A database that cannot be opened degrades to in-memory state for this
    /// process, and a broken catalog override degrades to the built-in
    /// routes. Only an unreadable built-in catalog is an error.
    pub fn open(config: &Config, alerts: Box<dyn AlertDispatcher>) -> Result<Self> {
        let catalog = load_catalog(config)?;
        let persistence = match config
            .database_path()
            .map_err(crate::CoreError::from)
            .and_then(|path| Ok(Database::open(&path)?))
        {
            Ok(db) => Persistence::new(Box::new(db)),
            Err(e) => {
                tracing::warn!(error = %e, "database unavailable, state will not be saved");
                Persistence::ephemeral()
            }
        };
        Ok(Self::load(Arc::new(catalog), alerts, persistence))
    }

    /// Build from whatever `persistence` holds, falling back to defaults.
    pub fn load(
        catalog: Arc<RouteCatalog>,
        alerts: Box<dyn AlertDispatcher>,
        persistence: Persistence,
    ) -> Self {
        let settings = persistence.load_settings();
        let timer = TimerEngine::restore(persistence.load_timer(), &settings);
        let travel = TravelEngine::restore(persistence.load_travel(), catalog);
        tracing::debug!(
            phase = %timer.phase(),
            pomodoros = timer.pomodoros_completed(),
            route = travel.state().current_route_id.as_deref().unwrap_or("-"),
            "state loaded"
        );
        Self {
            settings,
            timer,
            travel,
            alerts,
            persistence,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn travel(&self) -> &TravelEngine {
        &self.travel
    }

    pub fn catalog(&self) -> &RouteCatalog {
        self.travel.catalog()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn cycle_length(&self) -> u32 {
        self.travel
            .cycle_length(self.settings.pomodoros_before_long())
    }

    pub fn progress(&self) -> f64 {
        self.timer.progress(&self.settings)
    }

    pub fn session_number(&self) -> u32 {
        self.timer.session_number(self.cycle_length())
    }

    pub fn snapshot(&self) -> Event {
        let now = Utc::now();
        let seconds_remaining = self.timer.seconds_remaining();
        Event::StateSnapshot {
            phase: self.timer.phase(),
            seconds_remaining,
            total_secs: self.settings.duration_secs(self.timer.phase()),
            clock: format_clock(seconds_remaining),
            progress: self.progress(),
            pomodoros_completed: self.timer.pomodoros_completed(),
            cycle_length: self.cycle_length(),
            session_number: self.session_number(),
            is_running: self.timer.is_running(),
            just_completed: self.timer.just_completed(now),
            route_id: self.travel.active_route().map(|r| r.id.clone()),
            distance_traveled: self.travel.distance_traveled(),
            at: now,
        }
    }

    // ── Timer commands ───────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.timer.start()
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.timer.pause()
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.timer.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Event {
        self.timer.reset(&self.settings)
    }

    /// Feed one elapsed second to the countdown.
    pub fn tick(&mut self) -> Vec<Event> {
        let ctx = Collaborators {
            settings: &self.settings,
            travel: &mut self.travel,
            alerts: self.alerts.as_ref(),
        };
        let events = self.timer.tick(ctx);
        if !events.is_empty() {
            self.save_progress();
        }
        events
    }

    pub fn skip_phase(&mut self) -> Vec<Event> {
        let ctx = Collaborators {
            settings: &self.settings,
            travel: &mut self.travel,
            alerts: self.alerts.as_ref(),
        };
        let events = self.timer.skip_phase(ctx);
        self.save_progress();
        events
    }

    /// Apply a driver control. `Quit` is the driver's business and yields
    /// nothing here.
    pub fn handle(&mut self, control: Control) -> Vec<Event> {
        match control {
            Control::Start => self.start().into_iter().collect(),
            Control::Pause => self.pause().into_iter().collect(),
            Control::Toggle => self.toggle().into_iter().collect(),
            Control::Reset => vec![self.reset()],
            Control::Skip => self.skip_phase(),
            Control::Quit => Vec::new(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Change a phase duration (minutes, clamped). If `phase` is showing,
    /// its countdown stops and refills.
    pub fn set_duration(&mut self, phase: Phase, minutes: u32) -> Event {
        let minutes = self.settings.set_duration(phase, minutes);
        self.persistence.save_settings(&self.settings);
        self.duration_changed(phase, minutes)
    }

    pub fn set_pomodoros_before_long(&mut self, count: u32) -> u32 {
        let count = self.settings.set_pomodoros_before_long(count);
        self.persistence.save_settings(&self.settings);
        count
    }

    pub fn set_auto_start(&mut self, value: bool) {
        self.settings.set_auto_start(value);
        self.persistence.save_settings(&self.settings);
    }

    /// Keyed setter used by front ends. Returns a [`Event::DurationChanged`]
    /// when a duration was edited.
    pub fn set_setting(&mut self, key: &str, raw: &str) -> Result<Option<Event>> {
        let changed = self.settings.apply(key, raw)?;
        self.persistence.save_settings(&self.settings);
        Ok(changed.map(|phase| {
            let minutes = self.settings.duration_min(phase);
            self.duration_changed(phase, minutes)
        }))
    }

    /// Restore default settings. The showing phase is re-synced if its
    /// duration moved.
    pub fn reset_settings(&mut self) -> Option<Event> {
        let before = self.settings.duration_min(self.timer.phase());
        self.settings = Settings::default();
        self.persistence.save_settings(&self.settings);
        let phase = self.timer.phase();
        let after = self.settings.duration_min(phase);
        (before != after).then(|| self.duration_changed(phase, after))
    }

    fn duration_changed(&mut self, phase: Phase, minutes: u32) -> Event {
        let countdown_reset = self.timer.apply_duration_change(phase, &self.settings);
        Event::DurationChanged {
            phase,
            minutes,
            countdown_reset,
            at: Utc::now(),
        }
    }

    // ── Travel ───────────────────────────────────────────────────────

    /// Select a route. The cycle count restarts even when the id is
    /// unknown; that case is reported as [`crate::CoreError::UnknownRoute`].
    pub fn choose_path(&mut self, route_id: &str) -> Result<Event> {
        let result = self.travel.choose_path(route_id, &mut self.timer);
        self.save_progress();
        result
    }

    pub fn reset_travel(&mut self) -> Event {
        let event = self.travel.reset(&mut self.timer);
        self.save_progress();
        event
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn save_progress(&self) {
        self.persistence.save_timer(&self.timer.progress_snapshot());
        self.persistence.save_travel(self.travel.state());
    }

    /// Write every namespace.
    pub fn persist(&self) {
        self.persistence.save_settings(&self.settings);
        self.save_progress();
    }
}

fn load_catalog(config: &Config) -> Result<RouteCatalog> {
    if let Some(path) = &config.routes.catalog_file {
        match RouteCatalog::from_file(path) {
            Ok(catalog) => return Ok(catalog),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "route catalog override rejected");
            }
        }
    }
    Ok(RouteCatalog::builtin()?)
}
