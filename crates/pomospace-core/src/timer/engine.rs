//! Phase engine.
//!
//! A second-granularity countdown state machine over
//! `{Focus, ShortBreak, LongBreak} x {Running, Paused}`. It owns no thread
//! and no clock: the caller feeds it one [`TimerEngine::tick`] per elapsed
//! second while it is running (see [`crate::timer::Ticker`]).
//!
//! ## State Transitions
//!
//! ```text
//! Paused -start-> Running -pause-> Paused
//! Running -tick(last second)-> advance
//! any -skip_phase-> Paused -> advance
//! advance: Focus -> ShortBreak | LongBreak, break -> Focus
//! ```
//!
//! Phase completion reaches the travel engine and the alert dispatcher
//! through [`Collaborators`], passed in per call.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::phase::Phase;
use crate::alerts::AlertDispatcher;
use crate::events::Event;
use crate::settings::Settings;
use crate::travel::TravelEngine;

/// How long the "just completed" banner stays visible.
pub const JUST_COMPLETED_TTL_MS: i64 = 2_500;

/// The part of the timer that survives a restart.
///
/// Running state and the completion banner are transient and always come
/// back as paused / none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerProgress {
    #[serde(default)]
    pub phase: Phase,
    #[serde(default)]
    pub pomodoros_completed: u32,
}

/// The phase that just finished and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionBanner {
    pub phase: Phase,
    pub at: DateTime<Utc>,
}

impl CompletionBanner {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.at + Duration::milliseconds(JUST_COMPLETED_TTL_MS)
    }
}

/// Everything a phase completion reaches out to.
pub struct Collaborators<'a> {
    pub settings: &'a Settings,
    pub travel: &'a mut TravelEngine,
    pub alerts: &'a dyn AlertDispatcher,
}

impl Collaborators<'_> {
    fn cycle_length(&self) -> u32 {
        self.travel.cycle_length(self.settings.pomodoros_before_long())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerEngine {
    phase: Phase,
    seconds_remaining: u32,
    pomodoros_completed: u32,
    is_running: bool,
    just_completed: Option<CompletionBanner>,
}

impl TimerEngine {
    /// A paused engine at the start of a focus phase.
    pub fn new(settings: &Settings) -> Self {
        Self::restore(TimerProgress::default(), settings)
    }

    /// Rebuild from persisted progress. The countdown starts full.
    pub fn restore(progress: TimerProgress, settings: &Settings) -> Self {
        Self {
            phase: progress.phase,
            seconds_remaining: settings.duration_secs(progress.phase),
            pomodoros_completed: progress.pomodoros_completed,
            is_running: false,
            just_completed: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn pomodoros_completed(&self) -> u32 {
        self.pomodoros_completed
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn progress_snapshot(&self) -> TimerProgress {
        TimerProgress {
            phase: self.phase,
            pomodoros_completed: self.pomodoros_completed,
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self, settings: &Settings) -> f64 {
        let total = settings.duration_secs(self.phase);
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.seconds_remaining as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// The phase to announce, if it finished less than
    /// [`JUST_COMPLETED_TTL_MS`] before `now`.
    pub fn just_completed(&self, now: DateTime<Utc>) -> Option<Phase> {
        self.just_completed
            .filter(|banner| banner.is_visible(now))
            .map(|banner| banner.phase)
    }

    pub fn completion_banner(&self) -> Option<CompletionBanner> {
        self.just_completed
    }

    /// 1-based number of the cycle currently in progress.
    pub fn session_number(&self, cycle_length: u32) -> u32 {
        self.pomodoros_completed / cycle_length.max(1) + 1
    }

    /// Focus sessions filled in the current cycle. A cycle that was just
    /// closed shows as full until the next focus completes.
    pub fn cycle_position(&self, cycle_length: u32) -> u32 {
        let cycle_length = cycle_length.max(1);
        match self.pomodoros_completed % cycle_length {
            0 if self.pomodoros_completed > 0 => cycle_length,
            filled => filled,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running {
            return None;
        }
        self.is_running = true;
        tracing::debug!(phase = %self.phase, remaining = self.seconds_remaining, "timer started");
        Some(Event::TimerStarted {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running {
            return None;
        }
        self.is_running = false;
        tracing::debug!(phase = %self.phase, remaining = self.seconds_remaining, "timer paused");
        Some(Event::TimerPaused {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        })
    }

    /// Stop and refill the current phase. Phase and count are kept.
    pub fn reset(&mut self, settings: &Settings) -> Event {
        self.is_running = false;
        self.seconds_remaining = settings.duration_secs(self.phase);
        Event::TimerReset {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            at: Utc::now(),
        }
    }

    /// Consume one elapsed second. Returns the completion events when this
    /// second finished the phase, nothing otherwise.
    pub fn tick(&mut self, ctx: Collaborators<'_>) -> Vec<Event> {
        if !self.is_running {
            return Vec::new();
        }
        if self.seconds_remaining <= 1 {
            self.seconds_remaining = 0;
            return self.advance(ctx, false);
        }
        self.seconds_remaining -= 1;
        Vec::new()
    }

    /// End the current phase now, with the same effects as running out.
    pub fn skip_phase(&mut self, ctx: Collaborators<'_>) -> Vec<Event> {
        self.is_running = false;
        self.advance(ctx, true)
    }

    /// Re-sync after the duration of `phase` changed in `settings`.
    ///
    /// Only the active phase is affected: the countdown stops and refills.
    /// Returns whether that happened.
    pub fn apply_duration_change(&mut self, phase: Phase, settings: &Settings) -> bool {
        if phase != self.phase {
            return false;
        }
        self.is_running = false;
        self.seconds_remaining = settings.duration_secs(phase);
        true
    }

    pub(crate) fn reset_pomodoros(&mut self) {
        self.pomodoros_completed = 0;
    }

    #[cfg(test)]
    pub(crate) fn restore_pomodoros(&mut self, count: u32) {
        self.pomodoros_completed = count;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, ctx: Collaborators<'_>, skipped: bool) -> Vec<Event> {
        let completed = self.phase;
        let mut events = Vec::with_capacity(2);

        if completed == Phase::Focus {
            self.pomodoros_completed = self.pomodoros_completed.saturating_add(1);
        }
        let next = match completed {
            Phase::Focus if self.pomodoros_completed % ctx.cycle_length() == 0 => {
                Phase::LongBreak
            }
            Phase::Focus => Phase::ShortBreak,
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };
        let travel_event = if completed == Phase::Focus {
            ctx.travel.advance_distance()
        } else {
            None
        };

        ctx.alerts
            .trigger_session_complete(completed, ctx.settings.alert_prefs());

        let now = Utc::now();
        self.just_completed = Some(CompletionBanner {
            phase: completed,
            at: now,
        });
        self.phase = next;
        self.seconds_remaining = ctx.settings.duration_secs(next);
        self.is_running = ctx.settings.auto_start();

        tracing::info!(
            completed = %completed,
            next = %next,
            pomodoros = self.pomodoros_completed,
            skipped,
            "phase completed"
        );
        events.push(Event::PhaseCompleted {
            completed,
            next,
            pomodoros_completed: self.pomodoros_completed,
            skipped,
            auto_started: self.is_running,
            at: now,
        });
        events.extend(travel_event);
        events
    }
}
