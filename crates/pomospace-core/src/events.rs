use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the system produces an Event.
/// Front ends print or forward them; nothing in the core consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: Phase,
        seconds_remaining: u32,
        at: DateTime<Utc>,
    },
    /// A phase ran out or was skipped.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        pomodoros_completed: u32,
        skipped: bool,
        /// Whether the next phase is already counting down.
        auto_started: bool,
        at: DateTime<Utc>,
    },
    DurationChanged {
        phase: Phase,
        minutes: u32,
        /// The active countdown was stopped and refilled.
        countdown_reset: bool,
        at: DateTime<Utc>,
    },
    RouteChosen {
        route_id: String,
        at: DateTime<Utc>,
    },
    DistanceAdvanced {
        route_id: String,
        distance_traveled: u32,
        waypoints_reached: Vec<String>,
        arrived: bool,
        at: DateTime<Utc>,
    },
    TravelReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        seconds_remaining: u32,
        total_secs: u32,
        clock: String,
        progress: f64,
        pomodoros_completed: u32,
        cycle_length: u32,
        session_number: u32,
        is_running: bool,
        just_completed: Option<Phase>,
        route_id: Option<String>,
        distance_traveled: u32,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_serialization() {
        let event = Event::PhaseCompleted {
            completed: Phase::Focus,
            next: Phase::ShortBreak,
            pomodoros_completed: 1,
            skipped: false,
            auto_started: false,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "PhaseCompleted");
        assert_eq!(json["completed"], "focus");
        assert_eq!(json["next"], "shortBreak");
    }
}
