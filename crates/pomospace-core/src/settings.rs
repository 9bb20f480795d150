//! User preferences: phase durations, cycle length and alert toggles.
//!
//! Settings are pure data. Every mutation goes through a setter that clamps
//! the value into its bounds instead of rejecting it. The blob is persisted
//! under the `"settings"` key of the key-value store.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::ConfigError;
use crate::timer::Phase;

pub const FOCUS_BOUNDS: RangeInclusive<u32> = 1..=90;
pub const SHORT_BREAK_BOUNDS: RangeInclusive<u32> = 1..=30;
pub const LONG_BREAK_BOUNDS: RangeInclusive<u32> = 1..=60;
pub const CYCLE_BOUNDS: RangeInclusive<u32> = 1..=12;

/// Keys accepted by [`Settings::get`] and [`Settings::apply`].
pub const KEYS: [&str; 8] = [
    "focus_duration",
    "short_break_duration",
    "long_break_duration",
    "pomodoros_before_long",
    "auto_start",
    "sound_enabled",
    "haptics_enabled",
    "notifications_enabled",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Minutes.
    #[serde(default = "default_focus_duration")]
    focus_duration: u32,
    /// Minutes.
    #[serde(default = "default_short_break")]
    short_break_duration: u32,
    /// Minutes.
    #[serde(default = "default_long_break")]
    long_break_duration: u32,
    /// Cycle length used when no route is active.
    #[serde(default = "default_pomodoros_before_long")]
    pomodoros_before_long: u32,
    #[serde(default)]
    auto_start: bool,
    #[serde(default = "default_true")]
    sound_enabled: bool,
    #[serde(default = "default_true")]
    haptics_enabled: bool,
    #[serde(default = "default_true")]
    notifications_enabled: bool,
}

/// The alert-related subset of [`Settings`], handed to alert dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPrefs {
    pub sound: bool,
    pub haptics: bool,
    pub notifications: bool,
}

fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_pomodoros_before_long() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            pomodoros_before_long: default_pomodoros_before_long(),
            auto_start: false,
            sound_enabled: true,
            haptics_enabled: true,
            notifications_enabled: true,
        }
    }
}

fn clamp(value: u32, bounds: &RangeInclusive<u32>) -> u32 {
    value.clamp(*bounds.start(), *bounds.end())
}

pub fn duration_bounds(phase: Phase) -> RangeInclusive<u32> {
    match phase {
        Phase::Focus => FOCUS_BOUNDS,
        Phase::ShortBreak => SHORT_BREAK_BOUNDS,
        Phase::LongBreak => LONG_BREAK_BOUNDS,
    }
}

impl Settings {
    // ── Queries ──────────────────────────────────────────────────────

    /// Configured length of `phase` in minutes.
    pub fn duration_min(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_duration,
            Phase::ShortBreak => self.short_break_duration,
            Phase::LongBreak => self.long_break_duration,
        }
    }

    /// Configured length of `phase` in seconds.
    pub fn duration_secs(&self, phase: Phase) -> u32 {
        self.duration_min(phase).saturating_mul(60)
    }

    pub fn pomodoros_before_long(&self) -> u32 {
        self.pomodoros_before_long
    }

    pub fn auto_start(&self) -> bool {
        self.auto_start
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    pub fn haptics_enabled(&self) -> bool {
        self.haptics_enabled
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn alert_prefs(&self) -> AlertPrefs {
        AlertPrefs {
            sound: self.sound_enabled,
            haptics: self.haptics_enabled,
            notifications: self.notifications_enabled,
        }
    }

    // ── Setters ──────────────────────────────────────────────────────

    /// Set the duration of `phase` in minutes, clamped to its bounds.
    /// Returns the stored value.
    pub fn set_duration(&mut self, phase: Phase, minutes: u32) -> u32 {
        let minutes = clamp(minutes, &duration_bounds(phase));
        match phase {
            Phase::Focus => self.focus_duration = minutes,
            Phase::ShortBreak => self.short_break_duration = minutes,
            Phase::LongBreak => self.long_break_duration = minutes,
        }
        minutes
    }

    pub fn set_pomodoros_before_long(&mut self, count: u32) -> u32 {
        self.pomodoros_before_long = clamp(count, &CYCLE_BOUNDS);
        self.pomodoros_before_long
    }

    pub fn set_auto_start(&mut self, value: bool) {
        self.auto_start = value;
    }

    pub fn set_sound_enabled(&mut self, value: bool) {
        self.sound_enabled = value;
    }

    pub fn set_haptics_enabled(&mut self, value: bool) {
        self.haptics_enabled = value;
    }

    pub fn set_notifications_enabled(&mut self, value: bool) {
        self.notifications_enabled = value;
    }

    /// Re-apply every bound. Used after deserializing a blob that may have
    /// been written by hand.
    pub fn clamped(mut self) -> Self {
        for phase in Phase::ALL {
            let current = self.duration_min(phase);
            self.set_duration(phase, current);
        }
        self.set_pomodoros_before_long(self.pomodoros_before_long);
        self
    }

    // ── Keyed access ─────────────────────────────────────────────────

    /// Get a setting rendered as a string.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(|v| v.to_string())
    }

    /// Set a setting from its string form.
    ///
    /// Returns the phase whose duration changed, if any, so the caller can
    /// re-sync a countdown that is showing that phase.
    pub fn apply(&mut self, key: &str, raw: &str) -> Result<Option<Phase>, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let number = || {
            raw.trim()
                .parse::<u32>()
                .map_err(|e| invalid(format!("'{raw}' is not a whole number: {e}")))
        };
        let flag = || {
            raw.trim()
                .parse::<bool>()
                .map_err(|e| invalid(format!("'{raw}' is not true/false: {e}")))
        };

        match key {
            "focus_duration" => {
                self.set_duration(Phase::Focus, number()?);
                return Ok(Some(Phase::Focus));
            }
            "short_break_duration" => {
                self.set_duration(Phase::ShortBreak, number()?);
                return Ok(Some(Phase::ShortBreak));
            }
            "long_break_duration" => {
                self.set_duration(Phase::LongBreak, number()?);
                return Ok(Some(Phase::LongBreak));
            }
            "pomodoros_before_long" => {
                self.set_pomodoros_before_long(number()?);
            }
            "auto_start" => self.set_auto_start(flag()?),
            "sound_enabled" => self.set_sound_enabled(flag()?),
            "haptics_enabled" => self.set_haptics_enabled(flag()?),
            "notifications_enabled" => self.set_notifications_enabled(flag()?),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.duration_min(Phase::Focus), 25);
        assert_eq!(s.duration_min(Phase::ShortBreak), 5);
        assert_eq!(s.duration_min(Phase::LongBreak), 15);
        assert_eq!(s.pomodoros_before_long(), 4);
        assert!(!s.auto_start());
        assert!(s.sound_enabled());
        assert!(s.haptics_enabled());
        assert!(s.notifications_enabled());
    }

    #[test]
    fn durations_clamp_at_bounds() {
        let mut s = Settings::default();
        assert_eq!(s.set_duration(Phase::Focus, 0), 1);
        assert_eq!(s.set_duration(Phase::Focus, 500), 90);
        assert_eq!(s.set_duration(Phase::ShortBreak, 31), 30);
        assert_eq!(s.set_duration(Phase::LongBreak, 61), 60);
        assert_eq!(s.set_pomodoros_before_long(0), 1);
    }

    #[test]
    fn partial_blob_falls_back_per_field() {
        let s: Settings = serde_json::from_str(r#"{"focus_duration": 50}"#).unwrap();
        assert_eq!(s.duration_min(Phase::Focus), 50);
        assert_eq!(s.duration_min(Phase::LongBreak), 15);
        assert!(s.sound_enabled());
    }

    #[test]
    fn clamped_repairs_hand_edited_blob() {
        let s: Settings =
            serde_json::from_str(r#"{"focus_duration": 0, "long_break_duration": 900}"#).unwrap();
        let s = s.clamped();
        assert_eq!(s.duration_min(Phase::Focus), 1);
        assert_eq!(s.duration_min(Phase::LongBreak), 60);
    }

    #[test]
    fn apply_reports_duration_phase() {
        let mut s = Settings::default();
        assert_eq!(s.apply("short_break_duration", "7").unwrap(), Some(Phase::ShortBreak));
        assert_eq!(s.duration_min(Phase::ShortBreak), 7);
        assert_eq!(s.apply("auto_start", "true").unwrap(), None);
        assert!(s.auto_start());
    }

    #[test]
    fn apply_rejects_unknown_key_and_bad_value() {
        let mut s = Settings::default();
        assert!(matches!(s.apply("volume", "3"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            s.apply("focus_duration", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            s.apply("sound_enabled", "loud"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn get_renders_every_key() {
        let s = Settings::default();
        for key in KEYS {
            assert!(s.get(key).is_some(), "missing {key}");
        }
        assert_eq!(s.get("focus_duration").as_deref(), Some("25"));
        assert_eq!(s.get("auto_start").as_deref(), Some("false"));
        assert!(s.get("nope").is_none());
    }

    proptest! {
        #[test]
        fn set_duration_always_lands_in_bounds(minutes in any::<u32>()) {
            let mut s = Settings::default();
            for phase in Phase::ALL {
                let stored = s.set_duration(phase, minutes);
                prop_assert!(duration_bounds(phase).contains(&stored));
                prop_assert_eq!(s.duration_secs(phase), stored * 60);
            }
        }
    }
}
