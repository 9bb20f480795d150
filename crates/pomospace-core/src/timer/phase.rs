use serde::{Deserialize, Serialize};

/// A countdown segment of the focus cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Focus, Phase::ShortBreak, Phase::LongBreak];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }

    /// Notification title shown when this phase finishes.
    pub fn completion_title(self) -> &'static str {
        match self {
            Phase::Focus => "Focus session complete!",
            Phase::ShortBreak => "Short break over",
            Phase::LongBreak => "Long break over",
        }
    }

    /// Notification body shown when this phase finishes.
    pub fn completion_body(self) -> &'static str {
        match self {
            Phase::Focus => "Time for a break. Step away for a moment.",
            Phase::ShortBreak => "Ready to focus again?",
            Phase::LongBreak => "Recharged and ready. Let's go.",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Render a countdown as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_camel_case() {
        assert_eq!(serde_json::to_string(&Phase::ShortBreak).unwrap(), "\"shortBreak\"");
        let parsed: Phase = serde_json::from_str("\"longBreak\"").unwrap();
        assert_eq!(parsed, Phase::LongBreak);
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(90 * 60), "90:00");
    }
}
