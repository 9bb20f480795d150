//! Session-complete alert dispatch.
//!
//! The phase engine calls [`AlertDispatcher::trigger_session_complete`] once
//! per completed phase and never looks at the outcome. Implementations must
//! return promptly (hand slow work to a thread or task) and must swallow
//! their own failures.

use std::sync::{Arc, Mutex};

use crate::settings::AlertPrefs;
use crate::timer::Phase;

pub trait AlertDispatcher: Send + Sync {
    /// Announce that `completed` finished. `prefs` says which channels the
    /// user has enabled.
    fn trigger_session_complete(&self, completed: Phase, prefs: AlertPrefs);
}

/// Drops every alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAlerts;

impl AlertDispatcher for NullAlerts {
    fn trigger_session_complete(&self, completed: Phase, _prefs: AlertPrefs) {
        tracing::trace!(%completed, "alert dropped");
    }
}

/// Remembers every alert it was asked to send. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerts {
    sent: Arc<Mutex<Vec<(Phase, AlertPrefs)>>>,
}

impl RecordingAlerts {
    pub fn phases(&self) -> Vec<Phase> {
        self.sent().into_iter().map(|(phase, _)| phase).collect()
    }

    pub fn sent(&self) -> Vec<(Phase, AlertPrefs)> {
        match self.sent.lock() {
            Ok(sent) => sent.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AlertDispatcher for RecordingAlerts {
    fn trigger_session_complete(&self, completed: Phase, prefs: AlertPrefs) {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((completed, prefs));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn recording_clones_share_log() {
        let alerts = RecordingAlerts::default();
        let handle = alerts.clone();
        let prefs = Settings::default().alert_prefs();
        alerts.trigger_session_complete(Phase::Focus, prefs);
        alerts.trigger_session_complete(Phase::ShortBreak, prefs);
        assert_eq!(handle.phases(), vec![Phase::Focus, Phase::ShortBreak]);
        assert!(handle.sent()[0].1.sound);
    }

    #[test]
    fn null_alerts_accepts_anything() {
        let prefs = Settings::default().alert_prefs();
        NullAlerts.trigger_session_complete(Phase::LongBreak, prefs);
    }
}
