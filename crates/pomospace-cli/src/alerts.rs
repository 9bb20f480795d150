//! Terminal alert channels.

use std::io::Write;

use pomospace_core::{AlertDispatcher, AlertPrefs, Phase};

/// Rings the terminal bell and prints a completion banner on stderr.
///
/// Terminals have no vibration motor, so the haptics toggle is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAlerts;

impl AlertDispatcher for TerminalAlerts {
    fn trigger_session_complete(&self, completed: Phase, prefs: AlertPrefs) {
        // Detached so a blocked stderr never holds up the countdown.
        let spawned = std::thread::Builder::new()
            .name("pomospace-alert".into())
            .spawn(move || {
                let mut err = std::io::stderr().lock();
                if prefs.sound {
                    let _ = err.write_all(b"\x07");
                }
                if prefs.notifications {
                    let _ = writeln!(
                        err,
                        "\n*** {} ***\n{}",
                        completed.completion_title(),
                        completed.completion_body()
                    );
                }
                let _ = err.flush();
                if prefs.haptics {
                    tracing::debug!("haptics not supported on this terminal");
                }
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to dispatch alert");
        }
    }
}
