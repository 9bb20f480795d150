//! Foreground loop that runs a countdown in real time.
//!
//! [`run`] merges the [`Ticker`] and a channel of user [`Control`]s in one
//! `select!`, so ticks and commands are applied strictly one after another.
//! After each step the ticker is re-synced with the engine's running flag,
//! and a completed phase always restarts the cadence.

use std::ops::ControlFlow;
use tokio::sync::mpsc;

use crate::app::App;
use crate::events::Event;
use crate::timer::Ticker;

/// User commands accepted by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Start,
    Pause,
    Toggle,
    Reset,
    Skip,
    Quit,
}

impl Control {
    /// Keyboard mapping: space/enter toggles, `r` resets, `s` skips,
    /// `q` quits. The words `start` and `pause` are accepted as explicit
    /// non-toggling variants.
    pub fn from_key(input: &str) -> Option<Self> {
        match input.trim_end_matches(['\r', '\n']) {
            " " | "" => Some(Control::Toggle),
            key => match key.trim().to_ascii_lowercase().as_str() {
                "r" => Some(Control::Reset),
                "s" => Some(Control::Skip),
                "q" => Some(Control::Quit),
                "start" => Some(Control::Start),
                "pause" => Some(Control::Pause),
                _ => None,
            },
        }
    }
}

/// Why [`run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `Control::Quit` received or every sender dropped.
    Quit,
    /// The event callback asked to stop.
    Stopped,
}

/// Drive `app` until quit. `on_event` sees every event produced and may
/// return `ControlFlow::Break` to stop the loop.
pub async fn run<F>(
    app: &mut App,
    ticker: &mut Ticker,
    controls: &mut mpsc::Receiver<Control>,
    mut on_event: F,
) -> Exit
where
    F: FnMut(&Event) -> ControlFlow<()>,
{
    loop {
        ticker.sync(app.is_running());

        let events = tokio::select! {
            _ = ticker.tick() => {
                let events = app.tick();
                if events.iter().any(|e| matches!(e, Event::PhaseCompleted { .. })) {
                    ticker.stop();
                }
                events
            }
            control = controls.recv() => match control {
                None | Some(Control::Quit) => {
                    ticker.stop();
                    return Exit::Quit;
                }
                Some(control) => {
                    tracing::debug!(?control, "control received");
                    let events = app.handle(control);
                    if control == Control::Skip {
                        ticker.stop();
                    }
                    events
                }
            },
        };

        for event in &events {
            if on_event(event).is_break() {
                ticker.stop();
                return Exit::Stopped;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::RecordingAlerts;
    use crate::storage::Persistence;
    use crate::timer::Phase;
    use crate::travel::RouteCatalog;
    use std::sync::Arc;
    use std::time::Duration;

    fn app(alerts: RecordingAlerts) -> App {
        let mut app = App::load(
            Arc::new(RouteCatalog::builtin().unwrap()),
            Box::new(alerts),
            Persistence::ephemeral(),
        );
        app.set_duration(Phase::Focus, 1);
        app
    }

    #[test]
    fn key_mapping() {
        assert_eq!(Control::from_key(" \n"), Some(Control::Toggle));
        assert_eq!(Control::from_key("\n"), Some(Control::Toggle));
        assert_eq!(Control::from_key("R"), Some(Control::Reset));
        assert_eq!(Control::from_key("s\r\n"), Some(Control::Skip));
        assert_eq!(Control::from_key("q"), Some(Control::Quit));
        assert_eq!(Control::from_key("start\n"), Some(Control::Start));
        assert_eq!(Control::from_key("Pause"), Some(Control::Pause));
        assert_eq!(Control::from_key("x"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_focus_to_completion_once() {
        let alerts = RecordingAlerts::default();
        let mut app = app(alerts.clone());
        app.start();
        let (_tx, mut rx) = mpsc::channel(4);
        let mut ticker = Ticker::default();

        let started = tokio::time::Instant::now();
        let exit = run(&mut app, &mut ticker, &mut rx, |event| match event {
            Event::PhaseCompleted { .. } => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        })
        .await;

        assert_eq!(exit, Exit::Stopped);
        assert_eq!(started.elapsed(), Duration::from_secs(60));
        assert_eq!(app.timer().phase(), Phase::ShortBreak);
        assert_eq!(app.timer().pomodoros_completed(), 1);
        assert_eq!(alerts.phases(), vec![Phase::Focus]);
        assert!(!ticker.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn paused_app_does_not_tick() {
        let mut app = app(RecordingAlerts::default());
        let (tx, mut rx) = mpsc::channel(4);
        let mut ticker = Ticker::default();

        let quitter = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(120)).await;
            let _ = tx.send(Control::Quit).await;
        });
        let exit = run(&mut app, &mut ticker, &mut rx, |_| ControlFlow::Continue(())).await;
        quitter.await.unwrap();

        assert_eq!(exit, Exit::Quit);
        assert_eq!(app.timer().seconds_remaining(), 60);
        assert_eq!(app.timer().phase(), Phase::Focus);
    }

    #[tokio::test(start_paused = true)]
    async fn controls_interleave_with_ticks() {
        let mut app = app(RecordingAlerts::default());
        let (tx, mut rx) = mpsc::channel(8);
        let mut ticker = Ticker::default();

        let script = tokio::spawn(async move {
            tx.send(Control::Start).await.unwrap();
            tokio::time::sleep(Duration::from_millis(10_500)).await;
            tx.send(Control::Pause).await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            tx.send(Control::Quit).await.unwrap();
        });
        let mut seen = Vec::new();
        let exit = run(&mut app, &mut ticker, &mut rx, |event| {
            seen.push(event.clone());
            ControlFlow::Continue(())
        })
        .await;
        script.await.unwrap();

        assert_eq!(exit, Exit::Quit);
        assert_eq!(app.timer().seconds_remaining(), 50);
        assert!(!app.is_running());
        assert!(matches!(seen.first(), Some(Event::TimerStarted { .. })));
        assert!(matches!(seen.last(), Some(Event::TimerPaused { seconds_remaining: 50, .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_sender_quits() {
        let mut app = app(RecordingAlerts::default());
        let (tx, mut rx) = mpsc::channel::<Control>(1);
        drop(tx);
        let mut ticker = Ticker::default();
        let exit = run(&mut app, &mut ticker, &mut rx, |_| ControlFlow::Continue(())).await;
        assert_eq!(exit, Exit::Quit);
    }
}
