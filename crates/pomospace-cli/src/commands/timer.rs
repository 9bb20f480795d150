use clap::Subcommand;
use std::ops::ControlFlow;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;

use pomospace_core::driver::{self, Control};
use pomospace_core::{App, Config, Event, Ticker};

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Count down the showing phase in the foreground until it completes
    Start,
    /// End the showing phase now (counts as a completed phase)
    Skip,
    /// Refill the showing phase and pause
    Reset,
    /// Interactive countdown: space/enter toggles, r resets, s skips, q quits,
    /// "start"/"pause" set the state explicitly
    Run {
        /// Exit after the first completed phase
        #[arg(long)]
        once: bool,
    },
}

pub fn run(action: TimerAction, config: &Config) -> CmdResult {
    let mut app = open_app(config)?;

    match action {
        TimerAction::Status => print_json(&app.snapshot())?,
        TimerAction::Start => {
            app.start();
            drive(&mut app, config, false, true)?;
        }
        TimerAction::Skip => {
            for event in app.skip_phase() {
                print_json(&event)?;
            }
        }
        TimerAction::Reset => print_json(&app.reset())?,
        TimerAction::Run { once } => {
            app.start();
            drive(&mut app, config, true, once)?;
        }
    }
    Ok(())
}

/// Run the countdown on a current-thread runtime, one JSON event per line.
fn drive(
    app: &mut App,
    config: &Config,
    keyboard: bool,
    stop_after_phase: bool,
) -> CmdResult {
    let (tx, mut rx) = mpsc::channel(8);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let exit = runtime.block_on(async {
        let signal_tx = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = signal_tx.send(Control::Quit).await;
            }
        });
        if keyboard {
            tokio::spawn(read_keys(tx));
        } else {
            // Keep the channel open; only ticks and Ctrl-C drive the loop.
            tokio::spawn(async move {
                let _keep = tx;
                std::future::pending::<()>().await;
            });
        }

        let mut ticker = Ticker::new(config.tick_period());
        if let Ok(line) = serde_json::to_string(&app.snapshot()) {
            println!("{line}");
        }
        driver::run(app, &mut ticker, &mut rx, |event| {
            if let Ok(line) = serde_json::to_string(event) {
                println!("{line}");
            }
            if stop_after_phase && matches!(event, Event::PhaseCompleted { .. }) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await
    });
    // Stdin reads sit on a blocking thread that would stall a normal shutdown.
    runtime.shutdown_background();

    tracing::debug!(?exit, "countdown loop ended");
    app.persist();
    Ok(())
}

async fn read_keys(tx: mpsc::Sender<Control>) {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match Control::from_key(&line) {
                Some(control) => {
                    if tx.send(control).await.is_err() {
                        return;
                    }
                }
                None => tracing::debug!(input = %line, "ignored key"),
            },
            // Closed stdin leaves the countdown running until Ctrl-C.
            Ok(None) => {
                std::future::pending::<()>().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "stdin unavailable, keyboard controls disabled");
                std::future::pending::<()>().await;
            }
        }
    }
}
