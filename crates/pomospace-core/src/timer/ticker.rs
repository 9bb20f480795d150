//! The single tick source behind a running countdown.
//!
//! A [`Ticker`] is either stopped (never yields) or holds one
//! `tokio::time::Interval` whose first tick is a full period after it was
//! installed. Stopping drops the interval, so no tick can arrive after the
//! engine says it is paused, and starting again begins a fresh cadence
//! instead of catching up on missed seconds.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            interval: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Install an interval unless one is already ticking.
    pub fn start(&mut self) {
        if self.interval.is_none() {
            self.restart();
        }
    }

    /// Drop any current cadence and begin a new one.
    pub fn restart(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        self.interval = None;
    }

    /// Match the ticker to the engine's running flag.
    pub fn sync(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Wait for the next tick. Pends forever while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}
