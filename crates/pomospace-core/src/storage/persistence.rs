//! Typed access to the persisted namespaces.
//!
//! Reads fall back to defaults and writes are best effort: a failing store
//! is logged and otherwise ignored, so the phase engine never blocks or
//! fails on durability.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, MemoryStore};
use crate::settings::Settings;
use crate::timer::TimerProgress;
use crate::travel::TravelState;

pub const SETTINGS_KEY: &str = "settings";
pub const TIMER_KEY: &str = "timer";
pub const TRAVEL_KEY: &str = "travel";

pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Non-durable persistence, used when no store could be opened.
    pub fn ephemeral() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn load_settings(&self) -> Settings {
        self.load::<Settings>(SETTINGS_KEY).clamped()
    }

    pub fn load_timer(&self) -> TimerProgress {
        self.load(TIMER_KEY)
    }

    pub fn load_travel(&self) -> TravelState {
        self.load(TRAVEL_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) {
        self.save(SETTINGS_KEY, settings);
    }

    pub fn save_timer(&self, progress: &TimerProgress) {
        self.save(TIMER_KEY, progress);
    }

    pub fn save_travel(&self, state: &TravelState) {
        self.save(TRAVEL_KEY, state);
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, using defaults");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "persisted state unreadable, using defaults");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize state");
                return;
            }
        };
        if let Err(e) = self.store.set(key, &json) {
            tracing::warn!(key, error = %e, "storage write failed");
        }
    }
}
