//! # Pomospace Core Library
//!
//! Core logic for the Pomospace focus timer: a focus / short break / long
//! break countdown, a count of completed focus sessions, persisted
//! preferences, and a cosmetic "travel" mechanic that moves a ship along a
//! route as focus sessions complete. The CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: second-granularity phase state machine; the caller
//!   feeds it ticks from a single [`Ticker`]
//! - **Travel Engine**: route progress derived from focus completions
//! - **Route Catalog**: immutable routes loaded once at startup
//! - **Storage**: key-value persistence (SQLite or in-memory) and TOML
//!   process configuration
//!
//! ## Key Components
//!
//! - [`App`]: composition root owning all state, the single writer
//! - [`TimerEngine`]: phase/countdown state machine
//! - [`TravelEngine`]: ship progress along a route
//! - [`AlertDispatcher`]: fire-and-forget session-complete alerts
//! - [`driver::run`]: real-time loop merging ticks and user controls

pub mod alerts;
pub mod app;
pub mod driver;
pub mod error;
pub mod events;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod travel;

pub use alerts::{AlertDispatcher, NullAlerts, RecordingAlerts};
pub use app::App;
pub use driver::{Control, Exit};
pub use error::{CatalogError, ConfigError, CoreError, StorageError};
pub use events::Event;
pub use settings::{AlertPrefs, Settings};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, Persistence};
pub use timer::{format_clock, Phase, Ticker, TimerEngine, TimerProgress};
pub use travel::{RouteCatalog, RouteDefinition, TravelEngine, TravelState, Waypoint, WaypointKind};
