mod catalog;
mod engine;

pub use catalog::{RouteCatalog, RouteDefinition, Waypoint, WaypointKind};
pub use engine::{TravelEngine, TravelState};

/// Distance covered per completed focus phase.
pub const DEFAULT_SHIP_SPEED: u32 = 10;
