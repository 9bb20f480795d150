//! Static route catalog.
//!
//! Routes are loaded once at startup, either from the JSON file embedded in
//! this crate or from an override file, and never mutated afterwards.
//! Every loaded catalog has passed [`RouteCatalog::validate`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{CatalogError, CoreError};

const BUILTIN_ROUTES: &str = include_str!("routes.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    Milestone,
    Store,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    /// Distance from the route origin.
    pub distance: u32,
    pub kind: WaypointKind,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub waypoints: Vec<Waypoint>,
    pub total_distance: u32,
}

impl RouteDefinition {
    /// Number of focus sessions between long breaks while this route is active.
    pub fn cycle_length(&self) -> u32 {
        self.waypoints.len() as u32
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut previous: Option<u32> = None;
        for waypoint in &self.waypoints {
            if previous.is_some_and(|p| waypoint.distance <= p) {
                return Err(CatalogError::UnorderedWaypoints {
                    route: self.id.clone(),
                    waypoint: waypoint.id.clone(),
                });
            }
            previous = Some(waypoint.distance);
        }
        let furthest = previous.ok_or_else(|| CatalogError::NoWaypoints(self.id.clone()))?;
        if furthest != self.total_distance {
            return Err(CatalogError::TotalDistanceMismatch {
                route: self.id.clone(),
                declared: self.total_distance,
                actual: furthest,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCatalog {
    routes: Vec<RouteDefinition>,
}

impl RouteCatalog {
    /// Build a catalog, rejecting malformed routes.
    pub fn new(routes: Vec<RouteDefinition>) -> Result<Self, CatalogError> {
        let catalog = Self { routes };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_ROUTES)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let routes: Vec<RouteDefinition> = serde_json::from_str(json)?;
        Self::new(routes)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.routes.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for route in &self.routes {
            if !seen.insert(route.id.as_str()) {
                return Err(CatalogError::DuplicateRoute(route.id.clone()));
            }
            route.validate()?;
        }
        Ok(())
    }

    /// Look up a route. `None` is an ordinary outcome, e.g. for a stale
    /// persisted id.
    pub fn get(&self, id: &str) -> Option<&RouteDefinition> {
        self.routes.iter().find(|r| r.id == id)
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
