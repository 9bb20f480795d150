//! Travel progress engine.
//!
//! Moves a ship along the active route by one `ship_speed` step per
//! completed focus phase. All state here is derived from focus completions;
//! the only inputs are [`TravelEngine::choose_path`],
//! [`TravelEngine::advance_distance`] and [`TravelEngine::reset`].
//!
//! Invariant: for the active route, `visited_waypoint_ids` is exactly the set
//! of waypoints with `distance <= distance_traveled`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::catalog::{RouteCatalog, RouteDefinition, Waypoint};
use super::DEFAULT_SHIP_SPEED;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::TimerEngine;

/// Persisted travel state. Stored as a whole under the `"travel"` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelState {
    #[serde(default)]
    pub current_route_id: Option<String>,
    #[serde(default)]
    pub distance_traveled: u32,
    #[serde(default = "default_ship_speed")]
    pub ship_speed: u32,
    #[serde(default)]
    pub visited_waypoint_ids: BTreeSet<String>,
}

fn default_ship_speed() -> u32 {
    DEFAULT_SHIP_SPEED
}

impl Default for TravelState {
    fn default() -> Self {
        Self {
            current_route_id: None,
            distance_traveled: 0,
            ship_speed: DEFAULT_SHIP_SPEED,
            visited_waypoint_ids: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TravelEngine {
    state: TravelState,
    catalog: Arc<RouteCatalog>,
}

impl TravelEngine {
    pub fn new(catalog: Arc<RouteCatalog>) -> Self {
        Self {
            state: TravelState::default(),
            catalog,
        }
    }

    /// Rebuild an engine from a persisted blob.
    ///
    /// Distance is clamped to the route and the visited set is re-derived
    /// from it, so ids left over from older catalogs are dropped. A route id
    /// the catalog no longer knows is kept but resolves to no active route,
    /// with no distance and nothing visited.
    pub fn restore(mut state: TravelState, catalog: Arc<RouteCatalog>) -> Self {
        state.ship_speed = state.ship_speed.max(1);
        match state.current_route_id.as_deref().map(|id| (id, catalog.get(id))) {
            Some((_, Some(route))) => {
                state.distance_traveled = state.distance_traveled.min(route.total_distance);
                state.visited_waypoint_ids = reached(route, state.distance_traveled)
                    .map(|w| w.id.clone())
                    .collect();
            }
            Some((id, None)) => {
                tracing::warn!(route_id = id, "persisted route not in catalog, ignoring");
                state.distance_traveled = 0;
                state.visited_waypoint_ids.clear();
            }
            None => {
                state.distance_traveled = 0;
                state.visited_waypoint_ids.clear();
            }
        }
        Self { state, catalog }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TravelState {
        &self.state
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    /// The selected route, if it resolves in the catalog.
    pub fn active_route(&self) -> Option<&RouteDefinition> {
        self.state
            .current_route_id
            .as_deref()
            .and_then(|id| self.catalog.get(id))
    }

    pub fn distance_traveled(&self) -> u32 {
        self.state.distance_traveled
    }

    pub fn ship_speed(&self) -> u32 {
        self.state.ship_speed
    }

    pub fn is_visited(&self, waypoint_id: &str) -> bool {
        self.state.visited_waypoint_ids.contains(waypoint_id)
    }

    /// Focus sessions per long break: the active route's waypoint count,
    /// else `fallback`.
    pub fn cycle_length(&self, fallback: u32) -> u32 {
        self.active_route()
            .map(RouteDefinition::cycle_length)
            .unwrap_or(fallback)
            .max(1)
    }

    pub fn has_arrived(&self) -> bool {
        self.active_route()
            .is_some_and(|r| self.state.distance_traveled >= r.total_distance)
    }

    /// 0.0 .. 1.0 progress along the active route.
    pub fn progress_fraction(&self) -> f64 {
        match self.active_route() {
            Some(route) if route.total_distance > 0 => {
                (self.state.distance_traveled as f64 / route.total_distance as f64).min(1.0)
            }
            _ => 0.0,
        }
    }

    /// First waypoint not yet reached.
    pub fn next_waypoint(&self) -> Option<&Waypoint> {
        self.active_route()?
            .waypoints
            .iter()
            .find(|w| w.distance > self.state.distance_traveled)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Select a route and start it from the origin.
    ///
    /// The timer's completed count always restarts, even when `route_id` is
    /// unknown; in that case no route is active afterwards and
    /// [`CoreError::UnknownRoute`] is returned.
    pub fn choose_path(&mut self, route_id: &str, timer: &mut TimerEngine) -> Result<Event> {
        timer.reset_pomodoros();
        self.state.distance_traveled = 0;
        self.state.visited_waypoint_ids.clear();

        if self.catalog.get(route_id).is_none() {
            tracing::warn!(route_id, "cannot choose unknown route");
            self.state.current_route_id = None;
            return Err(CoreError::UnknownRoute(route_id.to_string()));
        }

        tracing::info!(route_id, "route chosen");
        self.state.current_route_id = Some(route_id.to_string());
        Ok(Event::RouteChosen {
            route_id: route_id.to_string(),
            at: Utc::now(),
        })
    }

    /// Move one `ship_speed` step along the active route.
    ///
    /// Returns `None` when there is no active route or the ship has already
    /// arrived.
    pub fn advance_distance(&mut self) -> Option<Event> {
        let route = self
            .state
            .current_route_id
            .as_deref()
            .and_then(|id| self.catalog.get(id))?;
        if self.state.distance_traveled >= route.total_distance {
            return None;
        }

        let new_distance = self
            .state
            .distance_traveled
            .saturating_add(self.state.ship_speed)
            .min(route.total_distance);

        let mut reached_now = Vec::new();
        for waypoint in reached(route, new_distance) {
            if self.state.visited_waypoint_ids.insert(waypoint.id.clone()) {
                reached_now.push(waypoint.id.clone());
            }
        }
        self.state.distance_traveled = new_distance;
        let arrived = new_distance >= route.total_distance;

        tracing::debug!(
            route_id = %route.id,
            distance = new_distance,
            reached = reached_now.len(),
            arrived,
            "ship advanced"
        );
        Some(Event::DistanceAdvanced {
            route_id: route.id.clone(),
            distance_traveled: new_distance,
            waypoints_reached: reached_now,
            arrived,
            at: Utc::now(),
        })
    }

    /// Abandon the current route and return to the pre-selection state.
    pub fn reset(&mut self, timer: &mut TimerEngine) -> Event {
        timer.reset_pomodoros();
        self.state.current_route_id = None;
        self.state.distance_traveled = 0;
        self.state.visited_waypoint_ids.clear();
        tracing::info!("travel reset");
        Event::TravelReset { at: Utc::now() }
    }
}

fn reached(route: &RouteDefinition, distance: u32) -> impl Iterator<Item = &Waypoint> {
    route.waypoints.iter().filter(move |w| w.distance <= distance)
}
