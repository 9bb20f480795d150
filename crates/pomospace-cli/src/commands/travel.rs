use clap::Subcommand;
use pomospace_core::Config;
use serde::Serialize;

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TravelAction {
    /// Print travel progress as JSON
    Status,
    /// Choose a route; restarts the focus count
    Choose {
        /// Route id
        id: String,
    },
    /// Clear the route and travelled distance
    Reset,
}

#[derive(Serialize)]
struct TravelStatus<'a> {
    route_id: Option<&'a str>,
    distance_traveled: u32,
    total_distance: Option<u32>,
    progress: f64,
    arrived: bool,
    next_waypoint: Option<&'a str>,
    visited: Vec<&'a str>,
    cycle_length: u32,
}

pub fn run(action: TravelAction, config: &Config) -> CmdResult {
    let mut app = open_app(config)?;

    match action {
        TravelAction::Status => {
            let travel = app.travel();
            let route = travel.active_route();
            print_json(&TravelStatus {
                route_id: route.map(|r| r.id.as_str()),
                distance_traveled: travel.distance_traveled(),
                total_distance: route.map(|r| r.total_distance),
                progress: travel.progress_fraction(),
                arrived: travel.has_arrived(),
                next_waypoint: travel.next_waypoint().map(|w| w.id.as_str()),
                visited: travel
                    .state()
                    .visited_waypoint_ids
                    .iter()
                    .map(String::as_str)
                    .collect(),
                cycle_length: app.cycle_length(),
            })?;
        }
        TravelAction::Choose { id } => print_json(&app.choose_path(&id)?)?,
        TravelAction::Reset => print_json(&app.reset_travel())?,
    }
    Ok(())
}
