use clap::Subcommand;
use pomospace_core::{Config, CoreError};

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum RouteAction {
    /// List routes in the catalog
    List {
        /// Output full route definitions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one route with its waypoints
    Show {
        /// Route id
        id: String,
    },
}

pub fn run(action: RouteAction, config: &Config) -> CmdResult {
    let app = open_app(config)?;
    let catalog = app.catalog();

    match action {
        RouteAction::List { json: true } => print_json(&catalog.routes())?,
        RouteAction::List { json: false } => {
            let active = app.travel().active_route().map(|r| r.id.as_str());
            for route in catalog.routes() {
                let marker = if Some(route.id.as_str()) == active { "*" } else { " " };
                println!(
                    "{marker} {:<10} {:<16} {} waypoints, {} units",
                    route.id,
                    route.label,
                    route.waypoints.len(),
                    route.total_distance
                );
            }
        }
        RouteAction::Show { id } => {
            let route = catalog
                .get(&id)
                .ok_or_else(|| CoreError::UnknownRoute(id.clone()))?;
            print_json(route)?;
        }
    }
    Ok(())
}
