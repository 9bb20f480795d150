pub mod config;
pub mod route;
pub mod settings;
pub mod timer;
pub mod travel;

use pomospace_core::{App, Config};

use crate::alerts::TerminalAlerts;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_app(config: &Config) -> Result<App, Box<dyn std::error::Error>> {
    Ok(App::open(config, Box::new(TerminalAlerts))?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
