use clap::Subcommand;
use pomospace_core::settings::KEYS;
use pomospace_core::Config;

use super::{open_app, print_json, CmdResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Get a setting (e.g. "focus_duration", "sound_enabled")
    Get {
        /// Setting key
        key: String,
    },
    /// Set a setting; durations are in minutes and clamped to their bounds
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: SettingsAction, config: &Config) -> CmdResult {
    let mut app = open_app(config)?;

    match action {
        SettingsAction::Get { key } => match app.settings().get(&key) {
            Some(value) => println!("{value}"),
            None => {
                return Err(format!("unknown key: {key} (expected one of {})", KEYS.join(", ")).into())
            }
        },
        SettingsAction::Set { key, value } => {
            if let Some(event) = app.set_setting(&key, &value)? {
                print_json(&event)?;
            }
            let stored = app.settings().get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        SettingsAction::List => print_json(app.settings())?,
        SettingsAction::Reset => {
            if let Some(event) = app.reset_settings() {
                print_json(&event)?;
            }
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
