use clap::{Parser, Subcommand};
use pomospace_core::Config;
use tracing_subscriber::EnvFilter;

mod alerts;
mod commands;

#[derive(Parser)]
#[command(name = "pomospace-cli", version, about = "Pomospace focus timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// User preferences (durations, cycle length, alerts)
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Route catalog
    Route {
        #[command(subcommand)]
        action: commands::route::RouteAction,
    },
    /// Ship travel along the chosen route
    Travel {
        #[command(subcommand)]
        action: commands::travel::TravelAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Route { action } => commands::route::run(action, &config),
        Commands::Travel { action } => commands::travel::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
