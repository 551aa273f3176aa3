//! BloodBridge command-line client.
//!
//! Entry point: parses the command line, loads configuration, initialises
//! logging, and hands off to the selected command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use bloodbridge_cli::Cli;
use bloodbridge_cli::output;
use bloodbridge_core::config::AppConfig;
use bloodbridge_core::error::AppError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_configuration(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = cli.execute(config).await {
        tracing::debug!(error = %e, "Command failed");
        output::print_error(e.user_message());
        std::process::exit(1);
    }
}

/// Load configuration from file, environment overlay, and variables
fn load_configuration(config_path: &str) -> Result<AppConfig, AppError> {
    let env = std::env::var("BLOODBRIDGE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
