//! CLI command definitions and dispatch.

pub mod account;
pub mod auth;
pub mod donate;
pub mod donors;
pub mod profile;
pub mod requests;
pub mod stats;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use bloodbridge_client::directory::Filter;
use bloodbridge_client::{DirectoryClient, FileSessionStore, HttpGateway, SessionManager};
use bloodbridge_core::config::AppConfig;
use bloodbridge_core::error::AppError;

use crate::output::OutputFormat;

/// BloodBridge: find blood requests, search donors, and donate
#[derive(Debug, Parser)]
#[command(name = "bloodbridge", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in as a donor
    Login(auth::LoginArgs),
    /// Forget the stored session
    Logout,
    /// Create a donor account
    Register(auth::RegisterArgs),
    /// Show the logged-in donor
    Whoami,
    /// Blood requests
    Requests(requests::RequestsArgs),
    /// Donor directory
    Donors(donors::DonorsArgs),
    /// Donate to a blood request
    Donate(donate::DonateArgs),
    /// Your donor profile
    Profile(profile::ProfileArgs),
    /// Account management
    Account(account::AccountArgs),
    /// Community totals
    Stats,
    /// Your donation history
    Donations,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = Context::connect(config, self.format).await?;
        match &self.command {
            Commands::Login(args) => auth::login(args, &ctx).await,
            Commands::Logout => auth::logout(&ctx).await,
            Commands::Register(args) => auth::register(args, &ctx).await,
            Commands::Whoami => auth::whoami(&ctx).await,
            Commands::Requests(args) => requests::execute(args, &ctx).await,
            Commands::Donors(args) => donors::execute(args, &ctx).await,
            Commands::Donate(args) => donate::execute(args, &ctx).await,
            Commands::Profile(args) => profile::execute(args, &ctx).await,
            Commands::Account(args) => account::execute(args, &ctx).await,
            Commands::Stats => stats::community(&ctx).await,
            Commands::Donations => stats::donations(&ctx).await,
        }
    }
}

/// Everything a command needs: configuration, the client, and the output format.
pub struct Context {
    pub config: AppConfig,
    pub client: DirectoryClient,
    pub format: OutputFormat,
}

impl Context {
    /// Build the HTTP client and restore the persisted session.
    pub async fn connect(config: AppConfig, format: OutputFormat) -> Result<Self, AppError> {
        let gateway = HttpGateway::new(&config.api)?;
        let store = FileSessionStore::new(&config.session.path);
        let session = SessionManager::new(Arc::new(store));
        if let Some(restored) = session.restore().await {
            debug!(donor_id = %restored.donor.id, "Restored session");
        }
        let client = DirectoryClient::new(Arc::new(gateway), session);
        Ok(Self {
            config,
            client,
            format,
        })
    }

    /// The requests filter to start from: seeded with the donor's blood
    /// group and location when configured and logged in.
    pub async fn request_filter(&self) -> Filter {
        if self.config.search.seed_from_session {
            Filter::requests_for(self.client.session().donor().await.as_ref())
        } else {
            Filter::requests()
        }
    }
}

fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {e}"))
}

/// Prompt for a line of text on a blocking thread.
pub(crate) async fn ask(prompt: String, allow_empty: bool) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(allow_empty)
            .interact_text()
            .map_err(input_error)
    })
    .await
    .map_err(|e| AppError::internal(format!("Prompt task failed: {e}")))?
}

/// Prompt for a secret without echo.
pub(crate) async fn ask_password(prompt: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)
    })
    .await
    .map_err(|e| AppError::internal(format!("Prompt task failed: {e}")))?
}

/// Ask a yes/no question, defaulting to no.
pub(crate) async fn confirm(prompt: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(input_error)
    })
    .await
    .map_err(|e| AppError::internal(format!("Prompt task failed: {e}")))?
}

/// Pick one of `items`, returning its index.
pub(crate) async fn choose(prompt: String, items: Vec<String>) -> Result<usize, AppError> {
    tokio::task::spawn_blocking(move || {
        dialoguer::Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()
            .map_err(input_error)
    })
    .await
    .map_err(|e| AppError::internal(format!("Prompt task failed: {e}")))?
}

/// Use `value` when given, otherwise prompt for it.
pub(crate) async fn value_or_ask(value: &Option<String>, prompt: &str) -> Result<String, AppError> {
    match value {
        Some(v) => Ok(v.clone()),
        None => ask(prompt.to_string(), false).await,
    }
}
