//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod api;
pub mod logging;
pub mod search;
pub mod session;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::api::ApiConfig;
use self::logging::LoggingConfig;
use self::search::SearchConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// configuration (base file + environment overlay + `BLOODBRIDGE__*`
/// environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Backend API settings.
    #[serde(default)]
    #[validate(nested)]
    pub api: ApiConfig,
    /// Debounced search settings.
    #[serde(default)]
    #[validate(nested)]
    pub search: SearchConfig,
    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the base file at `path`.
    ///
    /// Merges `path` with an optional `config/{env}` overlay and with
    /// environment variables prefixed with `BLOODBRIDGE` (double-underscore
    /// separated, e.g. `BLOODBRIDGE__API__BASE_URL`).
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BLOODBRIDGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.check()?;
        Ok(config)
    }

    /// Validate field constraints and cross-field rules.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|e| {
            AppError::with_source(
                crate::error::ErrorKind::Configuration,
                format!("Invalid configuration: {e}"),
                e,
            )
        })?;
        self.api.check_scheme()
    }
}
