//! Backend API configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// Connection settings for the BloodBridge REST backend.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://192.168.0.101:8000`.
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// The origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn check_scheme(&self) -> Result<(), AppError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(())
        } else {
            Err(AppError::configuration(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.base_url
            )))
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("bloodbridge/{}", env!("CARGO_PKG_VERSION"))
}
