//! Session persistence configuration.

use serde::{Deserialize, Serialize};

/// Where the authenticated donor's session is kept between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path to the JSON session file.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

fn default_path() -> String {
    "data/session.json".to_string()
}
