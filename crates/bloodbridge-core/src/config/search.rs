//! Debounced search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for list screens that search as the user types.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchConfig {
    /// Quiet period in milliseconds before a filter change is fetched.
    #[serde(default = "default_debounce_ms")]
    #[validate(range(max = 10000))]
    pub debounce_ms: u64,
    /// Pre-seed the request filter with the logged-in donor's blood group
    /// and location.
    #[serde(default = "default_true")]
    pub seed_from_session: bool,
}

impl SearchConfig {
    /// The quiet period as a [`Duration`].
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            seed_from_session: true,
        }
    }
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}
