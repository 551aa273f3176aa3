//! Donor availability status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a donor can currently be contacted for a donation.
///
/// `Available` is the only status the client interprets; any other value is
/// kept verbatim for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    /// Ready to donate.
    #[default]
    Available,
    /// Any other free-text status, e.g. "Unavailable" or "On vacation".
    Other(String),
}

impl Availability {
    /// Whether the donor is ready to donate.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Return the status label.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Availability {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("available") {
            Self::Available
        } else {
            Self::Other(value)
        }
    }
}

impl From<Availability> for String {
    fn from(value: Availability) -> Self {
        match value {
            Availability::Available => "Available".to_string(),
            Availability::Other(s) => s,
        }
    }
}
