//! Blood request lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a blood request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RequestStatus {
    /// Still collecting donations; listed in active search results.
    #[default]
    Active,
    /// All needed units were donated.
    Fulfilled,
}

impl RequestStatus {
    /// Whether the request belongs in active search results.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Return the status label as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Fulfilled => "Fulfilled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = bloodbridge_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "fulfilled" => Ok(Self::Fulfilled),
            _ => Err(bloodbridge_core::AppError::validation(format!(
                "Invalid request status: '{s}'. Expected one of: Active, Fulfilled"
            ))),
        }
    }
}

impl TryFrom<String> for RequestStatus {
    type Error = bloodbridge_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestStatus> for String {
    fn from(status: RequestStatus) -> Self {
        status.as_str().to_string()
    }
}
