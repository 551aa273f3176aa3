//! Request urgency labels.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Self-declared priority of a blood request.
///
/// Urgency is a filter and display dimension only. Several labels share a
/// rank: `Urgent` and `High` rank together, as do `Medium` and `Normal`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Urgency {
    /// Life-threatening, needed immediately.
    Critical,
    /// Needed very soon.
    Urgent,
    /// Same rank as `Urgent`.
    High,
    /// Default urgency for new requests.
    #[default]
    Medium,
    /// Same rank as `Medium`.
    Normal,
    /// Can wait.
    Low,
}

impl Urgency {
    /// All labels, most pressing first.
    pub const ALL: [Urgency; 6] = [
        Self::Critical,
        Self::Urgent,
        Self::High,
        Self::Medium,
        Self::Normal,
        Self::Low,
    ];

    /// Numeric rank: Critical(4) > Urgent = High(3) > Medium = Normal(2) > Low(1).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::Urgent | Self::High => 3,
            Self::Medium | Self::Normal => 2,
            Self::Low => 1,
        }
    }

    /// Compare two labels by rank.
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }

    /// Return the label as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Normal => "Normal",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Urgency {
    type Err = bloodbridge_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                bloodbridge_core::AppError::validation(format!(
                    "Invalid urgency: '{s}'. Expected one of: Critical, Urgent, High, Medium, Normal, Low"
                ))
            })
    }
}

impl TryFrom<String> for Urgency {
    type Error = bloodbridge_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Urgency> for String {
    fn from(urgency: Urgency) -> Self {
        urgency.as_str().to_string()
    }
}
