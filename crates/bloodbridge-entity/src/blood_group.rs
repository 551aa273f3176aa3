//! The eight canonical ABO/Rh blood groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An ABO/Rh blood group.
///
/// Matching between donors and requests is exact: no compatibility table
/// (such as O- donating to everyone) is applied anywhere in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodGroup {
    /// A positive.
    APos,
    /// A negative.
    ANeg,
    /// B positive.
    BPos,
    /// B negative.
    BNeg,
    /// AB positive.
    AbPos,
    /// AB negative.
    AbNeg,
    /// O positive.
    OPos,
    /// O negative.
    ONeg,
}

impl BloodGroup {
    /// All groups in the order list screens present them.
    pub const ALL: [BloodGroup; 8] = [
        Self::APos,
        Self::ANeg,
        Self::BPos,
        Self::BNeg,
        Self::AbPos,
        Self::AbNeg,
        Self::OPos,
        Self::ONeg,
    ];

    /// Return the canonical label, e.g. `"AB-"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APos => "A+",
            Self::ANeg => "A-",
            Self::BPos => "B+",
            Self::BNeg => "B-",
            Self::AbPos => "AB+",
            Self::AbNeg => "AB-",
            Self::OPos => "O+",
            Self::ONeg => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = bloodbridge_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| {
                bloodbridge_core::AppError::validation(format!(
                    "Invalid blood group: '{s}'. Expected one of: A+, A-, B+, B-, AB+, AB-, O+, O-"
                ))
            })
    }
}

impl TryFrom<String> for BloodGroup {
    type Error = bloodbridge_core::AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BloodGroup> for String {
    fn from(group: BloodGroup) -> Self {
        group.as_str().to_string()
    }
}
