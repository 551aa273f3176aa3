//! Donor entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloodbridge_core::types::DonorId;

use super::availability::Availability;
use crate::blood_group::BloodGroup;
use crate::de;

/// A registered donor profile.
///
/// Donors returned by search never carry credentials; the authenticated
/// donor's token lives in [`crate::session::Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    /// Server-assigned identifier.
    pub id: DonorId,
    /// Display name.
    pub name: String,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Contact phone number.
    #[serde(default)]
    pub contact: String,
    /// Age in years.
    #[serde(default, deserialize_with = "de::opt_lenient_u32")]
    pub age: Option<u32>,
    /// Body weight, free text (e.g. "70 kg").
    #[serde(default, deserialize_with = "de::opt_text")]
    pub weight: Option<String>,
    /// Blood pressure, free text (e.g. "120/80").
    #[serde(default, deserialize_with = "de::opt_text")]
    pub blood_pressure: Option<String>,
    /// Number of confirmed donations. Only a settled donation changes it.
    #[serde(default)]
    pub donation_count: u32,
    /// Date of the most recent confirmed donation.
    #[serde(default, deserialize_with = "de::opt_date")]
    pub last_donated: Option<NaiveDate>,
    /// Availability status.
    #[serde(default)]
    pub availability: Availability,
    /// Whether the backend has verified this donor. Read-only.
    #[serde(default)]
    pub verified: bool,
    /// Emergency contact phone.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub emergency_contact: Option<String>,
    /// Medical history notes.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub medical_history: Option<String>,
    /// Preferred time of day for donating.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub preferred_time: Option<String>,
    /// Free-text notes.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub notes: Option<String>,
    /// Date of the last health checkup.
    #[serde(default, deserialize_with = "de::opt_date")]
    pub last_checkup: Option<NaiveDate>,
}
