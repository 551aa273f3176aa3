//! Donation entity models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bloodbridge_core::types::DonationId;

use crate::de;

/// Body of `POST /api/requests/{id}/donated/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSubmission {
    /// Validated unit count.
    pub units_donated: u32,
}

/// The donor counters the server reports after a donation.
///
/// Either field may be missing from a partial `donor` object; a missing
/// field is `None` and never overwrites the cached value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorStats {
    #[serde(default, deserialize_with = "de::opt_lenient_u32")]
    pub donation_count: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub last_donated: Option<NaiveDate>,
}

impl DonorStats {
    /// Whether the server reported the donation count.
    pub fn has_count(&self) -> bool {
        self.donation_count.is_some()
    }
}

/// Successful response of a donation submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DonationReceipt {
    /// Acknowledgment text from the server.
    #[serde(default)]
    pub message: Option<String>,
    /// The donor's authoritative counters after the donation.
    #[serde(default)]
    pub donor: Option<DonorStats>,
}

impl DonationReceipt {
    /// Acknowledgment to show the donor.
    pub fn acknowledgment(&self) -> &str {
        self.message
            .as_deref()
            .unwrap_or("Thank you for your donation!")
    }
}

/// One entry of the donor's donation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: DonationId,
    #[serde(default, deserialize_with = "de::opt_date")]
    pub donation_date: Option<NaiveDate>,
    #[serde(deserialize_with = "de::lenient_u32")]
    pub units_donated: u32,
    #[serde(default)]
    pub hospital: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub notes: Option<String>,
}
