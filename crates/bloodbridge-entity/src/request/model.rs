//! Blood request entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use bloodbridge_core::AppError;
use bloodbridge_core::types::RequestId;

use super::status::RequestStatus;
use super::urgency::Urgency;
use crate::blood_group::BloodGroup;
use crate::de;
use crate::rules::{REQUIRED_FIELDS, not_blank};

const UNITS_NOT_POSITIVE: &str = "Units needed must be greater than 0";

/// A recipient-authored need for blood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    /// Server-assigned identifier.
    pub id: RequestId,
    /// Patient or requester display name.
    pub name: String,
    /// Blood group needed.
    pub blood_group: BloodGroup,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Hospital where the donation takes place.
    #[serde(default)]
    pub hospital: String,
    /// Contact phone number.
    #[serde(default)]
    pub contact: String,
    /// Patient age.
    #[serde(default, deserialize_with = "de::opt_lenient_u32")]
    pub patient_age: Option<u32>,
    /// Free-text notes.
    #[serde(default, deserialize_with = "de::opt_text")]
    pub notes: Option<String>,
    /// Units still needed.
    #[serde(deserialize_with = "de::lenient_u32")]
    pub units_needed: u32,
    /// Self-declared urgency.
    #[serde(default)]
    pub urgency: Urgency,
    /// Advisory deadline.
    #[serde(default, deserialize_with = "de::opt_date")]
    pub required_by: Option<NaiveDate>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: RequestStatus,
    /// When the request was posted (display only).
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub requested_at: Option<DateTime<Utc>>,
}

impl BloodRequest {
    /// Whether the request is still collecting donations.
    pub fn is_active(&self) -> bool {
        self.status.is_active() && self.units_needed > 0
    }

    /// Case-insensitive substring match on the location.
    pub fn location_matches(&self, needle: &str) -> bool {
        let needle = needle.trim();
        needle.is_empty() || self.location.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// A new request as entered by the recipient, before validation.
#[derive(Debug, Clone, Default, Validate)]
pub struct BloodRequestForm {
    /// Patient name (required).
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    /// Blood group (required).
    #[validate(required(message = "Please fill all required fields"))]
    pub blood_group: Option<BloodGroup>,
    /// Contact phone (required).
    #[validate(custom(function = "not_blank"))]
    pub contact: String,
    /// Location.
    pub location: String,
    /// Hospital (required).
    #[validate(custom(function = "not_blank"))]
    pub hospital: String,
    /// Patient age.
    pub patient_age: Option<u32>,
    /// Units needed (required, positive).
    #[validate(
        required(message = "Please fill all required fields"),
        range(min = 1, message = "Units needed must be greater than 0")
    )]
    pub units_needed: Option<u32>,
    /// Urgency, `Medium` unless chosen.
    pub urgency: Urgency,
    /// Advisory deadline.
    pub required_by: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: String,
}

/// The `POST /api/requests/` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBloodRequest {
    /// Patient name.
    pub name: String,
    /// Blood group needed.
    pub blood_group: BloodGroup,
    /// Contact phone.
    pub contact: String,
    /// Location.
    pub location: String,
    /// Hospital.
    pub hospital: String,
    /// Patient age.
    pub patient_age: Option<u32>,
    /// Units needed.
    pub units_needed: u32,
    /// Urgency label.
    pub urgency: Urgency,
    /// Deadline as `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_by: Option<NaiveDate>,
    /// Free-text notes.
    pub notes: String,
}

impl BloodRequestForm {
    /// Check required fields, then the unit count, and turn the form into
    /// a submittable payload.
    pub fn into_payload(self) -> Result<CreateBloodRequest, AppError> {
        self.validate()
            .map_err(|e| AppError::invalid(e, &[REQUIRED_FIELDS, UNITS_NOT_POSITIVE]))?;
        let (Some(blood_group), Some(units_needed)) = (self.blood_group, self.units_needed) else {
            return Err(AppError::validation(REQUIRED_FIELDS));
        };

        Ok(CreateBloodRequest {
            name: self.name.trim().to_string(),
            blood_group,
            contact: self.contact.trim().to_string(),
            location: self.location.trim().to_string(),
            hospital: self.hospital.trim().to_string(),
            patient_age: self.patient_age,
            units_needed,
            urgency: self.urgency,
            required_by: self.required_by,
            notes: self.notes,
        })
    }
}
