//! Registration and profile-edit payloads.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Serialize;
use validator::{Validate, ValidationError};

use bloodbridge_core::AppError;

use super::availability::Availability;
use crate::blood_group::BloodGroup;
use crate::rules::{REQUIRED_FIELDS, not_blank};

const NOTHING_TO_UPDATE: &str = "Nothing to update";
const PASSWORD_MISMATCH: &str = "Passwords do not match";
const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

/// Owner-editable profile fields for `PATCH /api/donors/{id}/`.
///
/// Server-controlled fields (blood group, donation count, last donated,
/// verification) are absent and never sent.
/// Unset fields are omitted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "has_changes"))]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Contact cannot be empty"))]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "not_blank", message = "Location cannot be empty"))]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checkup: Option<NaiveDate>,
}

fn has_changes(update: &ProfileUpdate) -> Result<(), ValidationError> {
    if update.is_empty() {
        return Err(ValidationError::new("empty").with_message(Cow::Borrowed(NOTHING_TO_UPDATE)));
    }
    Ok(())
}

impl ProfileUpdate {
    /// Whether no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject an empty update, then blank name, contact or location.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate().map_err(|e| {
            AppError::invalid(
                e,
                &[
                    NOTHING_TO_UPDATE,
                    "Name cannot be empty",
                    "Contact cannot be empty",
                    "Location cannot be empty",
                ],
            )
        })
    }
}

/// A donor registration as entered, before validation.
#[derive(Debug, Clone, Default, Validate)]
pub struct RegistrationForm {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_blank"))]
    pub contact: String,
    #[validate(
        custom(function = "not_blank"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[validate(required(message = "Please fill all required fields"))]
    pub blood_group: Option<BloodGroup>,
    #[validate(custom(function = "not_blank"))]
    pub location: String,
    pub age: Option<u32>,
    pub last_donated: Option<NaiveDate>,
}

/// The `POST /api/donors/` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonor {
    pub name: String,
    pub contact: String,
    pub password: String,
    pub blood_group: BloodGroup,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_donated: Option<NaiveDate>,
}

impl RegistrationForm {
    /// Validate the form and build the payload. Failures report, in order:
    /// required fields, password confirmation, password length.
    pub fn into_payload(self) -> Result<CreateDonor, AppError> {
        self.validate().map_err(|e| {
            AppError::invalid(e, &[REQUIRED_FIELDS, PASSWORD_MISMATCH, PASSWORD_TOO_SHORT])
        })?;
        let Some(blood_group) = self.blood_group else {
            return Err(AppError::validation(REQUIRED_FIELDS));
        };

        Ok(CreateDonor {
            name: self.name.trim().to_string(),
            contact: self.contact.trim().to_string(),
            password: self.password,
            blood_group,
            location: self.location.trim().to_string(),
            age: self.age,
            last_donated: self.last_donated,
        })
    }
}
