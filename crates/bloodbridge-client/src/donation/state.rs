//! States and step results of a donation.

use bloodbridge_core::types::RequestId;
use bloodbridge_entity::{BloodRequest, Donor};

/// Where a donation currently stands.
///
/// `Idle -> UnitsPrompt -> Confirming -> Submitting -> Settled`. A failed
/// submission goes straight back to `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DonationState {
    #[default]
    Idle,
    /// Waiting for the number of units.
    UnitsPrompt { request: BloodRequest },
    /// Waiting for a yes/no on `units`.
    Confirming { request: BloodRequest, units: u32 },
    /// The donation call is outstanding.
    Submitting { request_id: RequestId, units: u32 },
    /// The server recorded the donation.
    Settled {
        request_id: RequestId,
        units: u32,
        message: String,
    },
}

impl DonationState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Short state name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::UnitsPrompt { .. } => "units_prompt",
            Self::Confirming { .. } => "confirming",
            Self::Submitting { .. } => "submitting",
            Self::Settled { .. } => "settled",
        }
    }
}

/// What the caller should show after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum DonationOutcome {
    /// No session: offer the login screen. The flow stays idle.
    LoginRequired { message: String },
    /// Ask how many units, at most `max_units`.
    UnitsPrompt { max_units: u32 },
    /// Ask the yes/no question in `prompt`.
    Confirm { units: u32, prompt: String },
    /// The donor said no; nothing was sent.
    Declined,
    /// The donation was recorded.
    Settled {
        message: String,
        /// The donor as reconciled with the server, when known.
        donor: Option<Donor>,
    },
}

/// `"1 unit"`, `"3 units"`.
pub fn units_label(units: u32) -> String {
    if units == 1 {
        "1 unit".to_string()
    } else {
        format!("{units} units")
    }
}
