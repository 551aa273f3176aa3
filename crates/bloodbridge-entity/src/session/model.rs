//! Session entity model.

use serde::{Deserialize, Serialize};

use crate::donation::DonorStats;
use crate::donor::Donor;

/// The logged-in donor and their API token.
///
/// This is the only shared mutable record in the client. Every write to it
/// is derived from a server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated donor's profile as last reported by the server.
    pub donor: Donor,
    /// API token sent as `Authorization: Token <token>`.
    pub token: String,
}

/// Body of a successful `POST /api/donors/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub donor: Donor,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            donor: resp.donor,
            token: resp.token,
        }
    }
}

impl Session {
    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Overwrite the donation counters the server reported; fields it
    /// left out keep their cached values.
    pub fn apply_stats(&mut self, stats: &DonorStats) {
        if let Some(count) = stats.donation_count {
            self.donor.donation_count = count;
        }
        if let Some(date) = stats.last_donated {
            self.donor.last_donated = Some(date);
        }
    }

    /// Replace the cached profile with a fresh server copy, keeping the token.
    pub fn replace_donor(&mut self, fresh: Donor) {
        self.donor = fresh;
    }
}
