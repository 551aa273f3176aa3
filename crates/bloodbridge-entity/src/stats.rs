//! Community-wide counters shown on the home screen.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/requests/stats/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    /// Confirmed donations ("lives saved").
    #[serde(default)]
    pub total_donations: u64,
    /// Registered donors.
    #[serde(default)]
    pub total_donors: u64,
    /// Posted requests.
    #[serde(default)]
    pub total_requests: u64,
}
