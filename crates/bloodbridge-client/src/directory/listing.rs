//! Items a directory list can hold.

use bloodbridge_entity::{BloodRequest, Donor};

use super::filter::Filter;

/// An entity shown in a paginated list.
pub trait Listing: Clone + Send + Sync + 'static {
    /// Stable identifier used to drop an item from the in-memory list.
    fn key(&self) -> &str;

    /// Whether the client must hide this item from a list built with
    /// `filter`, even though the server returned it.
    fn hidden_by(&self, _filter: &Filter) -> bool {
        false
    }
}

impl Listing for BloodRequest {
    fn key(&self) -> &str {
        self.id.as_str()
    }

    /// Requests outside the filter, or no longer active in an active
    /// list, are never shown.
    fn hidden_by(&self, filter: &Filter) -> bool {
        !filter.matches_request(self)
            || filter
                .status()
                .is_some_and(|s| s.is_active() && !self.is_active())
    }
}

impl Listing for Donor {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}
