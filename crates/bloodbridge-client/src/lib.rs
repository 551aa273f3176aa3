//! # bloodbridge-client
//!
//! The Request/Donor Directory Client. Everything a list or donation screen
//! calls into lives here:
//!
//! - [`gateway`]: authenticated JSON calls to the backend.
//! - [`api`]: typed endpoints of the backend contract.
//! - [`directory`]: the filter model, the paginated fetcher, and the
//!   debounced search controller.
//! - [`donation`]: the donation transaction state machine.
//! - [`session`]: the authenticated donor record and its persistence.

pub mod api;
pub mod directory;
pub mod donation;
pub mod gateway;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::DirectoryClient;
pub use directory::{Filter, FilterScope, LoadOutcome, PagedFetcher, SearchController, SearchEvent};
pub use donation::{DonationFlow, DonationOutcome, DonationState};
pub use gateway::{ApiRequest, Gateway, HttpGateway, Method};
pub use session::{FileSessionStore, MemorySessionStore, SessionManager, SessionStore};
