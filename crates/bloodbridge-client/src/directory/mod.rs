//! List fetching for request and donor screens.
//!
//! One parameterized directory serves every list: a [`Filter`] describes the
//! query, a [`PagedFetcher`] walks the server's pages, and a
//! [`SearchController`] debounces filter edits into fetcher resets.

pub mod fetcher;
pub mod filter;
pub mod listing;
pub mod search;

pub use fetcher::{LoadOutcome, PageSource, PagedFetcher, SkipReason};
pub use filter::{Filter, FilterScope};
pub use listing::Listing;
pub use search::{SearchController, SearchEvent};
