//! Page-by-page retrieval of one logical list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use bloodbridge_core::result::AppResult;
use bloodbridge_core::types::Page;

use super::filter::Filter;
use super::listing::Listing;

/// Fetches one server-side page of a list.
#[async_trait]
pub trait PageSource<T>: Send + Sync + 'static {
    /// Fetch the 1-based `page` of the list selected by `filter`.
    async fn fetch_page(&self, filter: &Filter, page: u32) -> AppResult<Page<T>>;
}

/// Why a load request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another load is outstanding.
    InFlight,
    /// The server reported no further page.
    Exhausted,
    /// No page has been loaded yet; call `reset` first.
    NotStarted,
    /// The list was torn down.
    Disposed,
}

/// Result of a `reset` or `load_more` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was merged into the list.
    Loaded {
        /// The page number that was merged.
        page: u32,
        /// Items taken from that page.
        added: usize,
        /// List length after the merge.
        total: usize,
        /// Whether this was the last page.
        exhausted: bool,
    },
    /// Nothing was requested.
    Skipped(SkipReason),
    /// A response arrived after a newer reset (or teardown) and was dropped.
    Discarded,
}

impl LoadOutcome {
    /// Whether a page was merged.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

struct FetchState<T> {
    items: Vec<T>,
    /// Filter of the currently displayed list; `None` until the first reset lands.
    filter: Option<Filter>,
    /// Last page merged into `items` (0 before the first load).
    page: u32,
    has_next: bool,
    /// Bumped by every reset and by teardown; responses from older
    /// generations are discarded on arrival.
    generation: u64,
    resetting: bool,
    loading_more: bool,
    disposed: bool,
}

#[derive(Clone, Copy)]
enum Flight {
    Reset,
    More,
}

/// Clears the in-flight flag when a load ends, however it ends (including
/// when the future is dropped mid-request), unless a newer generation has
/// taken over.
struct FlightGuard<'a, T> {
    state: &'a Mutex<FetchState<T>>,
    generation: u64,
    flight: Flight,
}

impl<T> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        let mut st = lock(self.state);
        if st.generation == self.generation {
            match self.flight {
                Flight::Reset => st.resetting = false,
                Flight::More => st.loading_more = false,
            }
        }
    }
}

fn lock<T>(state: &Mutex<FetchState<T>>) -> MutexGuard<'_, FetchState<T>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives page-by-page retrieval of one list.
///
/// At most one page request is outstanding per fetcher from the caller's
/// point of view: `load_more` while anything is loading is dropped, and a
/// `reset` invalidates every older response on arrival.
pub struct PagedFetcher<T> {
    source: Arc<dyn PageSource<T>>,
    state: Mutex<FetchState<T>>,
}

impl<T: Listing> PagedFetcher<T> {
    /// Create an empty fetcher over `source`.
    pub fn new(source: Arc<dyn PageSource<T>>) -> Self {
        Self {
            source,
            state: Mutex::new(FetchState {
                items: Vec::new(),
                filter: None,
                page: 0,
                has_next: false,
                generation: 0,
                resetting: false,
                loading_more: false,
                disposed: false,
            }),
        }
    }

    /// Fetch page 1 for `filter` and replace the list with it.
    ///
    /// On failure the existing list, filter, and page counter are left as
    /// they were.
    pub async fn reset(&self, filter: Filter) -> AppResult<LoadOutcome> {
        let generation = {
            let mut st = lock(&self.state);
            if st.disposed {
                return Ok(LoadOutcome::Skipped(SkipReason::Disposed));
            }
            st.generation += 1;
            st.resetting = true;
            st.loading_more = false;
            st.generation
        };
        let _guard = FlightGuard {
            state: &self.state,
            generation,
            flight: Flight::Reset,
        };

        debug!(filter = %filter, generation, "Resetting list");
        let result = self.source.fetch_page(&filter, 1).await;

        let mut st = lock(&self.state);
        if st.generation != generation || st.disposed {
            debug!(filter = %filter, generation, "Discarding superseded page 1");
            return Ok(LoadOutcome::Discarded);
        }

        let page = result?;
        let has_next = page.has_next();
        st.items = page
            .results
            .into_iter()
            .filter(|item| !item.hidden_by(&filter))
            .collect();
        st.page = 1;
        st.has_next = has_next;
        st.filter = Some(filter);

        let total = st.items.len();
        debug!(total, has_next, "List reset");
        Ok(LoadOutcome::Loaded {
            page: 1,
            added: total,
            total,
            exhausted: !has_next,
        })
    }

    /// Fetch the next page and append it.
    ///
    /// A no-op while any load is outstanding, before the first reset, and
    /// once the server has reported the last page.
    pub async fn load_more(&self) -> AppResult<LoadOutcome> {
        let (generation, filter, next_page) = {
            let mut st = lock(&self.state);
            if st.disposed {
                return Ok(LoadOutcome::Skipped(SkipReason::Disposed));
            }
            if st.resetting || st.loading_more {
                return Ok(LoadOutcome::Skipped(SkipReason::InFlight));
            }
            let Some(filter) = st.filter.clone() else {
                return Ok(LoadOutcome::Skipped(SkipReason::NotStarted));
            };
            if !st.has_next {
                return Ok(LoadOutcome::Skipped(SkipReason::Exhausted));
            }
            st.loading_more = true;
            (st.generation, filter, st.page + 1)
        };
        let _guard = FlightGuard {
            state: &self.state,
            generation,
            flight: Flight::More,
        };

        debug!(filter = %filter, page = next_page, "Loading more");
        let result = self.source.fetch_page(&filter, next_page).await;

        let mut st = lock(&self.state);
        if st.generation != generation || st.disposed {
            debug!(page = next_page, generation, "Discarding page from before reset");
            return Ok(LoadOutcome::Discarded);
        }

        let page = result?;
        let has_next = page.has_next();
        let before = st.items.len();
        st.items.extend(
            page.results
                .into_iter()
                .filter(|item| !item.hidden_by(&filter)),
        );
        st.page = next_page;
        st.has_next = has_next;

        let total = st.items.len();
        debug!(page = next_page, total, has_next, "Page appended");
        Ok(LoadOutcome::Loaded {
            page: next_page,
            added: total - before,
            total,
            exhausted: !has_next,
        })
    }

    /// True once the server has reported that no further page exists.
    pub fn is_exhausted(&self) -> bool {
        let st = lock(&self.state);
        st.filter.is_some() && !st.has_next
    }

    /// Whether a reset or load-more is outstanding.
    pub fn is_loading(&self) -> bool {
        let st = lock(&self.state);
        st.resetting || st.loading_more
    }

    /// Snapshot of the list in server order.
    pub fn items(&self) -> Vec<T> {
        lock(&self.state).items.clone()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.state).items.is_empty()
    }

    /// Last page merged into the list (0 before the first load).
    pub fn current_page(&self) -> u32 {
        lock(&self.state).page
    }

    /// Filter of the displayed list.
    pub fn filter(&self) -> Option<Filter> {
        lock(&self.state).filter.clone()
    }

    /// Drop the item with `key` from the in-memory list.
    pub fn remove(&self, key: &str) -> bool {
        let mut st = lock(&self.state);
        let before = st.items.len();
        st.items.retain(|item| item.key() != key);
        st.items.len() != before
    }

    /// Tear the list down; responses still in flight are ignored on arrival.
    pub fn dispose(&self) {
        let mut st = lock(&self.state);
        st.disposed = true;
        st.generation += 1;
        st.resetting = false;
        st.loading_more = false;
    }

    pub fn is_disposed(&self) -> bool {
        lock(&self.state).disposed
    }
}

impl<T> std::fmt::Debug for PagedFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let st = lock(&self.state);
        f.debug_struct("PagedFetcher")
            .field("len", &st.items.len())
            .field("page", &st.page)
            .field("has_next", &st.has_next)
            .field("generation", &st.generation)
            .finish()
    }
}
