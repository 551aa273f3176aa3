//! Debounced filter edits.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use bloodbridge_core::AppError;
use bloodbridge_core::result::AppResult;

use super::fetcher::{LoadOutcome, PagedFetcher};
use super::filter::Filter;
use super::listing::Listing;

/// Result of a debounced reset, delivered on the controller's channel.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// The list now shows page 1 for `filter`.
    Loaded { filter: Filter, outcome: LoadOutcome },
    /// The reset for `filter` failed; the previous list is still shown.
    Failed { filter: Filter, error: AppError },
}

struct SearchState {
    /// Latest filter asked for, applied or still pending.
    requested: Filter,
    pending: Option<JoinHandle<()>>,
    disposed: bool,
}

/// Collapses bursts of filter edits into a single list reset.
///
/// Each edit restarts a quiet-period timer. Only when the timer expires
/// without another edit does the fetcher reset with the latest filter.
/// Results arrive on the channel returned by [`SearchController::new`].
pub struct SearchController<T: Listing> {
    fetcher: Arc<PagedFetcher<T>>,
    quiet: Duration,
    events: mpsc::UnboundedSender<SearchEvent>,
    state: Mutex<SearchState>,
}

impl<T: Listing> SearchController<T> {
    /// Create a controller whose first load will use `filter`.
    pub fn new(
        fetcher: Arc<PagedFetcher<T>>,
        filter: Filter,
        quiet: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            fetcher,
            quiet,
            events,
            state: Mutex::new(SearchState {
                requested: filter,
                pending: None,
                disposed: false,
            }),
        };
        (controller, rx)
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The fetcher this controller drives.
    pub fn fetcher(&self) -> &Arc<PagedFetcher<T>> {
        &self.fetcher
    }

    /// Latest requested filter, whether or not its reset has run yet.
    pub fn filter(&self) -> Filter {
        self.lock().requested.clone()
    }

    /// Whether a debounced reset is waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.lock()
            .pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Load page 1 for the current filter right away, cancelling any
    /// pending debounced reset. Used on screen entry and pull-to-refresh.
    pub async fn refresh(&self) -> AppResult<LoadOutcome> {
        let filter = {
            let mut st = self.lock();
            if let Some(handle) = st.pending.take() {
                handle.abort();
            }
            st.requested.clone()
        };
        self.fetcher.reset(filter).await
    }

    /// Request `filter`. Returns `false` when it equals the latest
    /// requested filter, when the controller is disposed, or when it is
    /// the filter already on screen, in which case any pending reset is
    /// cancelled.
    pub fn set_filter(&self, filter: Filter) -> bool {
        let mut st = self.lock();
        if st.disposed || st.requested == filter {
            return false;
        }
        if let Some(handle) = st.pending.take() {
            handle.abort();
        }
        if self.fetcher.filter().as_ref() == Some(&filter) {
            debug!(filter = %filter, "Filter back to the list on screen");
            st.requested = filter;
            return false;
        }

        debug!(filter = %filter, quiet_ms = self.quiet.as_millis() as u64, "Scheduling list reset");
        st.requested = filter.clone();
        st.pending = Some(tokio::spawn(debounced_reset(
            self.fetcher.clone(),
            filter,
            self.quiet,
            self.events.clone(),
        )));
        true
    }

    /// Edit the latest requested filter in place and schedule a reset.
    pub fn update(&self, edit: impl FnOnce(&mut Filter)) -> bool {
        let mut filter = self.filter();
        edit(&mut filter);
        self.set_filter(filter)
    }

    /// Fetch the next page of the current list.
    pub async fn load_more(&self) -> AppResult<LoadOutcome> {
        self.fetcher.load_more().await
    }

    /// Cancel the pending timer and tear the list down.
    pub fn dispose(&self) {
        let mut st = self.lock();
        st.disposed = true;
        if let Some(handle) = st.pending.take() {
            handle.abort();
        }
        self.fetcher.dispose();
    }
}

impl<T: Listing> Drop for SearchController<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.lock().pending.take() {
            handle.abort();
        }
    }
}

async fn debounced_reset<T: Listing>(
    fetcher: Arc<PagedFetcher<T>>,
    filter: Filter,
    quiet: Duration,
    events: mpsc::UnboundedSender<SearchEvent>,
) {
    tokio::time::sleep(quiet).await;

    let event = match fetcher.reset(filter.clone()).await {
        Ok(outcome @ LoadOutcome::Loaded { .. }) => SearchEvent::Loaded { filter, outcome },
        Ok(_) => return,
        Err(error) => {
            warn!(filter = %filter, error = %error, "List reset failed");
            SearchEvent::Failed { filter, error }
        }
    };
    // The receiver may already be gone when the screen closed.
    let _ = events.send(event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    use bloodbridge_entity::Donor;

    use crate::testing::{ScriptedSource, donor, page_of};

    const QUIET: Duration = Duration::from_millis(500);

    fn setup() -> (
        Arc<ScriptedSource<Donor>>,
        SearchController<Donor>,
        mpsc::UnboundedReceiver<SearchEvent>,
    ) {
        let source = ScriptedSource::new(|_filter, _page| Ok(page_of(vec![donor(1, "O+")], false)));
        let fetcher = Arc::new(PagedFetcher::<Donor>::new(source.clone()));
        let (controller, events) = SearchController::new(fetcher, Filter::donors(), QUIET);
        (source, controller, events)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_fetches_once() {
        let (source, controller, mut events) = setup();

        assert!(controller.update(|f| f.set_location("D")));
        sleep(Duration::from_millis(100)).await;
        assert!(controller.update(|f| f.set_location("Dh")));
        sleep(Duration::from_millis(100)).await;
        assert!(controller.update(|f| f.set_location("Dha")));

        sleep(Duration::from_millis(499)).await;
        assert!(source.calls().is_empty());
        assert!(controller.is_pending());

        sleep(Duration::from_millis(2)).await;
        match events.recv().await {
            Some(SearchEvent::Loaded { filter, outcome }) => {
                assert_eq!(filter.location(), "Dha");
                assert!(outcome.is_loaded());
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(source.calls(), vec![("location=Dha".to_string(), 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_filter_is_noop() {
        let (source, controller, _events) = setup();

        assert!(!controller.set_filter(Filter::donors()));
        assert!(!controller.update(|f| f.set_location("   ")));
        sleep(QUIET * 2).await;
        assert!(source.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_reverted_before_quiet_period_fetches_nothing() {
        let (source, controller, _events) = setup();
        controller.refresh().await.unwrap();

        assert!(controller.update(|f| f.set_location("Uttara")));
        sleep(Duration::from_millis(200)).await;
        assert!(!controller.update(|f| f.set_location("")));
        assert!(!controller.is_pending());
        assert_eq!(controller.filter(), Filter::donors());

        sleep(QUIET * 2).await;
        assert_eq!(source.calls(), vec![(String::new(), 1)]);
        assert_eq!(controller.fetcher().filter(), Some(Filter::donors()));

        // Editing away again still schedules a reset.
        assert!(controller.update(|f| f.set_location("Banani")));
        assert!(controller.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_skips_the_quiet_period() {
        let (source, controller, _events) = setup();

        controller.update(|f| f.set_location("Uttara"));
        let outcome = controller.refresh().await.unwrap();
        assert!(outcome.is_loaded());
        assert!(!controller.is_pending());

        sleep(QUIET * 2).await;
        assert_eq!(source.calls(), vec![("location=Uttara".to_string(), 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reset_is_reported() {
        let source = ScriptedSource::<Donor>::new(|_filter, _page| Err(AppError::network("offline")));
        let fetcher: Arc<PagedFetcher<Donor>> = Arc::new(PagedFetcher::<Donor>::new(source));
        let (controller, mut events) = SearchController::new(fetcher, Filter::donors(), QUIET);

        controller.update(|f| f.set_location("Gulshan"));
        match events.recv().await {
            Some(SearchEvent::Failed { error, .. }) => assert!(error.is_network()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_cancels_pending_reset() {
        let (source, controller, _events) = setup();

        controller.update(|f| f.set_location("Mohammadpur"));
        controller.dispose();
        sleep(QUIET * 2).await;

        assert!(source.calls().is_empty());
        assert!(!controller.update(|f| f.set_location("Badda")));
        assert!(controller.fetcher().is_disposed());
    }
}
