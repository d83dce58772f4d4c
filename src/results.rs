//! Paginated result fetching for the current filter state.
//!
//! [`ResultsController`] turns a [`FilterState`] into upstream requests and
//! accumulates pages into one list. A non-empty search term routes to
//! [`Source::search`], anything else to [`Source::discover`] with the
//! source's own parameter mapping.
//!
//! Every request takes a generation number when it starts. When it settles,
//! its outcome is applied only if no newer request was started in the
//! meantime, so a slow page-1 response for old filters can never overwrite
//! the results for the current ones.
//!
//! Failures never escape the controller. They are reduced to a display
//! string (see [`Error::user_message`](crate::Error::user_message)) and
//! stored in [`ResultsState::error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use eiga::filters::FilterState;
//! use eiga::results::ResultsController;
//! use eiga::sources::TmdbSource;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let results = ResultsController::new(Arc::new(TmdbSource::with_token("<token>")));
//! results.refresh(&FilterState::default()).await;
//! if results.has_more() {
//!     results.load_more().await;
//! }
//! println!("{} items", results.snapshot().items.len());
//! # }
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{
    filters::FilterState,
    params::SearchQuery,
    source::Source,
    types::{Category, MediaDetails, MediaItem},
};

/// Renderable view of a [`ResultsController`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsState {
    pub items: Vec<MediaItem>,
    /// Last page fetched successfully, starting at 1.
    pub current_page: u32,
    pub total_pages: u32,
    /// True while a listing or details request is in flight.
    pub loading: bool,
    pub error: Option<String>,
    pub selected_media: Option<MediaDetails>,
}

impl ResultsState {
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl Default for ResultsState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
            loading: false,
            error: None,
            selected_media: None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ResultsState,
    last_filter: Option<FilterState>,
    /// The filter the current `items` were loaded for.
    items_filter: Option<FilterState>,
    /// Page of the latest listing request while it is in flight.
    pending_page: Option<u32>,
    generation: u64,
    details_generation: u64,
    list_pending: bool,
    details_pending: bool,
}

impl Inner {
    fn update_loading(&mut self) {
        self.state.loading = self.list_pending || self.details_pending;
    }
}

/// Fetches and accumulates result pages from one [`Source`].
pub struct ResultsController {
    source: Arc<dyn Source>,
    inner: Mutex<Inner>,
}

impl ResultsController {
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn source(&self) -> &Arc<dyn Source> {
        &self.source
    }

    /// Fetches `page` for `filter`.
    ///
    /// Page 1 replaces the list, later pages append to it. On failure the
    /// error is recorded; a failed page 1 also empties the list, while a
    /// failed later page keeps what was already loaded.
    pub async fn fetch_items(&self, filter: &FilterState, page: u32) {
        let page = page.max(1);
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.list_pending = true;
            inner.pending_page = Some(page);
            inner.state.error = None;
            inner.last_filter = Some(filter.clone());
            inner.update_loading();
            inner.generation
        };

        debug!(
            source = self.source.id(),
            category = %filter.category,
            search = %filter.search,
            page,
            generation,
            "fetching results"
        );

        let result = if filter.search.is_empty() {
            let params = self.source.discover_params(filter, page);
            self.source.discover(filter.category, &params).await
        } else {
            let query = SearchQuery::new(filter.search.clone(), page);
            self.source.search(filter.category, &query).await
        };

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            debug!(generation, latest = inner.generation, "discarding stale results");
            return;
        }
        inner.list_pending = false;
        inner.pending_page = None;
        inner.update_loading();

        if page == 1 {
            inner.items_filter = Some(filter.clone());
        } else if inner.items_filter.as_ref() != Some(filter) {
            debug!(page, "discarding page for a filter the list no longer shows");
            return;
        }

        match result {
            Ok(result) => {
                info!(
                    page,
                    items = result.items.len(),
                    total_pages = result.total_pages,
                    "results loaded"
                );
                if page == 1 {
                    inner.state.items = result.items;
                } else {
                    inner.state.items.extend(result.items);
                }
                inner.state.total_pages = result.total_pages;
                inner.state.current_page = page;
            }
            Err(e) => {
                warn!(page, error = %e, "results fetch failed");
                inner.state.error = Some(e.user_message());
                if page == 1 {
                    inner.state.items.clear();
                    inner.state.total_pages = 0;
                }
            }
        }
    }

    /// Fetches page 1 for `filter`.
    pub async fn refresh(&self, filter: &FilterState) {
        self.fetch_items(filter, 1).await;
    }

    /// Fetches the page after the current one for the filter the list was
    /// loaded with.
    ///
    /// Does nothing while a page-1 request is in flight, since that request
    /// replaces the list. Does not check [`has_more`](Self::has_more); callers
    /// decide when to offer more results.
    pub async fn load_more(&self) {
        let (filter, page) = {
            let inner = self.inner.lock();
            if inner.pending_page == Some(1) {
                debug!("page 1 in flight, not loading more");
                return;
            }
            let filter = inner
                .items_filter
                .clone()
                .or_else(|| inner.last_filter.clone())
                .unwrap_or_default();
            (filter, inner.state.current_page + 1)
        };
        self.fetch_items(&filter, page).await;
    }

    /// Refreshes when `filter` differs from the last one applied.
    ///
    /// The first call always refreshes. Returns whether a fetch happened.
    pub async fn apply_filters(&self, filter: &FilterState) -> bool {
        let changed = self.inner.lock().last_filter.as_ref() != Some(filter);
        if changed {
            self.refresh(filter).await;
        }
        changed
    }

    /// Loads the full record for one item into
    /// [`selected_media`](ResultsState::selected_media).
    ///
    /// Shares `loading` and `error` with the listing. On failure the selected
    /// media is cleared.
    pub async fn fetch_media_details(&self, category: Category, id: &str) {
        let generation = {
            let mut inner = self.inner.lock();
            inner.details_generation += 1;
            inner.details_pending = true;
            inner.state.error = None;
            inner.update_loading();
            inner.details_generation
        };

        debug!(source = self.source.id(), %category, id, "fetching details");
        let result = self.source.details(category, id).await;

        let mut inner = self.inner.lock();
        if inner.details_generation != generation {
            debug!(id, "discarding stale details");
            return;
        }
        inner.details_pending = false;
        inner.update_loading();

        match result {
            Ok(details) => inner.state.selected_media = Some(details),
            Err(e) => {
                warn!(id, error = %e, "details fetch failed");
                inner.state.error = Some(e.user_message());
                inner.state.selected_media = None;
            }
        }
    }

    pub fn clear_selected_media(&self) {
        self.inner.lock().state.selected_media = None;
    }

    /// A copy of the current state for rendering.
    pub fn snapshot(&self) -> ResultsState {
        self.inner.lock().state.clone()
    }

    pub fn items(&self) -> Vec<MediaItem> {
        self.inner.lock().state.items.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.inner.lock().state.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.inner.lock().state.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.lock().state.error.clone()
    }

    pub fn has_more(&self) -> bool {
        self.inner.lock().state.has_more()
    }

    pub fn selected_media(&self) -> Option<MediaDetails> {
        self.inner.lock().state.selected_media.clone()
    }

    /// The filter of the most recent listing request.
    pub fn last_filter(&self) -> Option<FilterState> {
        self.inner.lock().last_filter.clone()
    }
}
