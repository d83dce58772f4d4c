//! Filter state derived from the URL query, and the mutations that rewrite it.
//!
//! The URL is the single source of truth. [`FilterState`] is a pure function
//! of the current [`RawQuery`]; it is never edited in place. Mutations go
//! through [`Filters`], which computes the next query and hands it to a
//! [`Navigator`]. The new query is then observed like any other URL change.
//!
//! # Examples
//!
//! ```rust
//! use eiga::filters::{Filters, MemoryNavigator, Navigator};
//! use eiga::types::{Category, EraBucket};
//!
//! let filters = Filters::new(MemoryNavigator::new());
//! filters.set_category("tv");
//! filters.toggle_genre(18);
//! filters.set_era(EraBucket::Tens);
//!
//! let state = filters.state();
//! assert_eq!(state.category, Category::Tv);
//! assert_eq!(state.genre_ids, vec![18]);
//! assert_eq!(
//!     filters.navigator().current_query().to_query_string(),
//!     "era=2010s&genres=18&mediaType=tv"
//! );
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::{
    query::{RawQuery, build_query},
    types::{Category, EraBucket},
};

/// URL query keys owned by the filter state.
pub mod keys {
    pub const SEARCH: &str = "search";
    pub const CATEGORY: &str = "mediaType";
    pub const GENRES: &str = "genres";
    pub const ERA: &str = "era";
    pub const MIN_RATING: &str = "minRating";
}

/// Canonical filter view over a URL query.
///
/// Every field has a default, and unrecognized URL values collapse to it,
/// so exactly one category and one era bucket are always selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub category: Category,
    /// Selected genres in the order they were added.
    pub genre_ids: Vec<u32>,
    pub era: EraBucket,
    pub min_rating: Option<f64>,
}

impl FilterState {
    /// Derives the filter state from a raw query.
    ///
    /// ```rust
    /// use eiga::filters::FilterState;
    /// use eiga::query::RawQuery;
    /// use eiga::types::{Category, EraBucket};
    ///
    /// let state = FilterState::from_query(&RawQuery::parse("mediaType=anime&era=1980s&genres=28,x,12"));
    /// assert_eq!(state.category, Category::Movie);
    /// assert_eq!(state.era, EraBucket::All);
    /// assert_eq!(state.genre_ids, vec![28, 12]);
    /// ```
    pub fn from_query(query: &RawQuery) -> Self {
        Self {
            search: query.scalar(keys::SEARCH).unwrap_or_default().to_string(),
            category: query
                .scalar(keys::CATEGORY)
                .and_then(Category::parse)
                .unwrap_or_default(),
            genre_ids: parse_genre_ids(query.scalar(keys::GENRES).unwrap_or_default()),
            era: query
                .scalar(keys::ERA)
                .map(EraBucket::parse)
                .unwrap_or_default(),
            min_rating: query.scalar(keys::MIN_RATING).and_then(parse_rating),
        }
    }

    /// True iff any field differs from its default.
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || self.category != Category::default()
            || !self.genre_ids.is_empty()
            || self.era != EraBucket::default()
            || self.min_rating.is_some()
    }

    /// The selected genres as a comma-joined list, `None` when empty.
    pub fn genres_param(&self) -> Option<String> {
        join_genre_ids(&self.genre_ids)
    }
}

/// Parses a comma-joined genre list, keeping positive integers in first-seen order.
pub fn parse_genre_ids(raw: &str) -> Vec<u32> {
    let mut ids: Vec<u32> = Vec::new();
    for id in raw.split(',').filter_map(|part| part.trim().parse::<u32>().ok()) {
        if id != 0 && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Joins ids for the URL, dropping `0` so the result parses back unchanged.
fn join_genre_ids(ids: &[u32]) -> Option<String> {
    let joined = ids
        .iter()
        .filter(|&&id| id != 0)
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    (!joined.is_empty()).then_some(joined)
}

fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// The router collaborator: reads the current query and replaces it.
///
/// `navigate` has full-replace semantics; callers pass the complete desired
/// query, never a delta.
pub trait Navigator: Send + Sync {
    fn current_query(&self) -> RawQuery;

    fn navigate(&self, query: RawQuery);
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn current_query(&self) -> RawQuery {
        (**self).current_query()
    }

    fn navigate(&self, query: RawQuery) {
        (**self).navigate(query)
    }
}

#[derive(Debug)]
struct History {
    entries: Vec<RawQuery>,
    cursor: usize,
    revision: u64,
}

/// In-memory navigator with browser-like history.
///
/// Navigating to the query that is already current is a no-op, so repeated
/// writes of the same filters never grow the history.
///
/// ```rust
/// use eiga::filters::{MemoryNavigator, Navigator};
/// use eiga::query::RawQuery;
///
/// let nav = MemoryNavigator::new();
/// nav.navigate(RawQuery::parse("search=alien"));
/// nav.navigate(RawQuery::parse("search=aliens"));
/// assert!(nav.back());
/// assert_eq!(nav.current_query().scalar("search"), Some("alien"));
/// assert!(nav.forward());
/// assert_eq!(nav.current_query().scalar("search"), Some("aliens"));
/// ```
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<History>,
}

impl MemoryNavigator {
    /// Starts at the empty query.
    pub fn new() -> Self {
        Self::with_query(RawQuery::new())
    }

    /// Starts at `query`, as when a bookmarked URL is opened.
    pub fn with_query(query: RawQuery) -> Self {
        Self {
            history: Mutex::new(History {
                entries: vec![query],
                cursor: 0,
                revision: 0,
            }),
        }
    }

    /// Steps back in history. Returns `false` at the first entry.
    pub fn back(&self) -> bool {
        let mut history = self.history.lock();
        if history.cursor == 0 {
            return false;
        }
        history.cursor -= 1;
        history.revision += 1;
        true
    }

    /// Steps forward in history. Returns `false` at the last entry.
    pub fn forward(&self) -> bool {
        let mut history = self.history.lock();
        if history.cursor + 1 >= history.entries.len() {
            return false;
        }
        history.cursor += 1;
        history.revision += 1;
        true
    }

    /// Incremented whenever the current query changes.
    pub fn revision(&self) -> u64 {
        self.history.lock().revision
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().entries.len()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for MemoryNavigator {
    fn current_query(&self) -> RawQuery {
        let history = self.history.lock();
        history.entries[history.cursor].clone()
    }

    fn navigate(&self, query: RawQuery) {
        let mut history = self.history.lock();
        if history.entries[history.cursor] == query {
            return;
        }
        let keep = history.cursor + 1;
        history.entries.truncate(keep);
        history.entries.push(query);
        history.cursor = keep;
        history.revision += 1;
    }
}

/// Filter mutations over a [`Navigator`].
///
/// Each mutation computes the next query from the navigator's current one and
/// requests navigation to it. None of them fail.
#[derive(Debug)]
pub struct Filters<N> {
    navigator: N,
}

impl<N: Navigator> Filters<N> {
    pub fn new(navigator: N) -> Self {
        Self { navigator }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// The filter state for the navigator's current query.
    pub fn state(&self) -> FilterState {
        FilterState::from_query(&self.navigator.current_query())
    }

    fn update_query(&self, patch: &[(&str, Option<String>)]) {
        let query = build_query(&self.navigator.current_query(), patch);
        debug!(query = %query.to_query_string(), "navigating");
        self.navigator.navigate(query);
    }

    pub fn set_search(&self, text: &str) {
        self.update_query(&[(keys::SEARCH, Some(text.to_string()))]);
    }

    /// Switches category and clears the genre selection.
    ///
    /// Values other than `"movie"` and `"tv"` are ignored without navigating,
    /// so a malformed value can never be written back into the URL.
    pub fn set_category(&self, value: &str) {
        let Some(category) = Category::parse(value) else {
            debug!(value, "ignoring unknown category");
            return;
        };
        let category_param = (category != Category::default()).then(|| category.as_str().to_string());
        self.update_query(&[(keys::CATEGORY, category_param), (keys::GENRES, None)]);
    }

    /// Adds `id` to the genre selection, or removes it if already selected.
    pub fn toggle_genre(&self, id: u32) {
        let mut ids = self.state().genre_ids;
        match ids.iter().position(|&g| g == id) {
            Some(index) => {
                ids.remove(index);
            }
            None => ids.push(id),
        }
        self.set_genres(&ids);
    }

    pub fn set_genres(&self, ids: &[u32]) {
        self.update_query(&[(keys::GENRES, join_genre_ids(ids))]);
    }

    pub fn set_era(&self, era: EraBucket) {
        self.update_query(&[(keys::ERA, era.as_query_value().map(str::to_string))]);
    }

    pub fn set_min_rating(&self, value: Option<f64>) {
        let value = value.filter(|v| v.is_finite()).map(|v| v.to_string());
        self.update_query(&[(keys::MIN_RATING, value)]);
    }

    /// Resets every filter by navigating to the empty query.
    pub fn clear_all(&self) {
        debug!("clearing all filters");
        self.navigator.navigate(RawQuery::new());
    }
}
