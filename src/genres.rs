//! Per-category genre reference data.
//!
//! Genre vocabularies differ between movies and tv, and change rarely, so
//! [`GenreCache`] fetches each category's list at most once and serves later
//! requests from memory. Entries live as long as the cache and are never
//! evicted.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    source::Source,
    types::{Category, Genre},
};

/// Renderable view of a [`GenreCache`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreState {
    /// Genres for the most recently requested category.
    pub genres: Vec<Genre>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    state: GenreState,
    cache: HashMap<Category, Vec<Genre>>,
    observed: Option<Category>,
    generation: u64,
}

/// Genre lists keyed by [`Category`], fetched lazily from one [`Source`].
pub struct GenreCache {
    source: Arc<dyn Source>,
    inner: Mutex<Inner>,
}

impl GenreCache {
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self {
            source,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Makes `category`'s genres the live list.
    ///
    /// A cached list is assigned directly without a request. Otherwise the
    /// list is fetched and cached; on failure the live list is emptied and
    /// the error recorded. If another category is requested while this fetch
    /// is in flight, the result is still cached but not made live.
    pub async fn fetch(&self, category: Category) {
        let generation = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            if let Some(cached) = inner.cache.get(&category).cloned() {
                debug!(%category, genres = cached.len(), "genre cache hit");
                inner.state.genres = cached;
                inner.state.loading = false;
                return;
            }
            inner.state.loading = true;
            inner.state.error = None;
            inner.generation
        };

        debug!(source = self.source.id(), %category, "fetching genres");
        let result = self.source.genres(category).await;

        let mut inner = self.inner.lock();
        let latest = inner.generation == generation;
        match result {
            Ok(genres) => {
                inner.cache.insert(category, genres.clone());
                if latest {
                    inner.state.genres = genres;
                }
            }
            Err(e) => {
                warn!(%category, error = %e, "genre fetch failed");
                if latest {
                    inner.state.error = Some(e.user_message());
                    inner.state.genres.clear();
                }
            }
        }
        if latest {
            inner.state.loading = false;
        } else {
            debug!(%category, "genre response superseded");
        }
    }

    /// Fetches when `category` differs from the last one observed.
    ///
    /// The first call always fetches. Returns whether [`fetch`](Self::fetch)
    /// ran.
    pub async fn apply_category(&self, category: Category) -> bool {
        let changed = {
            let mut inner = self.inner.lock();
            let changed = inner.observed != Some(category);
            inner.observed = Some(category);
            changed
        };
        if changed {
            self.fetch(category).await;
        }
        changed
    }

    /// Whether `category`'s list has been fetched.
    pub fn is_cached(&self, category: Category) -> bool {
        self.inner.lock().cache.contains_key(&category)
    }

    pub fn snapshot(&self) -> GenreState {
        self.inner.lock().state.clone()
    }

    pub fn genres(&self) -> Vec<Genre> {
        self.inner.lock().state.genres.clone()
    }

    /// Looks up a genre name in any cached category.
    pub fn name_of(&self, id: u32) -> Option<String> {
        let inner = self.inner.lock();
        inner
            .cache
            .values()
            .flatten()
            .find(|genre| genre.id == id)
            .map(|genre| genre.name.clone())
    }
}
