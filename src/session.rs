//! One catalogue session: filters, results and genres wired to a navigator.
//!
//! A [`Session`] is the context object a front-end constructs once. It owns
//! the [`Filters`] over its [`Navigator`], a [`ResultsController`] and a
//! [`GenreCache`], all reading from the same [`Source`].
//!
//! Mutations only rewrite the URL query. Call [`Session::sync`] after a
//! navigation (a mutation, a back/forward step, a pasted link) to re-derive
//! the filter state and fetch whatever it now requires.
//!
//! # Examples
//!
//! ```rust,no_run
//! use eiga::prelude::*;
//! use eiga::sources::TmdbSource;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let session = Session::new(
//!     Arc::new(TmdbSource::with_token("<token>")),
//!     MemoryNavigator::new(),
//! );
//! session.sync().await;
//!
//! session.filters().set_category("tv");
//! session.filters().toggle_genre(18);
//! session.sync().await;
//!
//! for item in session.results().snapshot().items {
//!     println!("{}", item.title);
//! }
//! # }
//! ```

use std::sync::Arc;
use tracing::debug;

use crate::{
    filters::{FilterState, Filters, Navigator},
    genres::GenreCache,
    results::ResultsController,
    route::DetailRoute,
    source::Source,
};

/// What [`Session::sync`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub genres_fetched: bool,
    pub results_fetched: bool,
}

pub struct Session<N> {
    filters: Filters<N>,
    results: ResultsController,
    genres: GenreCache,
}

impl<N: Navigator> Session<N> {
    pub fn new(source: Arc<dyn Source>, navigator: N) -> Self {
        Self {
            filters: Filters::new(navigator),
            results: ResultsController::new(Arc::clone(&source)),
            genres: GenreCache::new(source),
        }
    }

    pub fn filters(&self) -> &Filters<N> {
        &self.filters
    }

    pub fn results(&self) -> &ResultsController {
        &self.results
    }

    pub fn genres(&self) -> &GenreCache {
        &self.genres
    }

    /// The filter state for the navigator's current query.
    pub fn state(&self) -> FilterState {
        self.filters.state()
    }

    /// Re-derives the filter state and brings genres and results up to date.
    ///
    /// Genres are fetched when the category changed, results when any filter
    /// changed. The first call fetches both. The two run concurrently.
    pub async fn sync(&self) -> SyncOutcome {
        let state = self.filters.state();
        debug!(?state, "syncing session");

        let (genres_fetched, results_fetched) = futures::join!(
            self.genres.apply_category(state.category),
            self.results.apply_filters(&state),
        );

        SyncOutcome {
            genres_fetched,
            results_fetched,
        }
    }

    pub async fn load_more(&self) {
        self.results.load_more().await;
    }

    /// Loads the item behind a detail route into the results' selected media.
    pub async fn open_details(&self, route: &DetailRoute) {
        self.results
            .fetch_media_details(route.category, &route.id)
            .await;
    }

    /// Opens `path` if it is a detail route. Returns `false` for any other
    /// path, which belongs to the catalogue.
    pub async fn open_path(&self, path: &str) -> bool {
        match DetailRoute::parse(path) {
            Some(route) => {
                self.open_details(&route).await;
                true
            }
            None => false,
        }
    }

    pub fn close_details(&self) {
        self.results.clear_selected_media();
    }
}
