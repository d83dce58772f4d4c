//! # Eiga - headless movie and TV catalogue core
//!
//! Eiga is the state layer behind a browsable movie/TV catalogue. The URL
//! query string is the only persisted filter state: it is decoded into a
//! typed [`FilterState`], mapped to upstream request parameters, and the
//! matching pages are fetched and accumulated. Filter changes are written
//! back by rewriting the query, so every view of the catalogue can be
//! bookmarked and shared.
//!
//! ## Features
//!
//! - **URL-synchronised filters**: search, category, genres, era and minimum
//!   rating live in the query string, with forgiving decoding
//! - **Paginated results**: page 1 replaces, later pages append, stale
//!   responses are discarded
//! - **Genre reference cache**: one fetch per category per session
//! - **Pluggable backends**: TMDB and OMDb behind one [`Source`] trait
//! - **Rate limiting and retries**: per-source delays and backoff on 429
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use eiga::prelude::*;
//! use eiga::sources::TmdbSource;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> eiga::Result<()> {
//!     let config = Config::from_env()?;
//!     let source = Arc::new(TmdbSource::from_config(&config)?);
//!
//!     let navigator = MemoryNavigator::with_query(RawQuery::parse("era=2010s&genres=28"));
//!     let session = Session::new(source, navigator);
//!     session.sync().await;
//!
//!     let state = session.results().snapshot();
//!     println!("{} items, more: {}", state.items.len(), state.has_more());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`query`]: raw URL query decoding and patching
//! - [`filters`]: [`FilterState`] derivation, mutators and the [`Navigator`] seam
//! - [`params`]: filter state → upstream parameters
//! - [`source`] / [`sources`]: the backend trait and its implementations
//! - [`results`]: the paginated [`ResultsController`]
//! - [`genres`]: the per-category [`GenreCache`]
//! - [`session`]: the [`Session`] context object wiring it all together
//! - [`route`]: detail-page paths
//! - [`net`]: HTTP client, rate limiting and JSON helpers
//! - [`config`] / [`error`]: settings and the crate error type

pub mod config;
pub mod error;
pub mod filters;
pub mod genres;
pub mod net;
pub mod params;
pub mod query;
pub mod results;
pub mod route;
pub mod session;
pub mod source;
pub mod sources;
pub mod types;

/// Prelude module for convenient imports.
///
/// ```rust
/// use eiga::prelude::*;
///
/// let filters = Filters::new(MemoryNavigator::new());
/// filters.set_search("alien");
/// assert_eq!(filters.state().category, Category::Movie);
/// ```
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigBuilder},
        error::{Error, Result},
        filters::{FilterState, Filters, MemoryNavigator, Navigator},
        genres::{GenreCache, GenreState},
        params::{ParamBag, SearchQuery},
        query::{QueryValue, RawQuery},
        results::{ResultsController, ResultsState},
        route::DetailRoute,
        session::Session,
        source::Source,
        types::{Category, EraBucket, Genre, MediaDetails, MediaItem, ResultPage},
    };
}

// Re-export main types at crate root for direct access
pub use config::Config;
pub use error::{Error, FALLBACK_ERROR_MESSAGE, Result};
pub use filters::{FilterState, Filters, MemoryNavigator, Navigator};
pub use genres::GenreCache;
pub use query::RawQuery;
pub use results::ResultsController;
pub use session::Session;
pub use source::Source;
pub use types::{Category, EraBucket, Genre, MediaDetails, MediaItem, ResultPage};
