//! The upstream media API collaborator.
//!
//! A [`Source`] is one metadata backend. The catalogue controllers only talk
//! to this trait, so the backend is chosen by whichever implementation is
//! wired into a [`Session`](crate::session::Session):
//!
//! - [`TmdbSource`](crate::sources::TmdbSource) - REST-style, paginated,
//!   structured discover filters and genre lists
//! - [`OmdbSource`](crate::sources::OmdbSource) - key/string search with a
//!   `Response: "True"/"False"` envelope
//!
//! # Examples
//!
//! ```rust
//! use eiga::prelude::*;
//! use eiga::error::Result;
//! use async_trait::async_trait;
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl Source for Fixed {
//!     fn id(&self) -> &'static str { "fixed" }
//!     fn name(&self) -> &'static str { "Fixed" }
//!     fn base_url(&self) -> &str { "https://example.com" }
//!
//!     async fn discover(&self, _: Category, params: &ParamBag) -> Result<ResultPage<MediaItem>> {
//!         let page = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
//!         Ok(ResultPage::empty(page))
//!     }
//!
//!     async fn search(&self, _: Category, query: &SearchQuery) -> Result<ResultPage<MediaItem>> {
//!         Ok(ResultPage::empty(query.page))
//!     }
//!
//!     async fn details(&self, _: Category, id: &str) -> Result<MediaDetails> {
//!         Err(eiga::Error::not_found(id))
//!     }
//!
//!     async fn genres(&self, _: Category) -> Result<Vec<Genre>> {
//!         Ok(vec![])
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::{
    error::Result,
    filters::FilterState,
    params::{ParamBag, SearchQuery, discover_params},
    types::{Category, Genre, MediaDetails, MediaItem, ResultPage},
};

/// Trait that all media metadata backends implement.
///
/// # Required Methods
///
/// * [`id()`](Source::id) - Unique identifier for the source
/// * [`name()`](Source::name) - Human-readable name
/// * [`base_url()`](Source::base_url) - API root
/// * [`discover()`](Source::discover) - Filter-driven listing
/// * [`search()`](Source::search) - Free-text search
/// * [`details()`](Source::details) - Full record for one item
/// * [`genres()`](Source::genres) - Genre reference list for a category
///
/// # Implementation Guidelines
///
/// - Use the [`net::HttpClient`](crate::net::HttpClient) for HTTP requests
/// - Report API-level failures ("not found", "too many results") as
///   [`Error::Source`](crate::Error::Source) with the upstream text, so it
///   reaches users verbatim
/// - Preserve the server's result order
#[async_trait]
pub trait Source: Send + Sync {
    /// Short lowercase identifier, used for logging and error attribution.
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// API root, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Lists items matching structured filters.
    ///
    /// `params` is what [`discover_params`](Source::discover_params) produced
    /// for this source.
    async fn discover(&self, category: Category, params: &ParamBag)
    -> Result<ResultPage<MediaItem>>;

    /// Free-text search. Mutually exclusive with `discover`.
    async fn search(&self, category: Category, query: &SearchQuery)
    -> Result<ResultPage<MediaItem>>;

    /// Full record for one item, including its cast.
    ///
    /// # Errors
    ///
    /// * [`Error::NotFound`](crate::Error::NotFound) or
    ///   [`Error::Source`](crate::Error::Source) - If the item doesn't exist
    async fn details(&self, category: Category, id: &str) -> Result<MediaDetails>;

    /// The genre vocabulary for a category.
    async fn genres(&self, category: Category) -> Result<Vec<Genre>>;

    /// Maps a filter state to this source's discover parameters.
    ///
    /// The default produces the TMDB shape, see
    /// [`params::discover_params`](crate::params::discover_params).
    fn discover_params(&self, filter: &FilterState, page: u32) -> ParamBag {
        discover_params(filter, page)
    }
}
