//! Media metadata backends with conditional compilation support.
//!
//! Each backend sits behind its own feature flag so a build can include only
//! the APIs it talks to.
//!
//! # Feature Flags
//!
//! - `source-tmdb` - Enables the TMDB source
//! - `source-omdb` - Enables the OMDb source
//! - `all-sources` - Enables both (default)
//!
//! # Examples
//!
//! Build with only TMDB support:
//! ```bash
//! cargo build --no-default-features --features source-tmdb
//! ```
//!
//! # Available Sources
//!
//! - [`TmdbSource`] - The Movie Database v3 API (requires `source-tmdb`)
//! - [`OmdbSource`] - The Open Movie Database (requires `source-omdb`)

#[cfg(feature = "source-tmdb")]
pub mod tmdb;

#[cfg(feature = "source-omdb")]
pub mod omdb;

#[cfg(feature = "source-tmdb")]
pub use tmdb::TmdbSource;

#[cfg(feature = "source-omdb")]
pub use omdb::OmdbSource;
