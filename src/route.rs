//! Detail-page routes.
//!
//! The catalogue lives at `/` with its filters in the query string. A single
//! item lives at `/{movie|tv}/{id}`, where the id is a TMDB number or an
//! IMDb-style `tt` id as used by OMDb. Any other path is not a detail route
//! and should fall back to the catalogue.
//!
//! ```rust
//! use eiga::route::DetailRoute;
//! use eiga::types::Category;
//!
//! let route = DetailRoute::parse("/tv/1396").unwrap();
//! assert_eq!(route.category, Category::Tv);
//! assert_eq!(route.id, "1396");
//! assert_eq!(route.path(), "/tv/1396");
//!
//! assert!(DetailRoute::parse("/anime/1").is_none());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::types::Category;

static DETAIL_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/(movie|tv)/(\d+|tt\d+)/?$").expect("Failed to compile detail route pattern")
});

/// A parsed `/{category}/{id}` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailRoute {
    pub category: Category,
    pub id: String,
}

impl DetailRoute {
    pub fn new(category: Category, id: impl Into<String>) -> Self {
        Self {
            category,
            id: id.into(),
        }
    }

    /// Parses a path, ignoring any query string or fragment.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let captures = DETAIL_PATH.captures(path)?;
        let category = Category::parse(captures.get(1)?.as_str())?;
        Some(Self::new(category, captures.get(2)?.as_str()))
    }

    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DetailRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.category, self.id)
    }
}
