//! Mapping from filter state to upstream request parameters.
//!
//! Keeping this mapping pure makes the era/category coupling testable
//! without a network. Movies and tv shows use different date field names
//! upstream, and the two pairs are not interchangeable.
//!
//! # Examples
//!
//! ```rust
//! use eiga::filters::FilterState;
//! use eiga::params::discover_params;
//! use eiga::types::{Category, EraBucket};
//!
//! let filter = FilterState {
//!     category: Category::Tv,
//!     era: EraBucket::Twenties,
//!     ..Default::default()
//! };
//! let params = discover_params(&filter, 1);
//! assert_eq!(params.get("first_air_date.gte"), Some("2020-01-01"));
//! assert_eq!(params.get("first_air_date.lte"), Some("2029-12-31"));
//! assert_eq!(params.get("primary_release_date.gte"), None);
//! ```

use crate::{filters::FilterState, types::Category};

/// Ordered list of request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamBag {
    params: Vec<(String, String)>,
}

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any earlier value for it.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A free-text search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub page: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page,
        }
    }
}

/// The pair of date fields a category filters releases by.
pub fn date_fields(category: Category) -> (&'static str, &'static str) {
    match category {
        Category::Movie => ("primary_release_date.gte", "primary_release_date.lte"),
        Category::Tv => ("first_air_date.gte", "first_air_date.lte"),
    }
}

/// Maps a filter state to discover parameters in the TMDB shape.
///
/// 1. `page`
/// 2. `with_genres` when genres are selected
/// 3. the category's date-range pair when an era is selected
/// 4. `vote_average.gte` when a minimum rating is set
pub fn discover_params(filter: &FilterState, page: u32) -> ParamBag {
    let mut params = ParamBag::new();
    params.set("page", page);

    if let Some(genres) = filter.genres_param() {
        params.set("with_genres", genres);
    }

    if let Some(range) = filter.era.date_range() {
        let (gte, lte) = date_fields(filter.category);
        params.set(gte, range.gte());
        params.set(lte, range.lte());
    }

    if let Some(rating) = filter.min_rating {
        params.set("vote_average.gte", rating);
    }

    params
}
