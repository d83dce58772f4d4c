//! URL query codec.
//!
//! The router hands us an untyped query map in which a key may be absent,
//! carry one value, or carry several (`?genres=28&genres=12`). This module
//! converts such values into scalars and builds sanitized queries from
//! partial updates.
//!
//! # Examples
//!
//! ```rust
//! use eiga::query::{build_query, extract_scalar, RawQuery};
//!
//! let current = RawQuery::parse("?search=batman&era=2020s");
//! assert_eq!(extract_scalar(current.get("search")), Some("batman"));
//!
//! let next = build_query(&current, &[("search", None), ("genres", Some("28".into()))]);
//! assert_eq!(next.to_query_string(), "era=2020s&genres=28");
//! ```

use std::collections::BTreeMap;

/// A raw query value: one (possibly null) value, or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Single(Option<String>),
    Many(Vec<Option<String>>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(Some(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(Some(value))
    }
}

impl From<Option<&str>> for QueryValue {
    fn from(value: Option<&str>) -> Self {
        QueryValue::Single(value.map(str::to_string))
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::Many(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

/// The router's query map, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    entries: BTreeMap<String, QueryValue>,
}

impl RawQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a form-urlencoded query string, with or without a leading `?`.
    ///
    /// Repeated keys are collected into [`QueryValue::Many`] in order of
    /// appearance.
    ///
    /// ```rust
    /// use eiga::query::{QueryValue, RawQuery};
    ///
    /// let query = RawQuery::parse("genres=28&genres=12&search=dark%20knight");
    /// assert_eq!(query.get("genres"), Some(&QueryValue::from(vec!["28", "12"])));
    /// assert_eq!(query.get("search"), Some(&QueryValue::from("dark knight")));
    /// ```
    pub fn parse(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.get(key)
    }

    /// The scalar value for `key`, see [`extract_scalar`].
    pub fn scalar(&self, key: &str) -> Option<&str> {
        extract_scalar(self.get(key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        self.entries.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serializes the query deterministically (keys sorted, no leading `?`).
    ///
    /// Lists are expanded into repeated keys; null values become bare keys.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        for (key, value) in &self.entries {
            let key = urlencoding::encode(key);
            match value {
                QueryValue::Single(v) => parts.push(encode_pair(&key, v.as_deref())),
                QueryValue::Many(values) => {
                    for v in values {
                        parts.push(encode_pair(&key, v.as_deref()));
                    }
                }
            }
        }
        parts.join("&")
    }
}

fn encode_pair(key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{}={}", key, urlencoding::encode(v)),
        None => key.to_string(),
    }
}

impl<K, V> FromIterator<(K, V)> for RawQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries: BTreeMap<String, QueryValue> = BTreeMap::new();
        for (key, value) in iter {
            let key = key.into();
            let value = Some(value.into());
            let merged = match entries.remove(&key) {
                None => QueryValue::Single(value),
                Some(QueryValue::Single(first)) => QueryValue::Many(vec![first, value]),
                Some(QueryValue::Many(mut values)) => {
                    values.push(value);
                    QueryValue::Many(values)
                }
            };
            entries.insert(key, merged);
        }
        Self { entries }
    }
}

/// Reduces a raw query value to a single scalar.
///
/// Lists yield their first element, or `None` when the list is empty or its
/// first element is null. Absent values yield `None`.
///
/// ```rust
/// use eiga::query::{extract_scalar, QueryValue};
///
/// assert_eq!(extract_scalar(Some(&QueryValue::from("batman"))), Some("batman"));
/// assert_eq!(extract_scalar(Some(&QueryValue::from(vec!["batman", "superman"]))), Some("batman"));
/// assert_eq!(extract_scalar(Some(&QueryValue::Many(vec![None, Some("batman".into())]))), None);
/// assert_eq!(extract_scalar(None), None);
/// ```
pub fn extract_scalar(raw: Option<&QueryValue>) -> Option<&str> {
    match raw? {
        QueryValue::Single(value) => value.as_deref(),
        QueryValue::Many(values) => values.first()?.as_deref(),
    }
}

/// Applies a partial update to `current` and returns the new query.
///
/// Patch entries whose value is `None` or empty remove their key; all others
/// set it. Keys not mentioned in `patch` are kept as they are. `current` is
/// never modified.
pub fn build_query(current: &RawQuery, patch: &[(&str, Option<String>)]) -> RawQuery {
    let mut query = current.clone();
    for (key, value) in patch {
        match value.as_deref() {
            None | Some("") => {
                query.remove(key);
            }
            Some(v) => query.insert(*key, v),
        }
    }
    query
}
