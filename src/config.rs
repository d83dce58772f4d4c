//! Backend configuration.
//!
//! [`Config`] carries credentials and tuning for the upstream sources. Build
//! it fluently with [`ConfigBuilder`] or read it from `EIGA_*` environment
//! variables with [`Config::from_env`].
//!
//! | Variable | Field |
//! |---|---|
//! | `EIGA_TMDB_TOKEN` | `tmdb_token` (v4 read access token) |
//! | `EIGA_TMDB_API_KEY` | `tmdb_api_key` (v3 key) |
//! | `EIGA_TMDB_BASE_URL` | `tmdb_base_url` |
//! | `EIGA_LANGUAGE` | `language` |
//! | `EIGA_OMDB_API_KEY` | `omdb_api_key` |
//! | `EIGA_OMDB_BASE_URL` | `omdb_base_url` |
//! | `EIGA_RATE_LIMIT_MS` | `rate_limit_ms` |
//! | `EIGA_MAX_RETRIES` | `max_retries` |
//!
//! # Examples
//!
//! ```rust
//! use eiga::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::default()
//!     .tmdb_token("token")
//!     .language("en-US")
//!     .rate_limit_ms(100u64)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.tmdb_base_url, "https://api.themoviedb.org/3");
//! assert_eq!(config.max_retries, 3);
//! ```

use derive_builder::Builder;
use std::str::FromStr;

use crate::error::{Error, Result};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_OMDB_BASE_URL: &str = "https://www.omdbapi.com";

/// Credentials and tuning for the upstream sources.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(default)]
pub struct Config {
    /// TMDB read access token, sent as a bearer token
    #[builder(setter(into, strip_option))]
    pub tmdb_token: Option<String>,

    /// TMDB v3 API key, sent as the `api_key` query parameter
    #[builder(setter(into, strip_option))]
    pub tmdb_api_key: Option<String>,

    #[builder(setter(into))]
    pub tmdb_base_url: String,

    /// Response language, for example `en-US`
    #[builder(setter(into, strip_option))]
    pub language: Option<String>,

    #[builder(setter(into, strip_option))]
    pub omdb_api_key: Option<String>,

    #[builder(setter(into))]
    pub omdb_base_url: String,

    /// Minimum delay between requests to one source
    #[builder(setter(into))]
    pub rate_limit_ms: u64,

    #[builder(setter(into))]
    pub max_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_token: None,
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            language: None,
            omdb_api_key: None,
            omdb_base_url: DEFAULT_OMDB_BASE_URL.to_string(),
            rate_limit_ms: 250,
            max_retries: 3,
        }
    }
}

impl Config {
    /// Reads configuration from `EIGA_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// * [`Error::Config`] - If a numeric variable cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps variable names to values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Ok(Self {
            tmdb_token: get("EIGA_TMDB_TOKEN"),
            tmdb_api_key: get("EIGA_TMDB_API_KEY"),
            tmdb_base_url: get("EIGA_TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            language: get("EIGA_LANGUAGE"),
            omdb_api_key: get("EIGA_OMDB_API_KEY"),
            omdb_base_url: get("EIGA_OMDB_BASE_URL").unwrap_or(defaults.omdb_base_url),
            rate_limit_ms: parse_var("EIGA_RATE_LIMIT_MS", get("EIGA_RATE_LIMIT_MS"))?
                .unwrap_or(defaults.rate_limit_ms),
            max_retries: parse_var("EIGA_MAX_RETRIES", get("EIGA_MAX_RETRIES"))?
                .unwrap_or(defaults.max_retries),
        })
    }

    /// Whether TMDB credentials of either kind are present.
    pub fn has_tmdb_credentials(&self) -> bool {
        self.tmdb_token.is_some() || self.tmdb_api_key.is_some()
    }
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| Error::config(format!("{} must be a number, got {:?}", name, v)))
        })
        .transpose()
}
