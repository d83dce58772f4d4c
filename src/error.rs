//! Error types and result handling for Eiga operations.
//!
//! Every fallible operation in the crate returns a [`Result<T>`], a type alias
//! for `std::result::Result<T, Error>`.
//!
//! # Error Categories
//!
//! - **Network Errors**: connection issues, timeouts, HTTP transport failures
//! - **Parse Errors**: payloads that do not have the expected shape
//! - **Source Errors**: the upstream API answered but reported a failure
//!   (for example "Movie not found!" or "Too many results.")
//! - **Not Found**: missing items or unknown routes
//! - **Rate Limiting**: the upstream API throttled us
//! - **Configuration**: missing or malformed credentials and settings
//!
//! The catalogue controllers never propagate these errors to the presentation
//! layer. They convert them into a display string with
//! [`Error::user_message`], which never yields a blank string.
//!
//! # Examples
//!
//! ```rust
//! use eiga::error::{Error, FALLBACK_ERROR_MESSAGE};
//!
//! let error = Error::source("omdb", "Movie not found!");
//! assert_eq!(error.user_message(), "Movie not found!");
//!
//! let error = Error::Other(String::new());
//! assert_eq!(error.user_message(), FALLBACK_ERROR_MESSAGE);
//! ```

use thiserror::Error;

/// Message shown when a failure carries no usable text.
pub const FALLBACK_ERROR_MESSAGE: &str = "Something went wrong";

/// Type alias for Results with Eiga errors.
///
/// ```rust
/// use eiga::{Error, Result};
///
/// fn example_with_error() -> Result<()> {
///     Err(Error::parse("Something went wrong"))
/// }
/// # assert!(example_with_error().is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all Eiga operations.
///
/// # Variants
///
/// * [`Network`](Error::Network) - HTTP client and connection errors
/// * [`Parse`](Error::Parse) - Data parsing and format errors
/// * [`Source`](Error::Source) - Business errors reported by an upstream API
/// * [`NotFound`](Error::NotFound) - Missing resources
/// * [`RateLimit`](Error::RateLimit) - Rate limiting responses
/// * [`Json`](Error::Json) - JSON deserialization errors
/// * [`Config`](Error::Config) - Invalid or incomplete configuration
/// * [`Other`](Error::Other) - Anything else
#[derive(Error, Debug)]
pub enum Error {
    /// Network-related errors from the underlying HTTP client (reqwest):
    /// connection timeouts, DNS failures, TLS errors.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The received data could not be interpreted, such as a missing
    /// required field or an unexpected envelope.
    ///
    /// ```rust
    /// use eiga::Error;
    ///
    /// let error = Error::parse("Missing title field in response");
    /// ```
    #[error("Parse error: {0}")]
    Parse(String),

    /// The upstream API answered but signalled a semantic failure.
    ///
    /// # Fields
    ///
    /// * `src` - The identifier of the source that reported the error
    /// * `message` - The message as the source phrased it
    ///
    /// ```rust
    /// use eiga::Error;
    ///
    /// let error = Error::source("omdb", "Too many results.");
    /// let error = Error::source("tmdb", "HTTP 401 Unauthorized");
    /// ```
    #[error("Source error [{src}]: {message}")]
    Source { src: String, message: String },

    /// A requested resource (item, route) could not be found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The source throttled us, optionally telling us when to retry
    /// (from the `Retry-After` header).
    ///
    /// ```rust
    /// use eiga::Error;
    ///
    /// let error = Error::rate_limit(Some(10));
    /// let error = Error::rate_limit(None);
    /// ```
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimit { retry_after: Option<u64> },

    /// JSON deserialization errors from serde_json.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing credentials or invalid settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error messages.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates a source-specific error with source ID and message.
    pub fn source(src: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Source {
            src: src.into(),
            message: msg.into(),
        }
    }

    /// Creates a not found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Creates a rate limit error with optional retry-after time.
    pub fn rate_limit(retry_after: Option<u64>) -> Self {
        Error::RateLimit { retry_after }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Returns the text to show a user for this error.
    ///
    /// Business errors reported by a source are returned verbatim, without the
    /// `Source error [..]` prefix. Variants that wrap another error use that
    /// error's own message. When the resulting text is blank,
    /// [`FALLBACK_ERROR_MESSAGE`] is returned instead.
    ///
    /// ```rust
    /// use eiga::Error;
    ///
    /// assert_eq!(Error::source("omdb", "Movie not found!").user_message(), "Movie not found!");
    /// assert_eq!(Error::Other("   ".into()).user_message(), "Something went wrong");
    /// ```
    pub fn user_message(&self) -> String {
        let message = match self {
            Error::Source { message, .. } => message.clone(),
            Error::Parse(msg) | Error::NotFound(msg) | Error::Config(msg) | Error::Other(msg) => {
                msg.clone()
            }
            Error::Network(e) => e.to_string(),
            Error::Json(e) => e.to_string(),
            Error::RateLimit { .. } => self.to_string(),
        };

        if message.trim().is_empty() {
            FALLBACK_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}
