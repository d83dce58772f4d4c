//! Network utilities for talking to upstream media APIs.
//!
//! - **HTTP Client**: a global, configured reqwest client with connection pooling
//! - **Rate Limiting**: per-source delays between requests
//! - **Retry Logic**: retries with exponential backoff on throttling
//! - **JSON helpers**: envelope decoding and error-body extraction ([`json`])
//!
//! # Examples
//!
//! ```rust,no_run
//! use eiga::net::HttpClient;
//!
//! # async fn example() -> eiga::Result<()> {
//! let client = HttpClient::new("tmdb")
//!     .with_rate_limit(250)
//!     .with_max_retries(3)
//!     .with_header("Authorization", "Bearer <token>");
//!
//! let json: serde_json::Value = client
//!     .get_json_with("https://api.themoviedb.org/3/genre/movie/list", [("language", "en-US")])
//!     .await?;
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use reqwest::{Client, header::HeaderMap};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

pub mod json;

/// Global HTTP client instance.
///
/// Configured with a 30-second timeout, pooled connections and gzip/brotli
/// support. Timeouts are owned here, not by the catalogue controllers.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("Eiga/0.1.0")
        .pool_max_idle_per_host(10)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to build HTTP client")
});

/// Per-source rate limiter.
///
/// Tracks the last request time for each source and enforces a minimum delay
/// between requests.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<HashMap<String, Instant>>,
    default_delay: Duration,
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: self.default_delay,
        }
    }
}

impl RateLimiter {
    /// Creates a new rate limiter with the specified delay in milliseconds.
    pub fn new(delay_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(HashMap::new()),
            default_delay: Duration::from_millis(delay_ms),
        }
    }

    /// Waits if necessary before allowing a request for `source_id`.
    pub async fn wait(&self, source_id: &str) {
        let now = Instant::now();
        let wait_duration = {
            let last_map = self.last_request.lock();
            last_map
                .get(source_id)
                .map(|&last| now.duration_since(last))
                .filter(|&elapsed| elapsed < self.default_delay)
                .map(|elapsed| self.default_delay - elapsed)
        };

        if let Some(duration) = wait_duration {
            tokio::time::sleep(duration).await;
        }

        self.last_request
            .lock()
            .insert(source_id.to_string(), Instant::now());
    }
}

/// HTTP client wrapper with built-in rate limiting and retry logic.
///
/// Each client belongs to one source; rate limiting and error attribution use
/// that source's id.
#[derive(Clone, Debug)]
pub struct HttpClient {
    source_id: String,
    rate_limiter: RateLimiter,
    max_retries: u32,
    headers: HeaderMap,
}

impl HttpClient {
    /// Creates a client with a 200ms rate limit and 3 retries.
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            rate_limiter: RateLimiter::new(200),
            max_retries: 3,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the minimum delay between requests, in milliseconds.
    pub fn with_rate_limit(mut self, delay_ms: u64) -> Self {
        self.rate_limiter = RateLimiter::new(delay_ms);
        self
    }

    /// Sets the maximum number of retries for failed requests.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Adds a header to all requests. Invalid names or values are skipped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.parse::<reqwest::header::HeaderName>(),
            value.parse::<reqwest::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Performs a GET request with rate limiting and retries.
    ///
    /// 429 responses are retried with exponential backoff and finally reported
    /// as [`Error::RateLimit`](crate::Error::RateLimit). Other HTTP failures
    /// become [`Error::Source`](crate::Error::Source) carrying the upstream
    /// `status_message` when the body has one.
    pub async fn get(&self, url: &str) -> crate::Result<Bytes> {
        let mut attempts = 0;

        loop {
            self.rate_limiter.wait(&self.source_id).await;
            debug!(source = %self.source_id, attempt = attempts + 1, "GET {}", redact(url));

            match CLIENT.get(url).headers(self.headers.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response.bytes().await?);
                    }

                    if status == 429 {
                        if attempts < self.max_retries {
                            attempts += 1;
                            let delay = Duration::from_secs(2_u64.pow(attempts));
                            warn!(source = %self.source_id, ?delay, "rate limited, backing off");
                            tokio::time::sleep(delay).await;
                            continue;
                        }

                        let retry_after = response
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok());

                        return Err(crate::Error::rate_limit(retry_after));
                    }

                    let body = response.bytes().await.unwrap_or_default();
                    let message = json::error_message(&body)
                        .unwrap_or_else(|| format!("HTTP {}", status));
                    return Err(crate::Error::source(&self.source_id, message));
                }
                Err(e) => {
                    if attempts < self.max_retries && (e.is_connect() || e.is_timeout()) {
                        attempts += 1;
                        warn!(source = %self.source_id, error = %e, "request failed, retrying");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Performs a GET request and deserializes the response as JSON.
    pub async fn get_json<T>(&self, url: &str) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let bytes = self.get(url).await?;
        serde_json::from_slice(&bytes).map_err(Into::into)
    }

    /// Like [`get_json`](HttpClient::get_json), appending `params` to the URL's query.
    pub async fn get_json_with<T, I, K, V>(&self, url: &str, params: I) -> crate::Result<T>
    where
        T: serde::de::DeserializeOwned,
        I: IntoIterator,
        I::Item: std::borrow::Borrow<(K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let url = Url::parse_with_params(url, params)
            .map_err(|e| crate::Error::parse(format!("Invalid URL {}: {}", url, e)))?;
        self.get_json(url.as_str()).await
    }
}

/// Masks credential query parameters before a URL is logged.
fn redact(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == "api_key" || k == "apikey" {
                        "***".to_string()
                    } else {
                        v.into_owned()
                    };
                    (k.into_owned(), v)
                })
                .collect();
            if !pairs.is_empty() {
                parsed.query_pairs_mut().clear().extend_pairs(pairs);
            }
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn redact_masks_api_keys() {
        let url = redact("https://www.omdbapi.com/?apikey=secret&s=alien");
        assert!(!url.contains("secret"));
        assert!(url.contains("s=alien"));
    }
}
