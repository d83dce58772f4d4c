//! JSON helpers for upstream API payloads.
//!
//! Two concerns live here: pulling a human-readable message out of an error
//! body, and decoding responses wrapped in an OMDb-style
//! `"Response": "True" | "False"` envelope.
//!
//! # Examples
//!
//! ```rust
//! use eiga::net::json;
//! use serde_json::json;
//!
//! let body = json!({ "Response": "False", "Error": "Movie not found!" });
//! let result: eiga::Result<serde_json::Value> = json::decode_envelope("omdb", body);
//! assert_eq!(result.unwrap_err().user_message(), "Movie not found!");
//! ```

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, FALLBACK_ERROR_MESSAGE, Result};

/// Keys under which known APIs put their error text.
const MESSAGE_KEYS: [&str; 3] = ["status_message", "Error", "message"];

/// Extracts a value from nested JSON using dot notation.
///
/// ```rust
/// use eiga::net::json;
/// use serde_json::json;
///
/// let data = json!({ "credits": { "cast": [] } });
/// assert!(json::extract_path(&data, "credits.cast").is_some());
/// assert_eq!(json::extract_path(&data, "credits.crew"), None);
/// ```
pub fn extract_path<'a>(json: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = json;

    for key in path.split('.') {
        current = current.get(key)?;
    }

    Some(current)
}

/// Extracts and deserializes a value from a nested JSON path.
///
/// # Errors
///
/// * [`Error::Parse`] - If the path doesn't exist
/// * [`Error::Json`] - If deserialization fails
pub fn extract_as<T>(json: &Value, path: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let value = extract_path(json, path)
        .ok_or_else(|| Error::parse(format!("Path not found: {}", path)))?;
    T::deserialize(value).map_err(Into::into)
}

/// Reads an error message from a response body, if it has one.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    MESSAGE_KEYS
        .iter()
        .filter_map(|key| extract_path(&value, key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

/// Decodes a payload wrapped in a `Response: "True"/"False"` envelope.
///
/// A `"False"` response becomes [`Error::Source`] carrying the payload's
/// `Error` text verbatim. Payloads without a `Response` field are decoded
/// as-is.
pub fn decode_envelope<T>(source_id: &str, body: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    let succeeded = extract_path(&body, "Response")
        .and_then(Value::as_str)
        .map(|flag| !flag.eq_ignore_ascii_case("false"))
        .unwrap_or(true);

    if !succeeded {
        let message = extract_as::<String>(&body, "Error")
            .unwrap_or_else(|_| FALLBACK_ERROR_MESSAGE.to_string());
        return Err(Error::source(source_id, message));
    }

    serde_json::from_value(body).map_err(Into::into)
}
