//! Error types for nimbus-api.
//!
//! Every client in this crate reduces its failures to the closed set below,
//! so the application layer can map them to user-facing errors without
//! inspecting transport internals.

use thiserror::Error;

/// Errors that can occur when talking to the weather or geocoding services.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The host could not be reached at all.
    #[error("Could not connect to {url}: {message}")]
    Connect {
        /// The URL that was unreachable.
        url: String,
        /// Transport-level detail.
        message: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Reduce a `reqwest` failure for `url` to the closed set.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
            }
        } else if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }

    /// Create a timeout error for a URL.
    pub fn timeout(url: impl Into<String>) -> Self {
        Error::Timeout { url: url.into() }
    }

    /// Create an HTTP status error.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Error::Status {
            status,
            message: message.into(),
        }
    }
}

/// Result type alias using nimbus-api's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Validate and normalize a base URL (strip trailing slash, require scheme).
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String> {
    let base_url = base_url.trim_end_matches('/').to_string();

    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(Error::InvalidConfig(format!(
            "URL must start with http:// or https://, got: {}",
            base_url
        )));
    }

    Ok(base_url)
}
