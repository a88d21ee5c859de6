//! Error classification.
//!
//! Low-level failures are caught at the coordinator boundary and translated
//! into a small user-facing taxonomy; they never reach a front end in raw
//! form. The mapping is a pure function over a closed input set so it can be
//! tested exhaustively. Classification never retries anything; retry is a
//! user-initiated action.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// The closed set of raw failure shapes produced by the HTTP and storage
/// layers.
///
/// Everything the coordinators can fail with reduces to one of these before
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// A request did not complete in time.
    Timeout,
    /// The network or host was unreachable.
    Connect(String),
    /// A service answered with a non-success HTTP status.
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },
    /// A response body could not be decoded.
    Decode(String),
    /// Local storage failed.
    Storage(String),
    /// Anything else.
    Other(String),
}

impl From<nimbus_api::Error> for RawFailure {
    fn from(err: nimbus_api::Error) -> Self {
        match err {
            nimbus_api::Error::Timeout { .. } => RawFailure::Timeout,
            nimbus_api::Error::Connect { message, .. } => RawFailure::Connect(message),
            nimbus_api::Error::Status { status, message } => {
                RawFailure::HttpStatus { status, message }
            }
            nimbus_api::Error::Decode(message) => RawFailure::Decode(message),
            // Handle future variants (non_exhaustive)
            other => RawFailure::Other(other.to_string()),
        }
    }
}

impl From<nimbus_store::Error> for RawFailure {
    fn from(err: nimbus_store::Error) -> Self {
        RawFailure::Storage(err.to_string())
    }
}

/// User-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No connectivity, host unreachable, or timeout.
    Network,
    /// The weather or geocoding service answered with an error status.
    Api,
    /// Position unavailable or no active location configured.
    Location,
    /// Local storage failure.
    Database,
    /// Fallback for anything unexpected.
    Unknown,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Network => "Network error",
            ErrorKind::Api => "API error",
            ErrorKind::Location => "Location error",
            ErrorKind::Database => "Database error",
            ErrorKind::Unknown => "Unknown error",
        };
        f.write_str(label)
    }
}

/// A classified, user-facing error.
///
/// Carries a short headline and a longer troubleshooting hint, ready for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The error category.
    pub kind: ErrorKind,
    /// Short headline, e.g. "No internet connection".
    pub message: String,
    /// Longer troubleshooting hint.
    pub hint: String,
}

impl AppError {
    /// Create an error from parts.
    pub fn new(kind: ErrorKind, message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// No location is configured as the forecast target.
    pub fn no_location_selected() -> Self {
        Self::new(
            ErrorKind::Location,
            "No location selected",
            "Please select a location in Settings to view weather data",
        )
    }

    /// The device position could not be resolved.
    pub fn position_unavailable() -> Self {
        Self::new(
            ErrorKind::Location,
            "Could not retrieve location",
            "Please ensure location services are enabled and try again",
        )
    }
}

/// Map a raw failure to its user-facing error.
pub fn classify(failure: RawFailure) -> AppError {
    match failure {
        RawFailure::Connect(_) => AppError::new(
            ErrorKind::Network,
            "No internet connection",
            "Please check your internet connection and try again",
        ),
        RawFailure::Timeout => AppError::new(
            ErrorKind::Network,
            "Connection timeout",
            "The request took too long. Please try again",
        ),
        RawFailure::HttpStatus { status, message } => classify_status(status, message),
        RawFailure::Storage(_) => AppError::new(
            ErrorKind::Database,
            "Database error",
            "An error occurred while saving data. Please try again.",
        ),
        RawFailure::Decode(detail) | RawFailure::Other(detail) => AppError::new(
            ErrorKind::Unknown,
            "An unexpected error occurred",
            detail,
        ),
    }
}

fn classify_status(status: u16, message: String) -> AppError {
    match status {
        401 => AppError::new(
            ErrorKind::Api,
            "Invalid API key",
            "Please check your API configuration",
        ),
        429 => AppError::new(
            ErrorKind::Api,
            "API rate limit exceeded",
            "Too many requests. Please try again later",
        ),
        404 => AppError::new(
            ErrorKind::Api,
            "Location not found",
            "The location you searched for could not be found. Try a different search term.",
        ),
        500 | 502 | 503 => AppError::new(
            ErrorKind::Api,
            "Service unavailable",
            "The service is temporarily down. Please try again later",
        ),
        _ => AppError::new(ErrorKind::Api, format!("API error ({})", status), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_network_error() {
        let err = classify(RawFailure::Connect("dns failure".to_string()));
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.message, "No internet connection");
    }

    #[test]
    fn test_timeout_is_network_error() {
        let err = classify(RawFailure::Timeout);
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(err.message, "Connection timeout");
    }

    #[test]
    fn test_rate_limit_is_api_error_with_specific_message() {
        let err = classify(RawFailure::HttpStatus {
            status: 429,
            message: "Too Many Requests".to_string(),
        });
        assert_eq!(err.kind, ErrorKind::Api);
        assert_eq!(err.message, "API rate limit exceeded");
        // Specifically not the unknown fallback
        assert_ne!(err.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_status_mapping_table() {
        let cases = [
            (401, "Invalid API key"),
            (404, "Location not found"),
            (500, "Service unavailable"),
            (502, "Service unavailable"),
            (503, "Service unavailable"),
        ];
        for (status, expected) in cases {
            let err = classify(RawFailure::HttpStatus {
                status,
                message: String::new(),
            });
            assert_eq!(err.kind, ErrorKind::Api);
            assert_eq!(err.message, expected, "status {}", status);
        }
    }

    #[test]
    fn test_unmapped_status_carries_code_and_body() {
        let err = classify(RawFailure::HttpStatus {
            status: 418,
            message: "short and stout".to_string(),
        });
        assert_eq!(err.kind, ErrorKind::Api);
        assert_eq!(err.message, "API error (418)");
        assert_eq!(err.hint, "short and stout");
    }

    #[test]
    fn test_storage_is_database_error() {
        let err = classify(RawFailure::Storage("disk full".to_string()));
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "Database error");
    }

    #[test]
    fn test_decode_and_other_fall_back_to_unknown() {
        for failure in [
            RawFailure::Decode("bad json".to_string()),
            RawFailure::Other("surprise".to_string()),
        ] {
            let err = classify(failure);
            assert_eq!(err.kind, ErrorKind::Unknown);
        }
    }

    #[test]
    fn test_api_error_conversion() {
        let raw: RawFailure = nimbus_api::Error::timeout("https://example.com").into();
        assert_eq!(raw, RawFailure::Timeout);

        let raw: RawFailure = nimbus_api::Error::status(503, "down").into();
        assert!(matches!(raw, RawFailure::HttpStatus { status: 503, .. }));
    }

    #[test]
    fn test_location_constructors() {
        let err = AppError::no_location_selected();
        assert_eq!(err.kind, ErrorKind::Location);
        assert_eq!(err.message, "No location selected");

        let err = AppError::position_unavailable();
        assert_eq!(err.kind, ErrorKind::Location);
    }
}
