//! Error types for data parsing in nimbus-types.

use thiserror::Error;

/// Errors that can occur when parsing stored Nimbus values.
///
/// This error type is platform-agnostic and does not include HTTP or
/// database errors (those belong in nimbus-api and nimbus-store).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A forecast kind string did not match `current`, `hourly`, or `daily`.
    #[error("Unknown forecast kind: {0}")]
    UnknownForecastKind(String),

    /// A unit string did not match any known unit.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

/// Result type alias using nimbus-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
