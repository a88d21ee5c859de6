//! Error types for nimbus-store.

use std::path::PathBuf;

/// Result type for nimbus-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in nimbus-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Location not found in database.
    #[error("Location not found: {0}")]
    LocationNotFound(i64),

    /// Favorite cap would be exceeded by this insert or update.
    #[error("Maximum favorite locations reached ({max})")]
    FavoriteLimitReached {
        /// The configured maximum.
        max: usize,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
