//! Error types for scarchive
//!
//! One crate-wide [`Error`] enum covers the failure classes the pipeline
//! produces: transient network trouble, unexpected HTTP statuses, database
//! failures, duplicate-key violations, and local I/O. Workers contain
//! failures to their own unit of work; nothing here carries run-level state.

use thiserror::Error;

/// Result type alias for scarchive operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scarchive
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert of an id already present in the archive
    ///
    /// Callers are expected to check existence before inserting; hitting this
    /// in normal operation indicates a lost check-then-insert race, which
    /// workers log and ignore.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// Network error from the HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status from the remote API
    #[error("unexpected status {status} from {url}")]
    Status {
        /// Request URL that produced the status
        url: String,
        /// The HTTP status code returned
        status: reqwest::StatusCode,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// ID3 tagging error
    #[error("tagging error: {0}")]
    Tagging(#[from] id3::Error),
}
