//! Larder error types

use thiserror::Error;

/// Larder error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// One or more user-fixable validation failures
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Malformed request that is not a field-level validation failure
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource id absent
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation
    #[error("{0}")]
    Conflict(String),

    /// Category still owns items and cannot be deleted
    #[error("Category {category_id} still has {item_count} item(s)")]
    CategoryInUse { category_id: i64, item_count: i64 },

    /// Force delete found no category to move items to
    #[error("No other categories exist to move items to")]
    NoReassignmentTarget,

    /// Generative model returned an error status or an unusable reply
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Assistant is not configured
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Larder operations
pub type Result<T> = std::result::Result<T, Error>;
