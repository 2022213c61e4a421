//! Error types for housebot.

use thiserror::Error;

/// Common error type for housebot.
#[derive(Error, Debug)]
pub enum HousebotError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Chat transport error (HTTP failure, API rejection, bad payload).
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<sqlx::Error> for HousebotError {
    fn from(e: sqlx::Error) -> Self {
        HousebotError::Database(e.to_string())
    }
}

/// Result type alias for housebot operations.
pub type Result<T> = std::result::Result<T, HousebotError>;
