//! Error types for Filekeep.

use thiserror::Error;

/// Common error type for Filekeep.
#[derive(Error, Debug)]
pub enum FilekeepError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Username is already registered.
    #[error("username already exists: {0}")]
    DuplicateUser(String),

    /// Unknown username or wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request carries no valid session.
    #[error("no valid session")]
    NoSession,

    /// The requesting user may not act on this resource.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Filename rejected before touching the namespace.
    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Target name is already taken.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// A storage move or write failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FilekeepError {
    fn from(e: sqlx::Error) -> Self {
        FilekeepError::Database(e.to_string())
    }
}

/// Result type alias for Filekeep operations.
pub type Result<T> = std::result::Result<T, FilekeepError>;
