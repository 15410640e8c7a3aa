//! Common error types for the lab tracker

use thiserror::Error;

/// Common result type for lab tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the stores, the lifecycle controller and the API layer
#[derive(Error, Debug)]
pub enum Error {
    /// Unexpected store failure (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Operation targets an identity no store holds a matching row for
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid input, rejected before any store access
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Referenced sample vanished between check and write
    #[error("Referential integrity violation: {0}")]
    Referential(String),
}

impl Error {
    /// Classify a raw sqlx error, splitting foreign key violations out of
    /// generic persistence failures.
    pub fn from_write(err: sqlx::Error, context: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                Error::Referential(context.to_string())
            }
            _ => Error::Database(err),
        }
    }
}
