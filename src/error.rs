//! Crate-level error types for spinrate

use thiserror::Error;

/// Result type for startup and infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the per-request pipeline (startup, config, storage
/// infrastructure). Request-level errors live in `api::error::ApiError`.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
