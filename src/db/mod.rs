//! Storage layer
//!
//! `Store` is the repository handed to every handler through the application
//! state: all reads and writes go through it, and constraint violations come
//! back as distinguishable `StoreError` values rather than raw driver errors.
//! Handlers pre-check uniqueness optimistically, then treat a late
//! `StoreError::Conflict` from the insert/update itself as the authoritative
//! answer (two requests can race between check and commit).

use sqlx::error::ErrorKind;
use sqlx::SqlitePool;
use thiserror::Error;

pub mod init;
pub mod models;

mod albums;
mod reviews;
mod tags;
mod users;

pub use init::init_database;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Storage-layer error taxonomy
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint was violated
    #[error("unique constraint violated")]
    Conflict,

    /// A foreign key referenced a missing row
    #[error("foreign key constraint violated")]
    ForeignKey,

    /// Input rejected before reaching the database
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.kind() {
                ErrorKind::UniqueViolation => return StoreError::Conflict,
                ErrorKind::ForeignKeyViolation => return StoreError::ForeignKey,
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// Repository over the relational store
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool (startup checks and tests)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
