//! Storage errors

use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLx error
    #[error("storage error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// `(role, external_key)` already taken among active-or-deleted rows
    #[error("duplicate key")]
    DuplicateKey,

    /// Record not found
    #[error("record not found")]
    NotFound,
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
