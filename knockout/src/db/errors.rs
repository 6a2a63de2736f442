//! Store error types.

use thiserror::Error;

use crate::tournament::models::UnknownStatus;

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `lock_not_available` (raised by `NOWAIT`)
const LOCK_NOT_AVAILABLE: &str = "55P03";

/// Errors raised by a store or one of its units of work
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A row lock requested without waiting is held elsewhere
    #[error("Row lock unavailable")]
    LockUnavailable,

    /// Stored data could not be mapped back into a model
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return StoreError::UniqueViolation(
                        db_err.constraint().unwrap_or("unique").to_string(),
                    );
                }
                Some(LOCK_NOT_AVAILABLE) => return StoreError::LockUnavailable,
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl From<UnknownStatus> for StoreError {
    fn from(err: UnknownStatus) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
