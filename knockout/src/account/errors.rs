//! Account error types.

use thiserror::Error;

use super::models::AccountId;
use crate::db::StoreError;

/// Account errors
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account not found
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Display name already used by another account
    #[error("Display name already taken: {0}")]
    NameTaken(String),

    /// Display name empty or whitespace
    #[error("Display name must not be blank")]
    InvalidName,

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Get a client-safe error message
    pub fn client_message(&self) -> String {
        match self {
            AccountError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for account operations
pub type AccountResult<T> = Result<T, AccountError>;
