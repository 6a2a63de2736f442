//! Account manager: registration, lookup and the global leaderboard.

use log::info;
use std::sync::Arc;

use super::errors::{AccountError, AccountResult};
use super::models::{Account, AccountId};
use crate::db::{Store, StoreError};

/// Leaderboard size when the caller does not ask for one
pub const DEFAULT_LEADERBOARD_LIMIT: u32 = 50;

/// Account manager
#[derive(Clone)]
pub struct AccountManager {
    store: Arc<dyn Store>,
}

impl AccountManager {
    /// Create a new account manager
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Register a new account with zero points
    ///
    /// # Errors
    ///
    /// * `AccountError::InvalidName` - blank display name
    /// * `AccountError::NameTaken` - display name already registered
    pub async fn create_account(&self, display_name: &str) -> AccountResult<Account> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AccountError::InvalidName);
        }

        let mut uow = self.store.begin().await?;
        let account = uow
            .insert_account(display_name)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AccountError::NameTaken(display_name.to_string()),
                other => other.into(),
            })?;
        uow.commit().await?;

        info!("Created account {} ({})", account.id, account.display_name);
        Ok(account)
    }

    /// Get account by ID
    pub async fn get_account(&self, id: AccountId) -> AccountResult<Account> {
        let mut uow = self.store.begin().await?;
        uow.find_account(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// Accounts ordered by total points, highest first
    pub async fn leaderboard(&self, limit: u32) -> AccountResult<Vec<Account>> {
        let mut uow = self.store.begin().await?;
        Ok(uow.top_accounts(limit).await?)
    }
}
