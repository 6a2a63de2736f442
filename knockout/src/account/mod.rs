//! Account module: display names and cumulative tournament score.
//!
//! Accounts are created here and only ever gain points through a tournament
//! run (see [`crate::tournament::TournamentManager::run_tournament`]).
//!
//! ## Example
//!
//! ```no_run
//! use knockout::account::{AccountManager, DEFAULT_LEADERBOARD_LIMIT};
//! use knockout::db::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let accounts = AccountManager::new(Arc::new(MemoryStore::new()));
//!     let alice = accounts.create_account("alice").await?;
//!     println!("Created account {}", alice.id);
//!
//!     for entry in accounts.leaderboard(DEFAULT_LEADERBOARD_LIMIT).await? {
//!         println!("{}: {}", entry.display_name, entry.total_points);
//!     }
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{AccountError, AccountResult};
pub use manager::{AccountManager, DEFAULT_LEADERBOARD_LIMIT};
pub use models::{Account, AccountId};
