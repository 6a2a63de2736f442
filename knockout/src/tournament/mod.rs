//! Single-elimination tournaments.
//!
//! A run takes every participant of a `Draft` tournament through the bracket
//! in one unit of work:
//!
//! - [`bracket`]: pairs the pool round by round until one champion remains
//! - [`elimination`]: derives how far each participant got from the match log
//! - [`placement`]: orders participants by that depth into places `1..=N`
//! - [`scoring`]: converts places into points for the owning accounts
//!
//! ## Example
//!
//! ```no_run
//! use knockout::account::AccountManager;
//! use knockout::db::{Database, DatabaseConfig};
//! use knockout::tournament::TournamentManager;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&DatabaseConfig::from_env()?).await?;
//!     let store = Arc::new(db.store());
//!     let accounts = AccountManager::new(store.clone());
//!     let tournaments = TournamentManager::new(store);
//!
//!     let cup = tournaments.create_tournament("Friday Cup").await?;
//!     for name in ["alice", "bob", "carol"] {
//!         let account = accounts.create_account(name).await?;
//!         tournaments.join_tournament(cup.id, account.id).await?;
//!     }
//!
//!     let summary = tournaments.run_tournament(cup.id).await?;
//!     println!("Champion: {}", summary.champion_account_id);
//!     Ok(())
//! }
//! ```

pub mod bracket;
pub mod elimination;
pub mod errors;
pub mod manager;
pub mod models;
pub mod placement;
pub mod resolver;
pub mod scoring;

pub use bracket::{BracketEngine, BracketOutcome};
pub use elimination::{Elimination, EliminationMap};
pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    MIN_PARTICIPANTS, Match, MatchId, Participant, ParticipantId, PlaceEntry, RunSummary,
    Tournament, TournamentId, TournamentStatus,
};
pub use resolver::{
    CoinFlip, DrawOrder, FavorSide, OutcomeResolver, RegistrationOrder, ResolverError,
    ShuffledDraw, Side,
};
pub use scoring::{ScoreAward, points_for_place};
