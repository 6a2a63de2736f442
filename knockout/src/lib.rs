//! # Knockout
//!
//! Single-elimination tournaments with an atomic bracket run.
//!
//! Accounts join a draft tournament. Running it plays the whole bracket,
//! ranks everyone by how far they got, and adds tiered points to each
//! account. This all happens in one unit of work, so a failed run leaves no
//! trace.
//!
//! ## Core Modules
//!
//! - [`tournament`]: bracket engine, placement, scoring and the run orchestration
//! - [`account`]: accounts and the global leaderboard
//! - [`db`]: store abstraction with PostgreSQL and in-memory backends
//!
//! ## Example
//!
//! ```
//! use knockout::points_for_place;
//!
//! assert_eq!(points_for_place(1), 100);
//! assert_eq!(points_for_place(4), 40);
//! ```

/// Accounts and cumulative score.
pub mod account;
pub use account::{Account, AccountError, AccountId, AccountManager};

/// Persistence: stores, units of work and configuration.
pub mod db;
pub use db::{Database, DatabaseConfig, MemoryStore, PgStore, Store, StoreError};

/// Tournament lifecycle and the bracket engine.
pub mod tournament;
pub use tournament::{
    RunSummary, Tournament, TournamentError, TournamentManager, TournamentStatus,
    points_for_place,
};
