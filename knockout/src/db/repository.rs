//! Repository trait definitions for testability and dependency injection.
//!
//! Every read and write goes through a [`UnitOfWork`] obtained from a
//! [`Store`]. A unit of work is a scoped transaction: nothing it writes is
//! visible to anyone else until [`UnitOfWork::commit`], and dropping it
//! without committing discards every change.

use async_trait::async_trait;

use super::errors::StoreResult;
use crate::account::{Account, AccountId};
use crate::tournament::models::{
    Match, Participant, ParticipantId, Tournament, TournamentId, TournamentStatus,
};

/// Row lock to take when reading a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    /// Plain read
    None,
    /// Shared lock; waits for an exclusive holder to finish
    Share,
    /// Exclusive lock; fails with `StoreError::LockUnavailable` instead of waiting
    ExclusiveNoWait,
}

/// Tournament records
#[async_trait]
pub trait TournamentRepository: Send {
    /// Create a tournament in `Draft`
    async fn insert_tournament(&mut self, name: &str) -> StoreResult<Tournament>;

    /// Find tournament by ID
    async fn find_tournament(
        &mut self,
        id: TournamentId,
        lock: RowLock,
    ) -> StoreResult<Option<Tournament>>;

    /// Overwrite a tournament's status
    async fn update_status(&mut self, id: TournamentId, status: TournamentStatus)
    -> StoreResult<()>;

    /// All tournaments, newest first
    async fn list_tournaments(&mut self) -> StoreResult<Vec<Tournament>>;
}

/// Tournament participants
#[async_trait]
pub trait ParticipantRepository: Send {
    /// Register an account; `(tournament, account)` is unique
    async fn insert_participant(
        &mut self,
        tournament_id: TournamentId,
        account_id: AccountId,
    ) -> StoreResult<Participant>;

    /// Participants of a tournament in registration order
    async fn list_participants(&mut self, tournament_id: TournamentId)
    -> StoreResult<Vec<Participant>>;

    /// Record a participant's final place
    async fn set_place(&mut self, participant_id: ParticipantId, place: u32) -> StoreResult<()>;
}

/// Match log
#[async_trait]
pub trait MatchRepository: Send {
    async fn insert_matches(&mut self, matches: &[Match]) -> StoreResult<()>;

    /// Matches of a tournament ordered by round
    async fn list_matches(&mut self, tournament_id: TournamentId) -> StoreResult<Vec<Match>>;
}

/// Accounts and their cumulative score
#[async_trait]
pub trait AccountRepository: Send {
    /// Create an account with zero points; display names are unique
    async fn insert_account(&mut self, display_name: &str) -> StoreResult<Account>;

    async fn find_account(&mut self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Atomically add to an account's score
    ///
    /// Returns the new total, or `None` if the account does not exist.
    async fn add_points(&mut self, id: AccountId, points: i64) -> StoreResult<Option<i64>>;

    /// Accounts by descending score
    async fn top_accounts(&mut self, limit: u32) -> StoreResult<Vec<Account>>;
}

/// A scoped transaction over every repository
#[async_trait]
pub trait UnitOfWork:
    TournamentRepository + ParticipantRepository + MatchRepository + AccountRepository
{
    /// Make every change in this unit visible at once
    async fn commit(self: Box<Self>) -> StoreResult<()>;
}

/// Source of units of work
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;
}
