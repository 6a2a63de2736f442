//! Tournament manager: registration plus the atomic bracket run.

use log::{info, warn};
use std::sync::Arc;

use super::bracket::BracketEngine;
use super::elimination;
use super::errors::{TournamentError, TournamentResult};
use super::models::{
    MIN_PARTICIPANTS, Match, Participant, RunSummary, Tournament, TournamentId, TournamentStatus,
};
use super::placement;
use super::resolver::{CoinFlip, DrawOrder, OutcomeResolver, ShuffledDraw};
use super::scoring;
use crate::account::AccountId;
use crate::db::{RowLock, Store, StoreError, UnitOfWork};

/// Tournament manager
#[derive(Clone)]
pub struct TournamentManager {
    store: Arc<dyn Store>,
    resolver: Arc<dyn OutcomeResolver>,
    draw: Arc<dyn DrawOrder>,
}

impl TournamentManager {
    /// Create a tournament manager that flips coins and reshuffles every round
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            resolver: Arc::new(CoinFlip),
            draw: Arc::new(ShuffledDraw),
        }
    }

    /// Replace the match outcome resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn OutcomeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the per-round draw order
    pub fn with_draw(mut self, draw: Arc<dyn DrawOrder>) -> Self {
        self.draw = draw;
        self
    }

    /// Create a new tournament in `Draft`
    pub async fn create_tournament(&self, name: &str) -> TournamentResult<Tournament> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidName);
        }

        let mut uow = self.store.begin().await?;
        let tournament = uow.insert_tournament(name).await?;
        uow.commit().await?;

        info!("Created tournament {} ({})", tournament.id, tournament.name);
        Ok(tournament)
    }

    /// Get tournament by ID
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<Tournament> {
        let mut uow = self.store.begin().await?;
        uow.find_tournament(tournament_id, RowLock::None)
            .await?
            .ok_or(TournamentError::NotFound(tournament_id))
    }

    /// List all tournaments, newest first
    pub async fn list_tournaments(&self) -> TournamentResult<Vec<Tournament>> {
        let mut uow = self.store.begin().await?;
        Ok(uow.list_tournaments().await?)
    }

    /// Participants in registration order
    pub async fn list_participants(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<Vec<Participant>> {
        let mut uow = self.store.begin().await?;
        require_tournament(uow.as_mut(), tournament_id, RowLock::None).await?;
        Ok(uow.list_participants(tournament_id).await?)
    }

    /// Match log ordered by round
    pub async fn list_matches(&self, tournament_id: TournamentId) -> TournamentResult<Vec<Match>> {
        let mut uow = self.store.begin().await?;
        require_tournament(uow.as_mut(), tournament_id, RowLock::None).await?;
        Ok(uow.list_matches(tournament_id).await?)
    }

    /// Register an account in a `Draft` tournament
    ///
    /// The tournament row is read under a share lock, so a join waits for an
    /// in-flight run to finish and then sees the tournament as `Finished`.
    ///
    /// # Errors
    ///
    /// * `TournamentError::NotFound` - no such tournament
    /// * `TournamentError::InvalidState` - tournament is not `Draft`
    /// * `TournamentError::AccountNotFound` - no such account
    /// * `TournamentError::ConflictingJoin` - account already registered
    pub async fn join_tournament(
        &self,
        tournament_id: TournamentId,
        account_id: AccountId,
    ) -> TournamentResult<Participant> {
        let mut uow = self.store.begin().await?;

        let tournament = require_tournament(uow.as_mut(), tournament_id, RowLock::Share).await?;
        if tournament.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState {
                expected: TournamentStatus::Draft,
                actual: tournament.status,
            });
        }

        uow.find_account(account_id)
            .await?
            .ok_or(TournamentError::AccountNotFound(account_id))?;

        let participant = uow
            .insert_participant(tournament_id, account_id)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => {
                    TournamentError::conflicting_join(tournament_id, account_id)
                }
                other => other.into(),
            })?;
        uow.commit().await?;

        info!("Account {account_id} joined tournament {tournament_id}");
        Ok(participant)
    }

    /// Run the whole bracket and award points, all in one unit of work
    ///
    /// Either every status change, match, place and score increment is
    /// committed together, or none are and the tournament stays `Draft`.
    ///
    /// # Errors
    ///
    /// * `TournamentError::NotFound` - no such tournament
    /// * `TournamentError::ConcurrentRunConflict` - another run holds the
    ///   tournament, or it is already `Running`. On PostgreSQL the tournament
    ///   row is taken with `NOWAIT`, so a join that is registering at the same
    ///   moment (share lock plus the participant foreign key check) is also
    ///   reported this way; retrying once the join commits succeeds.
    /// * `TournamentError::InvalidState` - tournament already `Finished`
    /// * `TournamentError::InsufficientParticipants` - fewer than two entrants
    /// * `TournamentError::AccountNotFound` - a participant's account is gone
    /// * `TournamentError::Resolver` / `TournamentError::Store` - failure mid-run
    pub async fn run_tournament(&self, tournament_id: TournamentId) -> TournamentResult<RunSummary> {
        let mut uow = self.store.begin().await?;

        let summary = match self.execute_run(uow.as_mut(), tournament_id).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Run of tournament {tournament_id} rolled back: {e}");
                return Err(e);
            }
        };
        uow.commit().await?;

        info!(
            "Tournament {tournament_id} finished with {} participants, champion account {}",
            summary.places.len(),
            summary.champion_account_id
        );
        Ok(summary)
    }

    async fn execute_run(
        &self,
        uow: &mut dyn UnitOfWork,
        tournament_id: TournamentId,
    ) -> TournamentResult<RunSummary> {
        // The exclusive lock is the per-tournament critical section; it is
        // held until the unit of work commits or rolls back
        let tournament = require_tournament(uow, tournament_id, RowLock::ExclusiveNoWait)
            .await
            .map_err(|e| match e {
                TournamentError::Store(StoreError::LockUnavailable) => {
                    TournamentError::ConcurrentRunConflict(tournament_id)
                }
                other => other,
            })?;

        match tournament.status {
            TournamentStatus::Draft => {}
            TournamentStatus::Running => {
                return Err(TournamentError::ConcurrentRunConflict(tournament_id));
            }
            TournamentStatus::Finished => {
                return Err(TournamentError::InvalidState {
                    expected: TournamentStatus::Draft,
                    actual: TournamentStatus::Finished,
                });
            }
        }

        uow.update_status(tournament_id, TournamentStatus::Running)
            .await?;

        let participants = uow.list_participants(tournament_id).await?;
        if participants.len() < MIN_PARTICIPANTS {
            return Err(TournamentError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: participants.len(),
            });
        }

        let engine = BracketEngine::new(self.resolver.as_ref(), self.draw.as_ref());
        let pool = participants.iter().map(|p| p.id).collect();
        let outcome = engine.run(tournament_id, pool)?;
        uow.insert_matches(&outcome.matches).await?;

        let eliminations = elimination::track(&participants, &outcome.matches, outcome.champion);
        let places = placement::resolve_places(&participants, &eliminations);
        for entry in &places {
            uow.set_place(entry.participant_id, entry.place).await?;
        }

        for award in scoring::awards_by_account(&places) {
            uow.add_points(award.account_id, award.points)
                .await?
                .ok_or(TournamentError::AccountNotFound(award.account_id))?;
        }

        uow.update_status(tournament_id, TournamentStatus::Finished)
            .await?;

        // Place 1 is the bracket champion
        let champion_account_id = places[0].account_id;

        Ok(RunSummary {
            tournament_id,
            champion_account_id,
            places,
        })
    }
}

async fn require_tournament(
    uow: &mut dyn UnitOfWork,
    tournament_id: TournamentId,
    lock: RowLock,
) -> TournamentResult<Tournament> {
    uow.find_tournament(tournament_id, lock)
        .await?
        .ok_or(TournamentError::NotFound(tournament_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountManager;
    use crate::db::MemoryStore;
    use crate::tournament::resolver::{FavorSide, RegistrationOrder, Side};
    use uuid::Uuid;

    struct Fixture {
        store: Arc<MemoryStore>,
        tournaments: TournamentManager,
        accounts: AccountManager,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            tournaments: TournamentManager::new(store.clone()),
            accounts: AccountManager::new(store.clone()),
            store,
        }
    }

    #[tokio::test]
    async fn test_create_tournament_starts_in_draft() {
        let f = fixture();
        let t = f.tournaments.create_tournament(" Open ").await.unwrap();
        assert_eq!(t.name, "Open");
        assert_eq!(t.status, TournamentStatus::Draft);
        assert_eq!(f.tournaments.get_tournament(t.id).await.unwrap(), t);
    }

    #[tokio::test]
    async fn test_blank_tournament_name_rejected() {
        let err = fixture().tournaments.create_tournament("").await.unwrap_err();
        assert!(matches!(err, TournamentError::InvalidName));
    }

    #[tokio::test]
    async fn test_join_validations() {
        let f = fixture();
        let t = f.tournaments.create_tournament("Cup").await.unwrap();
        let alice = f.accounts.create_account("alice").await.unwrap();

        let missing = Uuid::new_v4();
        assert!(matches!(
            f.tournaments.join_tournament(missing, alice.id).await,
            Err(TournamentError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            f.tournaments.join_tournament(t.id, missing).await,
            Err(TournamentError::AccountNotFound(id)) if id == missing
        ));

        f.tournaments.join_tournament(t.id, alice.id).await.unwrap();
        assert!(matches!(
            f.tournaments.join_tournament(t.id, alice.id).await,
            Err(TournamentError::ConflictingJoin { .. })
        ));
        assert_eq!(f.tournaments.list_participants(t.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_join_rejected_after_finish() {
        let f = fixture();
        let t = f.tournaments.create_tournament("Cup").await.unwrap();
        for name in ["a", "b"] {
            let account = f.accounts.create_account(name).await.unwrap();
            f.tournaments.join_tournament(t.id, account.id).await.unwrap();
        }
        f.tournaments.run_tournament(t.id).await.unwrap();

        let late = f.accounts.create_account("late").await.unwrap();
        let err = f.tournaments.join_tournament(t.id, late.id).await.unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InvalidState {
                actual: TournamentStatus::Finished,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_two_player_run() {
        let f = fixture();
        let tournaments = f
            .tournaments
            .clone()
            .with_resolver(Arc::new(FavorSide(Side::A)))
            .with_draw(Arc::new(RegistrationOrder));
        let t = tournaments.create_tournament("Duel").await.unwrap();
        let first = f.accounts.create_account("first").await.unwrap();
        let second = f.accounts.create_account("second").await.unwrap();
        tournaments.join_tournament(t.id, first.id).await.unwrap();
        tournaments.join_tournament(t.id, second.id).await.unwrap();

        let summary = tournaments.run_tournament(t.id).await.unwrap();

        assert_eq!(summary.champion_account_id, first.id);
        assert_eq!(f.accounts.get_account(first.id).await.unwrap().total_points, 100);
        assert_eq!(f.accounts.get_account(second.id).await.unwrap().total_points, 60);
        assert_eq!(tournaments.list_matches(t.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_already_running_is_conflict() {
        let f = fixture();
        let t = f.tournaments.create_tournament("Stuck").await.unwrap();

        let mut uow = f.store.begin().await.unwrap();
        uow.update_status(t.id, TournamentStatus::Running)
            .await
            .unwrap();
        uow.commit().await.unwrap();

        let err = f.tournaments.run_tournament(t.id).await.unwrap_err();
        assert!(matches!(err, TournamentError::ConcurrentRunConflict(id) if id == t.id));
    }

    #[tokio::test]
    async fn test_missing_tournament_run() {
        let id = Uuid::new_v4();
        let err = fixture().tournaments.run_tournament(id).await.unwrap_err();
        assert!(matches!(err, TournamentError::NotFound(missing) if missing == id));
    }
}
