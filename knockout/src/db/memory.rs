//! In-memory store.
//!
//! Units of work are serialized: `begin` holds the store mutex until the unit
//! is committed or dropped. Each unit mutates a private copy of the state that
//! replaces the shared state only on commit.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::repository::{
    AccountRepository, MatchRepository, ParticipantRepository, RowLock, Store,
    TournamentRepository, UnitOfWork,
};
use crate::account::{Account, AccountId};
use crate::tournament::models::{
    Match, Participant, ParticipantId, Tournament, TournamentId, TournamentStatus,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    tournaments: HashMap<TournamentId, Tournament>,
    participants: Vec<Participant>,
    matches: Vec<Match>,
    accounts: HashMap<AccountId, Account>,
    last_stamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// Strictly increasing creation timestamps, so registration order is
    /// never ambiguous even when calls land in the same clock tick
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

/// Store backed by process memory
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryUnitOfWork { guard, working }))
    }
}

/// Unit of work over a [`MemoryStore`]
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl TournamentRepository for MemoryUnitOfWork {
    async fn insert_tournament(&mut self, name: &str) -> StoreResult<Tournament> {
        let tournament = Tournament {
            id: Uuid::new_v4(),
            name: name.to_string(),
            status: TournamentStatus::Draft,
            created_at: self.working.stamp(),
        };
        self.working
            .tournaments
            .insert(tournament.id, tournament.clone());
        Ok(tournament)
    }

    async fn find_tournament(
        &mut self,
        id: TournamentId,
        _lock: RowLock,
    ) -> StoreResult<Option<Tournament>> {
        Ok(self.working.tournaments.get(&id).cloned())
    }

    async fn update_status(
        &mut self,
        id: TournamentId,
        status: TournamentStatus,
    ) -> StoreResult<()> {
        let tournament = self
            .working
            .tournaments
            .get_mut(&id)
            .ok_or_else(|| StoreError::Corrupt(format!("tournament {id} vanished")))?;
        tournament.status = status;
        Ok(())
    }

    async fn list_tournaments(&mut self) -> StoreResult<Vec<Tournament>> {
        let mut tournaments: Vec<_> = self.working.tournaments.values().cloned().collect();
        tournaments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tournaments)
    }
}

#[async_trait]
impl ParticipantRepository for MemoryUnitOfWork {
    async fn insert_participant(
        &mut self,
        tournament_id: TournamentId,
        account_id: AccountId,
    ) -> StoreResult<Participant> {
        let duplicate = self
            .working
            .participants
            .iter()
            .any(|p| p.tournament_id == tournament_id && p.account_id == account_id);
        if duplicate {
            return Err(StoreError::UniqueViolation(
                "participants_tournament_id_account_id_key".to_string(),
            ));
        }

        let participant = Participant {
            id: Uuid::new_v4(),
            tournament_id,
            account_id,
            place: None,
            created_at: self.working.stamp(),
        };
        self.working.participants.push(participant.clone());
        Ok(participant)
    }

    async fn list_participants(
        &mut self,
        tournament_id: TournamentId,
    ) -> StoreResult<Vec<Participant>> {
        let mut participants: Vec<_> = self
            .working
            .participants
            .iter()
            .filter(|p| p.tournament_id == tournament_id)
            .cloned()
            .collect();
        participants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(participants)
    }

    async fn set_place(&mut self, participant_id: ParticipantId, place: u32) -> StoreResult<()> {
        let participant = self
            .working
            .participants
            .iter_mut()
            .find(|p| p.id == participant_id)
            .ok_or_else(|| StoreError::Corrupt(format!("participant {participant_id} vanished")))?;
        participant.place = Some(place);
        Ok(())
    }
}

#[async_trait]
impl MatchRepository for MemoryUnitOfWork {
    async fn insert_matches(&mut self, matches: &[Match]) -> StoreResult<()> {
        self.working.matches.extend_from_slice(matches);
        Ok(())
    }

    async fn list_matches(&mut self, tournament_id: TournamentId) -> StoreResult<Vec<Match>> {
        let mut matches: Vec<_> = self
            .working
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .cloned()
            .collect();
        // Stable sort keeps play order within a round
        matches.sort_by_key(|m| m.round);
        Ok(matches)
    }
}

#[async_trait]
impl AccountRepository for MemoryUnitOfWork {
    async fn insert_account(&mut self, display_name: &str) -> StoreResult<Account> {
        if self
            .working
            .accounts
            .values()
            .any(|a| a.display_name == display_name)
        {
            return Err(StoreError::UniqueViolation(
                "accounts_display_name_key".to_string(),
            ));
        }

        let account = Account {
            id: Uuid::new_v4(),
            display_name: display_name.to_string(),
            total_points: 0,
            created_at: self.working.stamp(),
        };
        self.working.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_account(&mut self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.working.accounts.get(&id).cloned())
    }

    async fn add_points(&mut self, id: AccountId, points: i64) -> StoreResult<Option<i64>> {
        Ok(self.working.accounts.get_mut(&id).map(|account| {
            account.total_points += points;
            account.total_points
        }))
    }

    async fn top_accounts(&mut self, limit: u32) -> StoreResult<Vec<Account>> {
        let mut accounts: Vec<_> = self.working.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        accounts.truncate(limit as usize);
        Ok(accounts)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryUnitOfWork { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
