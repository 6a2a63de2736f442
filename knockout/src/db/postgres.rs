//! PostgreSQL store.
//!
//! Each unit of work wraps a `sqlx` transaction, which rolls back when dropped
//! uncommitted. Tables are described in `schema.sql`.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction, postgres::PgRow};
use std::sync::Arc;
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

/// Keeps each batched insert well under the 65535 bind-parameter limit
const MATCH_INSERT_CHUNK: usize = 1000;

/// Store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Unit of work over a [`PgStore`]
pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

fn tournament_from_row(row: &PgRow) -> StoreResult<Tournament> {
    let status: String = row.try_get("status")?;
    Ok(Tournament {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        status: status.parse()?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn participant_from_row(row: &PgRow) -> StoreResult<Participant> {
    let place: Option<i32> = row.try_get("place")?;
    Ok(Participant {
        id: row.try_get("id")?,
        tournament_id: row.try_get("tournament_id")?,
        account_id: row.try_get("account_id")?,
        place: place.map(|p| p as u32),
        created_at: row.try_get("created_at")?,
    })
}

fn match_from_row(row: &PgRow) -> StoreResult<Match> {
    let round: i32 = row.try_get("round")?;
    Ok(Match {
        id: row.try_get("id")?,
        tournament_id: row.try_get("tournament_id")?,
        participant_a: row.try_get("participant_a")?,
        participant_b: row.try_get("participant_b")?,
        winner: row.try_get("winner")?,
        round: round as u32,
        created_at: row.try_get("created_at")?,
    })
}

fn account_from_row(row: &PgRow) -> StoreResult<Account> {
    Ok(Account {
        id: row.try_get("id")?,
        display_name: row.try_get("display_name")?,
        total_points: row.try_get("total_points")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl TournamentRepository for PgUnitOfWork {
    async fn insert_tournament(&mut self, name: &str) -> StoreResult<Tournament> {
        let row = sqlx::query(
            r#"
            INSERT INTO tournaments (id, name, status)
            VALUES ($1, $2, $3)
            RETURNING id, name, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(TournamentStatus::Draft.as_str())
        .fetch_one(&mut *self.tx)
        .await?;

        tournament_from_row(&row)
    }

    async fn find_tournament(
        &mut self,
        id: TournamentId,
        lock: RowLock,
    ) -> StoreResult<Option<Tournament>> {
        let locking = match lock {
            RowLock::None => "",
            RowLock::Share => " FOR SHARE",
            RowLock::ExclusiveNoWait => " FOR UPDATE NOWAIT",
        };
        let sql =
            format!("SELECT id, name, status, created_at FROM tournaments WHERE id = $1{locking}");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.as_ref().map(tournament_from_row).transpose()
    }

    async fn update_status(
        &mut self,
        id: TournamentId,
        status: TournamentStatus,
    ) -> StoreResult<()> {
        let result = sqlx::query("UPDATE tournaments SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Corrupt(format!("tournament {id} vanished")));
        }
        Ok(())
    }

    async fn list_tournaments(&mut self) -> StoreResult<Vec<Tournament>> {
        let rows = sqlx::query(
            "SELECT id, name, status, created_at FROM tournaments ORDER BY created_at DESC",
        )
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(tournament_from_row).collect()
    }
}

#[async_trait]
impl ParticipantRepository for PgUnitOfWork {
    async fn insert_participant(
        &mut self,
        tournament_id: TournamentId,
        account_id: AccountId,
    ) -> StoreResult<Participant> {
        let row = sqlx::query(
            r#"
            INSERT INTO participants (id, tournament_id, account_id)
            VALUES ($1, $2, $3)
            RETURNING id, tournament_id, account_id, place, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tournament_id)
        .bind(account_id)
        .fetch_one(&mut *self.tx)
        .await?;

        participant_from_row(&row)
    }

    async fn list_participants(
        &mut self,
        tournament_id: TournamentId,
    ) -> StoreResult<Vec<Participant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, tournament_id, account_id, place, created_at
            FROM participants
            WHERE tournament_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(participant_from_row).collect()
    }

    async fn set_place(&mut self, participant_id: ParticipantId, place: u32) -> StoreResult<()> {
        sqlx::query("UPDATE participants SET place = $1 WHERE id = $2")
            .bind(place as i32)
            .bind(participant_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MatchRepository for PgUnitOfWork {
    async fn insert_matches(&mut self, matches: &[Match]) -> StoreResult<()> {
        for chunk in matches.chunks(MATCH_INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO matches (id, tournament_id, participant_a, participant_b, winner, round, created_at) ",
            );
            builder.push_values(chunk, |mut b, m| {
                b.push_bind(m.id)
                    .push_bind(m.tournament_id)
                    .push_bind(m.participant_a)
                    .push_bind(m.participant_b)
                    .push_bind(m.winner)
                    .push_bind(m.round as i32)
                    .push_bind(m.created_at);
            });
            builder.build().execute(&mut *self.tx).await?;
        }
        Ok(())
    }

    async fn list_matches(&mut self, tournament_id: TournamentId) -> StoreResult<Vec<Match>> {
        let rows = sqlx::query(
            r#"
            SELECT id, tournament_id, participant_a, participant_b, winner, round, created_at
            FROM matches
            WHERE tournament_id = $1
            ORDER BY round, created_at
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(match_from_row).collect()
    }
}

#[async_trait]
impl AccountRepository for PgUnitOfWork {
    async fn insert_account(&mut self, display_name: &str) -> StoreResult<Account> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (id, display_name)
            VALUES ($1, $2)
            RETURNING id, display_name, total_points, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(display_name)
        .fetch_one(&mut *self.tx)
        .await?;

        account_from_row(&row)
    }

    async fn find_account(&mut self, id: AccountId) -> StoreResult<Option<Account>> {
        let row = sqlx::query(
            "SELECT id, display_name, total_points, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn add_points(&mut self, id: AccountId, points: i64) -> StoreResult<Option<i64>> {
        // Single statement so concurrent runs touching the same account never
        // lose an increment
        let row = sqlx::query(
            "UPDATE accounts SET total_points = total_points + $1 WHERE id = $2 RETURNING total_points",
        )
        .bind(points)
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(|r| r.try_get("total_points"))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn top_accounts(&mut self, limit: u32) -> StoreResult<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, display_name, total_points, created_at
            FROM accounts
            ORDER BY total_points DESC, created_at
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&mut *self.tx)
        .await?;

        rows.iter().map(account_from_row).collect()
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
