//! Tournament data models for single-elimination brackets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use uuid::Uuid;

use super::resolver::Side;
use crate::account::AccountId;

/// Tournament ID type
pub type TournamentId = Uuid;

/// Participant ID type
pub type ParticipantId = Uuid;

/// Match ID type
pub type MatchId = Uuid;

/// Minimum number of participants needed to run a bracket
pub const MIN_PARTICIPANTS: usize = 2;

/// Tournament lifecycle status
///
/// Moves strictly `Draft -> Running -> Finished`. `Running` is only ever
/// observed inside the unit of work that performs the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting participants
    Draft,
    /// Bracket in progress
    Running,
    /// Places and points awarded
    Finished,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Draft => "draft",
            TournamentStatus::Running => "running",
            TournamentStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not one of the known values
#[derive(Debug, Error)]
#[error("unknown tournament status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TournamentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TournamentStatus::Draft),
            "running" => Ok(TournamentStatus::Running),
            "finished" => Ok(TournamentStatus::Finished),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Tournament record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
}

/// An account's entry in a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub tournament_id: TournamentId,
    pub account_id: AccountId,
    /// Final place (1-based), unset until the tournament finishes
    pub place: Option<u32>,
    /// Registration time, used as the placement tie-break
    pub created_at: DateTime<Utc>,
}

/// A single played match
///
/// Byes never produce a `Match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub participant_a: ParticipantId,
    pub participant_b: ParticipantId,
    pub winner: Option<ParticipantId>,
    /// Round number, starting at 1
    pub round: u32,
    pub created_at: DateTime<Utc>,
}

impl Match {
    /// Create a match whose winner is already known
    pub fn decided(
        tournament_id: TournamentId,
        participant_a: ParticipantId,
        participant_b: ParticipantId,
        winner: Side,
        round: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            participant_a,
            participant_b,
            winner: Some(winner.pick(participant_a, participant_b)),
            round,
            created_at: Utc::now(),
        }
    }

    /// The contestant that did not win, if the match has a valid winner
    pub fn loser(&self) -> Option<ParticipantId> {
        match self.winner {
            Some(w) if w == self.participant_a => Some(self.participant_b),
            Some(w) if w == self.participant_b => Some(self.participant_a),
            _ => None,
        }
    }
}

/// One row of the final standings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceEntry {
    pub participant_id: ParticipantId,
    pub account_id: AccountId,
    pub place: u32,
}

/// Result of a completed tournament run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub tournament_id: TournamentId,
    pub champion_account_id: AccountId,
    /// Standings, ascending by place
    pub places: Vec<PlaceEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            TournamentStatus::Draft,
            TournamentStatus::Running,
            TournamentStatus::Finished,
        ] {
            assert_eq!(status.as_str().parse::<TournamentStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = "cancelled".parse::<TournamentStatus>().unwrap_err();
        assert_eq!(err.0, "cancelled");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TournamentStatus::Finished).unwrap();
        assert_eq!(json, "\"finished\"");
    }

    #[test]
    fn test_decided_match_records_winner_and_loser() {
        let (t, a, b) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let m = Match::decided(t, a, b, Side::B, 2);
        assert_eq!(m.winner, Some(b));
        assert_eq!(m.loser(), Some(a));
        assert_eq!(m.round, 2);

        let m = Match::decided(t, a, b, Side::A, 1);
        assert_eq!(m.loser(), Some(b));
    }

    #[test]
    fn test_undecided_match_has_no_loser() {
        let mut m = Match::decided(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Side::A, 1);
        m.winner = None;
        assert_eq!(m.loser(), None);

        m.winner = Some(Uuid::new_v4());
        assert_eq!(m.loser(), None);
    }
}
