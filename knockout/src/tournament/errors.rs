//! Tournament error types.

use thiserror::Error;
use uuid::Uuid;

use super::models::{TournamentId, TournamentStatus};
use super::resolver::ResolverError;
use crate::account::AccountId;
use crate::db::StoreError;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Tournament not in correct state: expected {expected}, got {actual}")]
    InvalidState {
        expected: TournamentStatus,
        actual: TournamentStatus,
    },

    #[error("Insufficient participants: need {needed}, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    #[error("Account {account_id} already joined tournament {tournament_id}")]
    ConflictingJoin {
        tournament_id: TournamentId,
        account_id: AccountId,
    },

    #[error("Tournament {0} is already being run")]
    ConcurrentRunConflict(TournamentId),

    #[error("Tournament name must not be blank")]
    InvalidName,

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl TournamentError {
    /// Get a client-safe error message
    ///
    /// Store failures are collapsed to a generic message so SQL details never
    /// reach the caller.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::Store(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Build a `ConflictingJoin` for the given pair
    pub(crate) fn conflicting_join(tournament_id: Uuid, account_id: Uuid) -> Self {
        TournamentError::ConflictingJoin {
            tournament_id,
            account_id,
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_sanitized() {
        let err = TournamentError::Store(StoreError::Corrupt("bad row".to_string()));
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_domain_errors_pass_through() {
        let err = TournamentError::InsufficientParticipants {
            needed: 2,
            current: 1,
        };
        assert_eq!(
            err.client_message(),
            "Insufficient participants: need 2, have 1"
        );

        let err = TournamentError::InvalidState {
            expected: TournamentStatus::Draft,
            actual: TournamentStatus::Finished,
        };
        assert_eq!(
            err.to_string(),
            "Tournament not in correct state: expected draft, got finished"
        );
    }
}
