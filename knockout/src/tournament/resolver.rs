//! Pluggable sources of randomness for the bracket: who wins a match, and
//! how the pool is arranged before pairing.

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::models::ParticipantId;

/// Which contestant of a pair won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Select the value on this side
    pub fn pick<T>(self, a: T, b: T) -> T {
        match self {
            Side::A => a,
            Side::B => b,
        }
    }
}

/// A resolver could not decide a match
#[derive(Debug, Error)]
#[error("outcome resolver failed: {0}")]
pub struct ResolverError(pub String);

/// Decides the winner of a match between two contestants.
///
/// Implementations are called once per match and must not rely on state
/// shared between calls.
pub trait OutcomeResolver: Send + Sync {
    fn resolve(&self, a: ParticipantId, b: ParticipantId) -> Result<Side, ResolverError>;
}

/// Unbiased coin flip
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinFlip;

impl OutcomeResolver for CoinFlip {
    fn resolve(&self, _a: ParticipantId, _b: ParticipantId) -> Result<Side, ResolverError> {
        if rand::rng().random_bool(0.5) {
            Ok(Side::A)
        } else {
            Ok(Side::B)
        }
    }
}

/// Always picks the same side
#[derive(Debug, Clone, Copy)]
pub struct FavorSide(pub Side);

impl OutcomeResolver for FavorSide {
    fn resolve(&self, _a: ParticipantId, _b: ParticipantId) -> Result<Side, ResolverError> {
        Ok(self.0)
    }
}

/// Arranges the pool before each round is paired off.
pub trait DrawOrder: Send + Sync {
    fn arrange(&self, pool: &mut [ParticipantId]);
}

/// Fresh shuffle of the whole pool every round
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuffledDraw;

impl DrawOrder for ShuffledDraw {
    fn arrange(&self, pool: &mut [ParticipantId]) {
        pool.shuffle(&mut rand::rng());
    }
}

/// Leaves the pool as given: registration order in round 1, then the order
/// winners were produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationOrder;

impl DrawOrder for RegistrationOrder {
    fn arrange(&self, _pool: &mut [ParticipantId]) {}
}
