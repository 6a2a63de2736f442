//! Bracket engine: reduces a pool of contestants to one champion.

use log::debug;

use super::errors::{TournamentError, TournamentResult};
use super::models::{MIN_PARTICIPANTS, Match, ParticipantId, TournamentId};
use super::resolver::{DrawOrder, OutcomeResolver};

/// Champion plus every match played on the way
#[derive(Debug, Clone)]
pub struct BracketOutcome {
    pub champion: ParticipantId,
    /// Match log in the order matches were played
    pub matches: Vec<Match>,
    /// Number of rounds played
    pub rounds: u32,
}

/// Drives elimination rounds until a single contestant remains.
pub struct BracketEngine<'a> {
    resolver: &'a dyn OutcomeResolver,
    draw: &'a dyn DrawOrder,
}

impl<'a> BracketEngine<'a> {
    pub fn new(resolver: &'a dyn OutcomeResolver, draw: &'a dyn DrawOrder) -> Self {
        Self { resolver, draw }
    }

    /// Play the whole bracket
    ///
    /// Every round the pool is rearranged by the draw order, then paired as
    /// (0,1), (2,3), ... with the last contestant of an odd pool taking a bye.
    ///
    /// # Errors
    ///
    /// * `TournamentError::InsufficientParticipants` - fewer than two contestants
    /// * `TournamentError::Resolver` - the resolver failed on some match
    pub fn run(
        &self,
        tournament_id: TournamentId,
        mut pool: Vec<ParticipantId>,
    ) -> TournamentResult<BracketOutcome> {
        if pool.len() < MIN_PARTICIPANTS {
            return Err(TournamentError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: pool.len(),
            });
        }

        // A single-elimination bracket always plays exactly N - 1 matches
        let mut matches = Vec::with_capacity(pool.len() - 1);
        let mut round = 1;

        while pool.len() > 1 {
            self.draw.arrange(&mut pool);
            let (advancing, played) = self.play_round(tournament_id, round, &pool)?;
            debug!(
                "Tournament {tournament_id} round {round}: {} matches, {} advancing",
                played.len(),
                advancing.len()
            );
            matches.extend(played);
            pool = advancing;
            round += 1;
        }

        Ok(BracketOutcome {
            champion: pool[0],
            matches,
            rounds: round - 1,
        })
    }

    fn play_round(
        &self,
        tournament_id: TournamentId,
        round: u32,
        pool: &[ParticipantId],
    ) -> TournamentResult<(Vec<ParticipantId>, Vec<Match>)> {
        let mut advancing = Vec::with_capacity(pool.len().div_ceil(2));
        let mut played = Vec::with_capacity(pool.len() / 2);

        for pair in pool.chunks(2) {
            match *pair {
                [a, b] => {
                    let side = self.resolver.resolve(a, b)?;
                    advancing.push(side.pick(a, b));
                    played.push(Match::decided(tournament_id, a, b, side, round));
                }
                [bye] => advancing.push(bye),
                _ => unreachable!("chunks(2) yields one or two elements"),
            }
        }

        Ok((advancing, played))
    }
}
