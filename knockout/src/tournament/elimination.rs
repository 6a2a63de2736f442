//! Elimination tracking derived from the match log.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::models::{Match, Participant, ParticipantId};

/// How far a participant got in the bracket
///
/// Variant order matters: any `Round` sorts below `Undefeated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Elimination {
    /// Knocked out in this round (0 = never played)
    Round(u32),
    /// Never lost
    Undefeated,
}

/// Elimination result per participant
pub type EliminationMap = HashMap<ParticipantId, Elimination>;

/// Record, for each participant, the latest round in which they lost.
///
/// Losers are folded with `max` so the log may be processed in any order.
/// The champion is always `Undefeated`; participants absent from the log stay
/// at `Round(0)`.
pub fn track(
    participants: &[Participant],
    matches: &[Match],
    champion: ParticipantId,
) -> EliminationMap {
    let mut eliminations: EliminationMap = participants
        .iter()
        .map(|p| (p.id, Elimination::Round(0)))
        .collect();

    for m in matches {
        if let Some(loser) = m.loser() {
            let entry = eliminations.entry(loser).or_insert(Elimination::Round(0));
            *entry = (*entry).max(Elimination::Round(m.round));
        }
    }

    eliminations.insert(champion, Elimination::Undefeated);
    eliminations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::resolver::Side;
    use chrono::Utc;
    use uuid::Uuid;

    fn participant() -> Participant {
        Participant {
            id: Uuid::new_v4(),
            tournament_id: Uuid::nil(),
            account_id: Uuid::new_v4(),
            place: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_undefeated_beats_any_round() {
        assert!(Elimination::Undefeated > Elimination::Round(u32::MAX));
        assert!(Elimination::Round(3) > Elimination::Round(2));
        assert!(Elimination::Round(1) > Elimination::Round(0));
    }

    #[test]
    fn test_three_player_scenario() {
        let (a, b, c) = (participant(), participant(), participant());
        let matches = vec![
            Match::decided(Uuid::nil(), a.id, b.id, Side::B, 1),
            Match::decided(Uuid::nil(), b.id, c.id, Side::B, 2),
        ];

        let map = track(&[a.clone(), b.clone(), c.clone()], &matches, c.id);

        assert_eq!(map[&a.id], Elimination::Round(1));
        assert_eq!(map[&b.id], Elimination::Round(2));
        assert_eq!(map[&c.id], Elimination::Undefeated);
    }

    #[test]
    fn test_out_of_order_log_keeps_latest_round() {
        let (a, b) = (participant(), participant());
        // Malformed log where `a` appears to lose twice; the later round wins
        let matches = vec![
            Match::decided(Uuid::nil(), a.id, b.id, Side::B, 3),
            Match::decided(Uuid::nil(), a.id, b.id, Side::B, 1),
        ];

        let map = track(&[a.clone(), b.clone()], &matches, b.id);
        assert_eq!(map[&a.id], Elimination::Round(3));
    }

    #[test]
    fn test_participant_without_matches_defaults_to_zero() {
        let (a, b, idle) = (participant(), participant(), participant());
        let matches = vec![Match::decided(Uuid::nil(), a.id, b.id, Side::A, 1)];

        let map = track(&[a.clone(), b.clone(), idle.clone()], &matches, a.id);
        assert_eq!(map[&idle.id], Elimination::Round(0));
        assert_eq!(map[&b.id], Elimination::Round(1));
        assert_eq!(map[&a.id], Elimination::Undefeated);
    }
}
