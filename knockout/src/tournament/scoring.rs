//! Scoring policy: fixed point table by final place.

use serde::{Deserialize, Serialize};

use super::models::{ParticipantId, PlaceEntry};
use crate::account::AccountId;

/// Points credited to an account for one finishing place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAward {
    pub participant_id: ParticipantId,
    pub account_id: AccountId,
    pub place: u32,
    pub points: i64,
}

/// Points for a 1-based place
///
/// 1st: 100, 2nd: 60, 3rd-4th: 40, 5th-8th: 20, everyone else: 5.
pub const fn points_for_place(place: u32) -> i64 {
    match place {
        1 => 100,
        2 => 60,
        3..=4 => 40,
        5..=8 => 20,
        _ => 5,
    }
}

/// One award per standings entry, in the same order
pub fn awards(places: &[PlaceEntry]) -> Vec<ScoreAward> {
    places
        .iter()
        .map(|entry| ScoreAward {
            participant_id: entry.participant_id,
            account_id: entry.account_id,
            place: entry.place,
            points: points_for_place(entry.place),
        })
        .collect()
}

/// Awards ordered by account id, the order score rows are locked in
///
/// Accounts are shared across tournaments, so every run increments them in
/// this one global order.
pub fn awards_by_account(places: &[PlaceEntry]) -> Vec<ScoreAward> {
    let mut awards = awards(places);
    awards.sort_by_key(|award| award.account_id);
    awards
}

/// Total points handed out by a tournament with `field_size` participants
pub fn total_for_field(field_size: u32) -> i64 {
    (1..=field_size).map(points_for_place).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_point_tiers() {
        let table: Vec<i64> = (1..=10).map(points_for_place).collect();
        assert_eq!(table, vec![100, 60, 40, 40, 20, 20, 20, 20, 5, 5]);
        assert_eq!(points_for_place(1000), 5);
    }

    #[test]
    fn test_total_for_field() {
        assert_eq!(total_for_field(2), 160);
        assert_eq!(total_for_field(3), 200);
        assert_eq!(total_for_field(8), 320);
        assert_eq!(total_for_field(10), 330);
    }

    #[test]
    fn test_awards_follow_places() {
        let places = vec![
            PlaceEntry {
                participant_id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
                place: 1,
            },
            PlaceEntry {
                participant_id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
                place: 2,
            },
        ];

        let awards = awards(&places);
        assert_eq!(awards.len(), 2);
        assert_eq!(awards[0].account_id, places[0].account_id);
        assert_eq!(awards[0].points, 100);
        assert_eq!(awards[1].points, 60);
    }

    #[test]
    fn test_awards_by_account_are_sorted() {
        let places: Vec<PlaceEntry> = (1..=12)
            .map(|place| PlaceEntry {
                participant_id: Uuid::new_v4(),
                account_id: Uuid::new_v4(),
                place,
            })
            .collect();

        let sorted = awards_by_account(&places);
        assert!(sorted.windows(2).all(|w| w[0].account_id < w[1].account_id));

        let mut by_place = sorted.clone();
        by_place.sort_by_key(|award| award.place);
        assert_eq!(by_place, awards(&places));
    }
}
