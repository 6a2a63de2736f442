//! Placement resolver: turns elimination depth into final places.

use std::cmp::Ordering;

use super::elimination::{Elimination, EliminationMap};
use super::models::{Participant, PlaceEntry};

/// Order participants and assign dense places `1..=N`.
///
/// Later elimination ranks better. Ties are broken by earlier registration,
/// then by participant id, so the order is total and repeatable.
pub fn resolve_places(participants: &[Participant], eliminations: &EliminationMap) -> Vec<PlaceEntry> {
    let mut ranked: Vec<(&Participant, Elimination)> = participants
        .iter()
        .map(|p| {
            let elimination = eliminations
                .get(&p.id)
                .copied()
                .unwrap_or(Elimination::Round(0));
            (p, elimination)
        })
        .collect();

    ranked.sort_by(|(a, elim_a), (b, elim_b)| compare(a, *elim_a, b, *elim_b));

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (p, _))| PlaceEntry {
            participant_id: p.id,
            account_id: p.account_id,
            place: idx as u32 + 1,
        })
        .collect()
}

fn compare(a: &Participant, elim_a: Elimination, b: &Participant, elim_b: Elimination) -> Ordering {
    elim_b
        .cmp(&elim_a)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}
