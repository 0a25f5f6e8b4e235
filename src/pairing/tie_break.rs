//! Score-group selection and random tie-breaking.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Player, PlayerId};

/// The members of `ids` sharing the highest current score, in input order.
///
/// Every id must index into `players`.
pub fn top_score_group(players: &[Player], ids: &[PlayerId]) -> Vec<PlayerId> {
    let max = ids
        .iter()
        .map(|id| players[id.index()].score)
        .fold(f64::NEG_INFINITY, f64::max);

    ids.iter()
        .copied()
        .filter(|id| players[id.index()].score == max)
        .collect()
}

/// Pick one element uniformly at random. `None` for an empty slice.
pub fn choose_uniform<T: Copy, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<T> {
    items.choose(rng).copied()
}
