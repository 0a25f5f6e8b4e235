//! Swiss pairing engine.
//!
//! Builds a complete matching over the player pool with a recursive
//! backtracking search:
//! - Hard rule: no two players meet twice
//! - Soft rule: the highest-scoring unpaired player is paired first, against
//!   the highest-scoring opponent still available to them
//! - Ties within a score group are broken uniformly at random
//!
//! A failed branch restores the working sets before the next candidate is
//! tried, so dead ends are never observable outside the search.

use rand::{Rng, RngCore};
use std::collections::BTreeSet;
use tracing::{debug, info, trace};

use super::tie_break::{choose_uniform, top_score_group};
use super::{expected_match_count, PairingError, PairingSystem};
use crate::models::{Match, Player, PlayerId, TournamentData};

/// Score-greedy Swiss pairing with full backtracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwissPairing;

impl SwissPairing {
    pub fn new() -> Self {
        Self
    }

    /// Pair an annotated player pool. Player ids are indexes into `players`.
    pub fn pair_players<R: Rng + ?Sized>(
        &self,
        players: &[Player],
        rng: &mut R,
    ) -> Result<Vec<Match>, PairingError> {
        let mut search = Search {
            players,
            rng,
            pairings: Vec::with_capacity(expected_match_count(players.len())),
            nodes: 0,
            backtracks: 0,
        };
        let mut remaining: BTreeSet<PlayerId> = (0..players.len()).map(PlayerId::new).collect();

        let outcome = search.find(&mut remaining, 0);
        debug!(
            "Pairing search visited {} nodes with {} backtracks",
            search.nodes, search.backtracks
        );

        if outcome == Outcome::DeadEnd {
            return Err(PairingError::Infeasible {
                players: players.len(),
            });
        }

        verify_count(players.len(), search.pairings.len())?;

        for (one, two) in &search.pairings {
            info!(
                "{} - {}",
                players[one.index()].label(),
                players[two.index()].label()
            );
        }

        Ok(search
            .pairings
            .into_iter()
            .map(|(one, two)| Match::pairing(one, two))
            .collect())
    }
}

impl PairingSystem for SwissPairing {
    fn name(&self) -> &'static str {
        "swiss"
    }

    fn generate_pairings(
        &self,
        data: &TournamentData,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Match>, PairingError> {
        self.pair_players(data.players(), rng)
    }
}

fn verify_count(players: usize, produced: usize) -> Result<(), PairingError> {
    let expected = expected_match_count(players);
    if produced != expected {
        return Err(PairingError::CountMismatch {
            players,
            expected,
            produced,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Complete,
    DeadEnd,
}

/// Working state of one engine invocation.
struct Search<'a, R: ?Sized> {
    players: &'a [Player],
    rng: &'a mut R,
    pairings: Vec<(PlayerId, PlayerId)>,
    nodes: usize,
    backtracks: usize,
}

impl<R: Rng + ?Sized> Search<'_, R> {
    fn find(&mut self, remaining: &mut BTreeSet<PlayerId>, depth: usize) -> Outcome {
        self.nodes += 1;
        if remaining.is_empty() {
            return Outcome::Complete;
        }

        let players = self.players;
        let pool: Vec<PlayerId> = remaining.iter().copied().collect();
        let Some(player) = choose_uniform(&top_score_group(players, &pool), &mut *self.rng) else {
            return Outcome::DeadEnd;
        };
        let seeker = &players[player.index()];
        trace!(depth, "Seeking opponent for {}", seeker.label());

        remaining.remove(&player);
        let mut candidates: Vec<PlayerId> = remaining
            .iter()
            .copied()
            .filter(|c| !seeker.has_faced(*c))
            .collect();

        while !candidates.is_empty() {
            let group = top_score_group(players, &candidates);
            let Some(candidate) = choose_uniform(&group, &mut *self.rng) else {
                break;
            };
            trace!(
                depth,
                "Top score candidates: {}; selected {} - {}",
                describe(players, &group),
                seeker.label(),
                players[candidate.index()].label()
            );

            remaining.remove(&candidate);
            self.pairings.push((player, candidate));

            if self.find(remaining, depth + 1) == Outcome::Complete {
                return Outcome::Complete;
            }

            trace!(
                depth,
                "{} - {} failed",
                seeker.label(),
                players[candidate.index()].label()
            );
            self.backtracks += 1;
            self.pairings.pop();
            remaining.insert(candidate);
            candidates.retain(|c| *c != candidate);
        }

        remaining.insert(player);
        Outcome::DeadEnd
    }
}

fn describe(players: &[Player], ids: &[PlayerId]) -> String {
    ids.iter()
        .map(|id| players[id.index()].label())
        .collect::<Vec<_>>()
        .join(", ")
}
