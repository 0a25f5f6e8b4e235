//! Long-run tournament simulation.
//!
//! Plays a full Swiss tournament between players of fixed, distinct strength
//! where the stronger player always wins. Used to check that the pairing
//! engine keeps the strongest player on top over many rounds.

use rand::seq::index;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculate::{self, StandingRow};
use crate::models::{Match, Player, TournamentData};
use crate::pairing::PairingSystem;
use crate::session::{SessionError, Tournament};

/// Parameters of one simulated tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub players: usize,
    pub rounds: usize,
    pub base_rating: i32,
    pub rating_spread: u32,
}

/// Outcome of one simulated tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Final standings, best first
    pub ranking: Vec<StandingRow>,

    /// Name of the highest-rated player
    pub strongest: String,

    /// Whether the highest-rated player finished on the top score
    pub strongest_on_top: bool,
}

/// Roster of `count` players with strictly distinct ratings drawn from
/// `base_rating .. base_rating + rating_spread`.
pub fn generate_roster<R: Rng + ?Sized>(
    count: usize,
    base_rating: i32,
    rating_spread: u32,
    rng: &mut R,
) -> TournamentData {
    let spread = (rating_spread as usize).max(count);
    let offsets = index::sample(rng, spread, count);

    let mut data = TournamentData::new();
    for (i, offset) in offsets.into_iter().enumerate() {
        let rating = base_rating.saturating_add(offset as i32);
        // Names are unique by construction.
        let _ = data.register(Player::new(player_name(i), rating));
    }
    data
}

fn player_name(index: usize) -> String {
    if index < 26 {
        format!("Player {}", char::from(b'A' + index as u8))
    } else {
        format!("Player {}", index + 1)
    }
}

/// Higher rating wins outright; equal ratings draw.
pub fn resolve(data: &TournamentData, m: Match) -> Match {
    let one = data.player(m.player_one).map_or(0, |p| p.rating);
    let two = data.player(m.player_two).map_or(0, |p| p.rating);
    match one.cmp(&two) {
        std::cmp::Ordering::Greater => m.with_result(1.0, 0.0),
        std::cmp::Ordering::Less => m.with_result(0.0, 1.0),
        std::cmp::Ordering::Equal => m.with_result(0.5, 0.5),
    }
}

/// Play `params.rounds` rounds on a generated roster.
pub fn run<P: PairingSystem>(
    params: &SimulationParams,
    pairing: P,
    mut rng: ChaCha8Rng,
) -> Result<SimulationReport, SessionError> {
    let data = generate_roster(params.players, params.base_rating, params.rating_spread, &mut rng);
    let mut session = Tournament::new(data, pairing, rng);

    for round in 1..=params.rounds {
        let matches = session.next_pairings()?;
        let results: Vec<Match> = matches
            .into_iter()
            .map(|m| resolve(session.data(), m))
            .collect();
        debug!("Round {}: {} matches resolved", round, results.len());
        session.record_round(results)?;
    }

    Ok(report(session.data()))
}

/// Rank the final standings and check the strongest player's position.
pub fn report(data: &TournamentData) -> SimulationReport {
    let ranking = calculate::ranked_standings(data);
    let strongest = data
        .players()
        .iter()
        .max_by_key(|p| p.rating)
        .map(|p| (p.name.clone(), p.score));
    let top_score = ranking.first().map(|r| r.score);

    let (strongest, strongest_on_top) = match (strongest, top_score) {
        (Some((name, score)), Some(top)) => (name, score >= top),
        _ => (String::new(), true),
    };
    info!(
        "Simulation finished: leader {}, strongest {} (on top: {})",
        ranking.first().map_or("-", |r| r.name.as_str()),
        strongest,
        strongest_on_top
    );

    SimulationReport {
        ranking,
        strongest,
        strongest_on_top,
    }
}
