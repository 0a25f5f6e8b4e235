//! Score ledger.
//!
//! Derives standings from the recorded round history:
//! - Cumulative score per player
//! - Opponents already faced
//! - Running score after each round
//!
//! Derived fields are always rebuilt from scratch, so evaluating an unchanged
//! dataset twice gives identical results.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

use crate::models::{Match, Player, Round, TournamentData};

/// Rebuild score, opponents and per-round trace for every player.
///
/// Every id referenced by `rounds` must index into `players`; the dataset
/// guarantees this when matches are recorded.
pub fn evaluate(players: &mut [Player], rounds: &[Round]) {
    for player in players.iter_mut() {
        player.reset_standings();
    }

    for round in rounds {
        for m in round {
            let one = &mut players[m.player_one.index()];
            one.score += m.points_one;
            one.opponents.insert(m.player_two);

            let two = &mut players[m.player_two.index()];
            two.score += m.points_two;
            two.opponents.insert(m.player_one);
        }
        for player in players.iter_mut() {
            player.points_per_round.push(player.score);
        }
    }

    debug!(
        "Evaluated standings for {} players over {} rounds",
        players.len(),
        rounds.len()
    );
}

/// One standings line: identity, rating and running score per round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub name: String,
    pub rating: i32,
    pub score: f64,
    pub points_per_round: Vec<f64>,
}

impl From<&Player> for StandingRow {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            rating: player.rating,
            score: player.score,
            points_per_round: player.points_per_round.clone(),
        }
    }
}

/// One pairing line: both players with their current scores and the points
/// of the match (zero for freshly generated pairings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingRow {
    pub player_one: String,
    pub score_one: f64,
    pub points_one: f64,
    pub player_two: String,
    pub score_two: f64,
    pub points_two: f64,
}

/// Standings in roster order.
pub fn standings(data: &TournamentData) -> Vec<StandingRow> {
    data.players().iter().map(StandingRow::from).collect()
}

/// Standings ordered by score, then rating (both descending), then name.
pub fn ranked_standings(data: &TournamentData) -> Vec<StandingRow> {
    let mut rows = standings(data);
    rows.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.rating.cmp(&a.rating))
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

/// Display rows for a list of matches. Matches naming players outside the
/// roster are skipped.
pub fn pairing_rows(data: &TournamentData, matches: &[Match]) -> Vec<PairingRow> {
    matches
        .iter()
        .filter_map(|m| {
            let one = data.player(m.player_one)?;
            let two = data.player(m.player_two)?;
            Some(PairingRow {
                player_one: one.name.clone(),
                score_one: one.score,
                points_one: m.points_one,
                player_two: two.name.clone(),
                score_two: two.score,
                points_two: m.points_two,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerId, TournamentBuilder};
    use pretty_assertions::assert_eq;

    fn sample_tournament() -> TournamentData {
        let mut builder = TournamentBuilder::new();
        for name in ["Alice", "Bob", "Carol", "Dan"] {
            builder.register(name).unwrap();
        }
        builder.next_round();
        builder.add_match("Alice", "1:0", "Bob").unwrap();
        builder.add_match("Carol", "0.5:0.5", "Dan").unwrap();
        builder.next_round();
        builder.add_match("Alice", "1:0", "Carol").unwrap();
        builder.add_match("Dan", "0:1", "Bob").unwrap();
        builder.build()
    }

    #[test]
    fn test_scores_and_opponents() {
        let data = sample_tournament();
        let players = data.players();

        assert_eq!(players[0].score, 2.0);
        assert_eq!(players[1].score, 1.0);
        assert_eq!(players[2].score, 0.5);
        assert_eq!(players[3].score, 0.5);

        let alice_opponents: Vec<_> = players[0].opponents.iter().copied().collect();
        assert_eq!(alice_opponents, vec![PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_points_per_round_trace() {
        let data = sample_tournament();

        assert_eq!(data.players()[0].points_per_round, vec![1.0, 2.0]);
        assert_eq!(data.players()[1].points_per_round, vec![0.0, 1.0]);
        assert_eq!(data.players()[3].points_per_round, vec![0.5, 0.5]);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut data = sample_tournament();
        let before: Vec<Player> = data.players().to_vec();

        data.evaluate();
        data.evaluate();

        assert_eq!(data.players(), before.as_slice());
    }

    #[test]
    fn test_trace_covers_player_absent_from_round() {
        let mut builder = TournamentBuilder::new();
        for name in ["Alice", "Bob", "Carol"] {
            builder.register(name).unwrap();
        }
        builder.next_round();
        builder.add_match("Alice", "1:0", "Bob").unwrap();

        let data = builder.build();

        assert_eq!(data.players()[2].points_per_round, vec![0.0]);
        assert!(data.players()[2].opponents.is_empty());
    }

    #[test]
    fn test_no_rounds_resets_everything() {
        let mut players = vec![Player::new("Alice", 1600)
            .with_score(5.0)
            .with_opponents([PlayerId::new(1)])];

        evaluate(&mut players, &[]);

        assert_eq!(players[0].score, 0.0);
        assert!(players[0].opponents.is_empty());
        assert!(players[0].points_per_round.is_empty());
    }

    #[test]
    fn test_standings_keep_roster_order() {
        let data = sample_tournament();
        let names: Vec<_> = standings(&data).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol", "Dan"]);
    }

    #[test]
    fn test_ranked_standings() {
        let data = sample_tournament();
        let names: Vec<_> = ranked_standings(&data).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol", "Dan"]);
    }

    #[test]
    fn test_pairing_rows() {
        let data = sample_tournament();
        let matches = vec![Match::pairing(PlayerId::new(0), PlayerId::new(3))];

        let rows = pairing_rows(&data, &matches);

        assert_eq!(
            rows,
            vec![PairingRow {
                player_one: "Alice".to_string(),
                score_one: 2.0,
                points_one: 0.0,
                player_two: "Dan".to_string(),
                score_two: 0.5,
                points_two: 0.0,
            }]
        );
    }
}
