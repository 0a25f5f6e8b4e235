//! Tournament dataset — roster plus the ordered round history.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

use super::{Match, Player, PlayerId, Round, DEFAULT_RATING};
use crate::calculate;

/// Errors raised while building or extending a tournament.
#[derive(Debug, Error, PartialEq)]
pub enum TournamentError {
    #[error("Player already registered: {0}")]
    DuplicateRegistration(String),

    #[error("Player not registered: {0}")]
    UnknownPlayer(String),

    #[error("No round has been opened yet")]
    NoOpenRound,

    #[error("Player cannot be paired against themselves: {0}")]
    SelfPairing(String),

    #[error("Player {name} appears more than once in round {round}")]
    PlayerAlreadyPaired { name: String, round: usize },

    #[error("Invalid match result (expected <points>:<points>): {0}")]
    InvalidResult(String),
}

/// Roster and round history of one tournament.
///
/// Player standings are derived from `rounds` only; call [`evaluate`](Self::evaluate)
/// after changing the history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TournamentData {
    players: Vec<Player>,
    name_to_id: HashMap<String, PlayerId>,
    rounds: Vec<Round>,
}

impl TournamentData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player and assign them an id.
    pub fn register(&mut self, player: Player) -> Result<PlayerId, TournamentError> {
        if self.name_to_id.contains_key(&player.name) {
            return Err(TournamentError::DuplicateRegistration(player.name));
        }
        let id = PlayerId::new(self.players.len());
        self.name_to_id.insert(player.name.clone(), id);
        self.players.push(player);
        Ok(id)
    }

    /// Look up a player id by name.
    pub fn player_id(&self, name: &str) -> Result<PlayerId, TournamentError> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| TournamentError::UnknownPlayer(name.to_string()))
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Declare a new, empty round; subsequent matches are recorded there.
    pub fn open_round(&mut self) {
        self.rounds.push(Vec::new());
    }

    /// Record a match in the most recently opened round.
    pub fn add_match(&mut self, m: Match) -> Result<(), TournamentError> {
        let round = self.rounds.len();
        if round == 0 {
            return Err(TournamentError::NoOpenRound);
        }
        self.check_match(&m, &self.rounds[round - 1], round)?;
        self.rounds[round - 1].push(m);
        Ok(())
    }

    /// Append a complete round. Nothing is recorded if any match is invalid.
    pub fn push_round(&mut self, matches: Round) -> Result<(), TournamentError> {
        let round = self.rounds.len() + 1;
        let mut accepted: Round = Vec::with_capacity(matches.len());
        for m in matches {
            self.check_match(&m, &accepted, round)?;
            accepted.push(m);
        }
        debug!("Recorded round {} with {} matches", round, accepted.len());
        self.rounds.push(accepted);
        Ok(())
    }

    /// Recompute every player's derived standings from the round history.
    pub fn evaluate(&mut self) {
        calculate::evaluate(&mut self.players, &self.rounds);
    }

    fn name_of(&self, id: PlayerId) -> Result<&str, TournamentError> {
        self.player(id)
            .map(|p| p.name.as_str())
            .ok_or_else(|| TournamentError::UnknownPlayer(id.to_string()))
    }

    fn check_match(&self, m: &Match, round: &[Match], number: usize) -> Result<(), TournamentError> {
        let one = self.name_of(m.player_one)?;
        let two = self.name_of(m.player_two)?;
        if m.player_one == m.player_two {
            return Err(TournamentError::SelfPairing(one.to_string()));
        }

        let seated: BTreeSet<PlayerId> = round
            .iter()
            .flat_map(|r| [r.player_one, r.player_two])
            .collect();
        for (id, name) in [(m.player_one, one), (m.player_two, two)] {
            if seated.contains(&id) {
                return Err(TournamentError::PlayerAlreadyPaired {
                    name: name.to_string(),
                    round: number,
                });
            }
        }
        Ok(())
    }
}

/// Parse a `<points one>:<points two>` result, e.g. `0.5:1.5`.
pub fn parse_result(result: &str) -> Result<(f64, f64), TournamentError> {
    let invalid = || TournamentError::InvalidResult(result.to_string());
    let (one, two) = result.split_once(':').ok_or_else(invalid)?;
    let one: f64 = one.trim().parse().map_err(|_| invalid())?;
    let two: f64 = two.trim().parse().map_err(|_| invalid())?;
    if !one.is_finite() || !two.is_finite() {
        return Err(invalid());
    }
    Ok((one, two))
}

/// Incremental loader used by input adapters.
#[derive(Debug, Default)]
pub struct TournamentBuilder {
    data: TournamentData,
}

impl TournamentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player with the default rating.
    pub fn register(&mut self, name: &str) -> Result<PlayerId, TournamentError> {
        self.register_with_rating(name, DEFAULT_RATING)
    }

    pub fn register_with_rating(&mut self, name: &str, rating: i32) -> Result<PlayerId, TournamentError> {
        self.data.register(Player::new(name, rating))
    }

    /// Declare a new round; all matches added afterwards belong to it.
    pub fn next_round(&mut self) {
        self.data.open_round();
    }

    /// Record a match by player names and a `a:b` result string.
    pub fn add_match(&mut self, player_one: &str, result: &str, player_two: &str) -> Result<(), TournamentError> {
        let one = self.data.player_id(player_one)?;
        let two = self.data.player_id(player_two)?;
        let (points_one, points_two) = parse_result(result)?;
        self.data.add_match(Match::played(one, points_one, two, points_two))
    }

    /// Compute standings and hand over the dataset.
    pub fn build(mut self) -> TournamentData {
        self.data.evaluate();
        self.data
    }
}
