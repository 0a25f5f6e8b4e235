//! Pairing model — individual game results between two players.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A single game between two players.
///
/// Freshly generated pairings carry zero points on both sides; recorded
/// matches carry the actual result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// First player
    pub player_one: PlayerId,

    /// Points awarded to the first player
    pub points_one: f64,

    /// Second player
    pub player_two: PlayerId,

    /// Points awarded to the second player
    pub points_two: f64,
}

/// All matches played in one round.
pub type Round = Vec<Match>;

impl Match {
    /// Create an unplayed pairing.
    pub fn pairing(player_one: PlayerId, player_two: PlayerId) -> Self {
        Self {
            player_one,
            points_one: 0.0,
            player_two,
            points_two: 0.0,
        }
    }

    /// Create a match with its result.
    pub fn played(player_one: PlayerId, points_one: f64, player_two: PlayerId, points_two: f64) -> Self {
        Self {
            player_one,
            points_one,
            player_two,
            points_two,
        }
    }

    /// Builder method to fill in the result.
    pub fn with_result(mut self, points_one: f64, points_two: f64) -> Self {
        self.points_one = points_one;
        self.points_two = points_two;
        self
    }

    /// Whether `player` takes part in this match.
    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_one == player || self.player_two == player
    }

    /// The other side of the match, if `player` takes part.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.player_one == player {
            Some(self.player_two)
        } else if self.player_two == player {
            Some(self.player_one)
        } else {
            None
        }
    }

    /// Points awarded to `player`, if they take part.
    pub fn points_for(&self, player: PlayerId) -> Option<f64> {
        if self.player_one == player {
            Some(self.points_one)
        } else if self.player_two == player {
            Some(self.points_two)
        } else {
            None
        }
    }
}
