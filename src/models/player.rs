//! Player model — roster entry plus the standings derived from recorded rounds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::PlayerId;

/// Rating given to players registered without one.
pub const DEFAULT_RATING: i32 = 1600;

/// A registered tournament player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique display name
    pub name: String,

    /// Informational rating; not consulted by the pairing engine
    pub rating: i32,

    /// Whether the player is still taking part. Stored for the roster only,
    /// every registered player is eligible for pairing.
    pub active: bool,

    /// Total points across all recorded rounds (derived)
    #[serde(default)]
    pub score: f64,

    /// Players already faced (derived)
    #[serde(default)]
    pub opponents: BTreeSet<PlayerId>,

    /// Running score after each recorded round (derived)
    #[serde(default)]
    pub points_per_round: Vec<f64>,
}

impl Player {
    /// Create a new active Player with no derived standings.
    pub fn new(name: impl Into<String>, rating: i32) -> Self {
        Self {
            name: name.into(),
            rating,
            active: true,
            score: 0.0,
            opponents: BTreeSet::new(),
            points_per_round: Vec::new(),
        }
    }

    /// Builder method to set the active flag.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Builder method to set a score directly, for pools that were annotated
    /// outside the ledger.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Builder method to set previously faced opponents.
    pub fn with_opponents(mut self, opponents: impl IntoIterator<Item = PlayerId>) -> Self {
        self.opponents = opponents.into_iter().collect();
        self
    }

    /// Whether this player has already faced `other`.
    pub fn has_faced(&self, other: PlayerId) -> bool {
        self.opponents.contains(&other)
    }

    /// Clear every derived field.
    pub fn reset_standings(&mut self) {
        self.score = 0.0;
        self.opponents.clear();
        self.points_per_round.clear();
    }

    /// `name (score)` label used in pairing listings and logs.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.score)
    }
}
