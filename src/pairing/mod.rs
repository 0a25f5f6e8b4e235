//! Next-round pairing generation.
//!
//! A pairing system turns the evaluated standings of a tournament into the
//! matches of the next round. All systems implement the `PairingSystem` trait.

use rand::RngCore;
use thiserror::Error;

use crate::models::{Match, TournamentData};

mod swiss;
pub mod tie_break;

pub use swiss::SwissPairing;

/// Errors that can occur while generating pairings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("Cannot build pairings: no complete matching exists for {players} players")]
    Infeasible { players: usize },

    #[error("Created incorrect number of matches! Players: {players}, expected: {expected}, matches: {produced}")]
    CountMismatch {
        players: usize,
        expected: usize,
        produced: usize,
    },
}

/// Core trait for pairing systems.
pub trait PairingSystem {
    /// System identifier for logging.
    fn name(&self) -> &'static str;

    /// Produce the matches of the next round from the evaluated standings.
    ///
    /// Every returned match has zero points on both sides.
    fn generate_pairings(
        &self,
        data: &TournamentData,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Match>, PairingError>;
}

/// Number of matches a complete round must contain for `players` players.
pub fn expected_match_count(players: usize) -> usize {
    players.div_ceil(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_match_count() {
        assert_eq!(expected_match_count(0), 0);
        assert_eq!(expected_match_count(2), 1);
        assert_eq!(expected_match_count(7), 4);
        assert_eq!(expected_match_count(20), 10);
    }

    #[test]
    fn test_error_messages() {
        let err = PairingError::Infeasible { players: 5 };
        assert!(err.to_string().contains("5 players"));

        let err = PairingError::CountMismatch {
            players: 4,
            expected: 2,
            produced: 1,
        };
        assert!(err.to_string().contains("matches: 1"));
    }
}
