//! Tournament session.
//!
//! Ties the pieces together: loads the dataset from an input adapter, keeps
//! standings current through the score ledger, asks the pairing system for
//! the next round and hands read-only rows to output adapters.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{self, PairingRow, StandingRow};
use crate::models::{Match, TournamentData, TournamentError};
use crate::pairing::{PairingError, PairingSystem};
use crate::storage::StorageError;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Pairing error: {0}")]
    Pairing(#[from] PairingError),

    #[error("Tournament error: {0}")]
    Tournament(#[from] TournamentError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Produces a fully populated dataset (roster plus round history).
pub trait TournamentSource {
    fn load(&self) -> Result<TournamentData, StorageError>;
}

/// Receives standings and pairings for display or persistence.
pub trait TournamentSink {
    fn standings(&mut self, rows: &[StandingRow]) -> Result<(), StorageError>;

    fn pairings(&mut self, rows: &[PairingRow]) -> Result<(), StorageError>;
}

/// Random stream for tie-breaks: reproducible when seeded, OS entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// A tournament in progress.
pub struct Tournament<P> {
    data: TournamentData,
    pairing: P,
    rng: ChaCha8Rng,
}

impl<P: PairingSystem> Tournament<P> {
    /// Wrap a dataset; standings are recomputed immediately.
    pub fn new(mut data: TournamentData, pairing: P, rng: ChaCha8Rng) -> Self {
        data.evaluate();
        Self { data, pairing, rng }
    }

    /// Load the dataset from an input adapter.
    pub fn load(
        source: &impl TournamentSource,
        pairing: P,
        rng: ChaCha8Rng,
    ) -> Result<Self, StorageError> {
        let data = source.load()?;
        info!(
            "Loaded {} players and {} rounds",
            data.player_count(),
            data.rounds().len()
        );
        Ok(Self::new(data, pairing, rng))
    }

    pub fn data(&self) -> &TournamentData {
        &self.data
    }

    /// Standings in roster order.
    pub fn standings(&self) -> Vec<StandingRow> {
        calculate::standings(&self.data)
    }

    /// Generate the next round. Nothing is recorded.
    pub fn next_pairings(&mut self) -> Result<Vec<Match>, PairingError> {
        let round = self.data.rounds().len() + 1;
        info!("Generating {} pairings for round {}", self.pairing.name(), round);
        self.pairing
            .generate_pairings(&self.data, &mut self.rng)
            .inspect_err(|e| warn!("Round {} cannot be paired: {}", round, e))
    }

    pub fn pairing_rows(&self, matches: &[Match]) -> Vec<PairingRow> {
        calculate::pairing_rows(&self.data, matches)
    }

    /// Append a completed round and recompute standings.
    pub fn record_round(&mut self, matches: Vec<Match>) -> Result<(), TournamentError> {
        self.data.push_round(matches)?;
        self.data.evaluate();
        Ok(())
    }

    pub fn output_standings(&self, sink: &mut impl TournamentSink) -> Result<(), StorageError> {
        sink.standings(&self.standings())
    }

    /// Generate the next round and write it out. The generated matches are
    /// returned so the caller can record them once results are known.
    pub fn output_pairings(
        &mut self,
        sink: &mut impl TournamentSink,
    ) -> Result<Vec<Match>, SessionError> {
        let matches = self.next_pairings()?;
        sink.pairings(&self.pairing_rows(&matches))?;
        Ok(matches)
    }

    pub fn into_data(self) -> TournamentData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerId, TournamentBuilder};
    use crate::pairing::SwissPairing;
    use pretty_assertions::assert_eq;

    struct FixedSource(TournamentData);

    impl TournamentSource for FixedSource {
        fn load(&self) -> Result<TournamentData, StorageError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        standings: Vec<StandingRow>,
        pairings: Vec<PairingRow>,
    }

    impl TournamentSink for RecordingSink {
        fn standings(&mut self, rows: &[StandingRow]) -> Result<(), StorageError> {
            self.standings = rows.to_vec();
            Ok(())
        }

        fn pairings(&mut self, rows: &[PairingRow]) -> Result<(), StorageError> {
            self.pairings = rows.to_vec();
            Ok(())
        }
    }

    fn roster(names: &[&str]) -> TournamentData {
        let mut builder = TournamentBuilder::new();
        for name in names {
            builder.register(name).unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_load_and_output() {
        let source = FixedSource(roster(&["Alice", "Bob", "Carol", "Dan"]));
        let mut session = Tournament::load(&source, SwissPairing::new(), seeded_rng(Some(1))).unwrap();
        let mut sink = RecordingSink::default();

        session.output_standings(&mut sink).unwrap();
        let matches = session.output_pairings(&mut sink).unwrap();

        assert_eq!(sink.standings.len(), 4);
        assert_eq!(matches.len(), 2);
        assert_eq!(sink.pairings.len(), 2);
        assert!(sink.pairings.iter().all(|r| r.points_one == 0.0 && r.points_two == 0.0));
    }

    #[test]
    fn test_record_round_updates_standings() {
        let mut session = Tournament::new(
            roster(&["Alice", "Bob", "Carol", "Dan"]),
            SwissPairing::new(),
            seeded_rng(Some(5)),
        );

        let matches = session.next_pairings().unwrap();
        let results: Vec<Match> = matches.iter().map(|m| m.with_result(1.0, 0.0)).collect();
        session.record_round(results.clone()).unwrap();

        assert_eq!(session.data().rounds().len(), 1);
        for m in &results {
            let winner = session.data().player(m.player_one).unwrap();
            assert_eq!(winner.points_per_round, vec![1.0]);
            assert!(winner.has_faced(m.player_two));
        }
    }

    #[test]
    fn test_record_round_rejects_unknown_player() {
        let mut session = Tournament::new(roster(&["Alice", "Bob"]), SwissPairing::new(), seeded_rng(Some(0)));

        let err = session
            .record_round(vec![Match::played(PlayerId::new(0), 1.0, PlayerId::new(7), 0.0)])
            .unwrap_err();

        assert!(matches!(err, TournamentError::UnknownPlayer(_)));
        assert!(session.data().rounds().is_empty());
    }

    #[test]
    fn test_odd_roster_surfaces_pairing_failure() {
        let mut session = Tournament::new(roster(&["Alice", "Bob", "Carol"]), SwissPairing::new(), seeded_rng(Some(0)));
        let mut sink = RecordingSink::default();

        let err = session.output_pairings(&mut sink).unwrap_err();

        assert!(matches!(
            err,
            SessionError::Pairing(PairingError::Infeasible { players: 3 })
        ));
        assert!(sink.pairings.is_empty());
    }

    #[test]
    fn test_seeded_sessions_agree() {
        let data = roster(&["A", "B", "C", "D", "E", "F"]);
        let mut one = Tournament::new(data.clone(), SwissPairing::new(), seeded_rng(Some(11)));
        let mut two = Tournament::new(data, SwissPairing::new(), seeded_rng(Some(11)));

        assert_eq!(one.next_pairings().unwrap(), two.next_pairings().unwrap());
    }

    #[test]
    fn test_exhausted_roster_is_infeasible() {
        let mut session = Tournament::new(roster(&["Alice", "Bob"]), SwissPairing::new(), seeded_rng(Some(0)));
        let first = session.next_pairings().unwrap();
        session
            .record_round(first.iter().map(|m| m.with_result(0.5, 0.5)).collect())
            .unwrap();

        assert_eq!(
            session.next_pairings(),
            Err(PairingError::Infeasible { players: 2 })
        );
    }
}
