//! # Swiss Pairer
//!
//! Standings and next-round pairings for multi-round tournaments run on the
//! Swiss system.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, tournament dataset)
//! - **calculate**: Score ledger deriving standings from the round history
//! - **pairing**: Backtracking Swiss pairing engine
//! - **session**: Orchestration between input, ledger, engine and output
//! - **storage**: Text and JSON Lines adapters
//! - **simulate**: Long-run simulated tournaments
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod models;
pub mod pairing;
pub mod session;
pub mod simulate;
pub mod storage;

pub use models::*;
