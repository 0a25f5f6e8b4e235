//! JSON Lines output.
//!
//! Each line is a valid JSON object representing one standings or pairing row.

use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::{create_file, StorageError};
use crate::calculate::{PairingRow, StandingRow};
use crate::session::TournamentSink;

/// Writes standings and pairings as JSON Lines.
pub struct JsonlOutput {
    standings: Box<dyn Write>,
    pairings: Box<dyn Write>,
}

impl JsonlOutput {
    pub fn new(standings: Box<dyn Write>, pairings: Box<dyn Write>) -> Self {
        Self {
            standings,
            pairings,
        }
    }

    /// Both streams go to stdout.
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stdout()))
    }

    /// One file per stream, replacing any existing content.
    pub fn files(standings: &Path, pairings: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(
            Box::new(create_file(standings)?),
            Box::new(create_file(pairings)?),
        ))
    }
}

fn write_rows<T: Serialize>(writer: &mut dyn Write, rows: &[T]) -> Result<usize, StorageError> {
    let mut count = 0;
    for row in rows {
        let json = serde_json::to_string(row)?;
        writeln!(writer, "{}", json)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

impl TournamentSink for JsonlOutput {
    fn standings(&mut self, rows: &[StandingRow]) -> Result<(), StorageError> {
        let count = write_rows(self.standings.as_mut(), rows)?;
        debug!("Wrote {} standings rows", count);
        Ok(())
    }

    fn pairings(&mut self, rows: &[PairingRow]) -> Result<(), StorageError> {
        let count = write_rows(self.pairings.as_mut(), rows)?;
        debug!("Wrote {} pairing rows", count);
        Ok(())
    }
}
