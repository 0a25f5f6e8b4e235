//! Input and output adapters.
//!
//! Moves tournament data between files and the core:
//! - Plain-text players and round files (input)
//! - Plain-text standings and pairings files, or a terminal table (output)
//! - JSON Lines rows (output)

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::TournamentError;

mod jsonl;
mod text;

pub use jsonl::JsonlOutput;
pub use text::{expand_round_files, TextFileInput, TextFileOutput, TextStdOutput};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Unreadable glob match: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("Malformed line {line} in {path:?}: {reason}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

/// Output encoding for standings and pairings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "jsonl" | "json" => Ok(OutputFormat::Jsonl),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Create (or truncate) a file for writing, creating parent directories.
fn create_file(path: &Path) -> Result<BufWriter<File>, StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}
