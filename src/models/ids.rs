//! Stable roster identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a registered player: its position in the roster.
///
/// Assigned once at registration and never reused, so it stays valid for the
/// whole lifetime of a [`TournamentData`](super::TournamentData).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(usize);

impl PlayerId {
    /// Create a PlayerId from a roster index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the roster index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.0)
    }
}

impl From<usize> for PlayerId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}
