//! Outcomes of migration runs

use dm_core::{Direction, Version};
use std::fmt;
use std::time::Duration;

/// Why the stepping loop ended. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The next candidate lies beyond the requested target
    TargetReached,
    /// No script exists for this candidate version
    MissingScript(Version),
    /// Stepping would leave `0..=99999`
    EndOfRange,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::TargetReached => write!(f, "target reached"),
            StopReason::MissingScript(v) => write!(f, "no script for version {}", v.padded()),
            StopReason::EndOfRange => write!(f, "end of version range"),
        }
    }
}

/// Result of one `up`/`down` run
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// Direction of travel
    pub direction: Direction,

    /// Ledger version before the run
    pub from: Version,

    /// Ledger version after the run
    pub to: Version,

    /// Versions whose scripts were applied, in order
    pub applied: Vec<Version>,

    /// Why the run stopped
    pub stop: StopReason,

    /// Total execution time
    pub duration: Duration,
}

impl MigrationReport {
    /// Number of scripts applied
    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }

    /// True when nothing was applied
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Snapshot of the ledger against the scripts on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Current ledger version
    pub current: Version,

    /// Up scripts an open-ended `up` would apply, in order
    pub pending: Vec<Version>,

    /// Every up script found on disk, sorted
    pub available: Vec<Version>,
}

impl MigrationStatus {
    /// Version an open-ended `up` would end on
    pub fn latest_reachable(&self) -> Version {
        self.pending.last().copied().unwrap_or(self.current)
    }

    /// Up scripts on disk that an open-ended `up` cannot reach because of a gap
    pub fn unreachable(&self) -> Vec<Version> {
        let latest = self.latest_reachable();
        self.available
            .iter()
            .copied()
            .filter(|v| *v > latest)
            .collect()
    }
}
