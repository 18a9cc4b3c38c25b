//! Schema versions and step directions.
//!
//! A [`Version`] is a non-negative integer where `0` means "no migrations
//! applied". Versions are written to disk zero-padded to [`VERSION_WIDTH`]
//! digits, which caps the representable range at [`Version::MAX`].

use crate::error::{CoreError, CoreResult};
use std::fmt;
use std::str::FromStr;

/// Number of digits used in migration file names.
pub const VERSION_WIDTH: usize = 5;

/// A schema version in the range `0..=99999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Version(u32);

impl Version {
    /// The fresh/reset state.
    pub const ZERO: Version = Version(0);

    /// Largest version that fits in a [`VERSION_WIDTH`]-digit file name.
    pub const MAX: Version = Version(99_999);

    /// Create a version, rejecting values that cannot be zero-padded to
    /// [`VERSION_WIDTH`] digits.
    pub fn new(value: u32) -> CoreResult<Self> {
        if value > Self::MAX.0 {
            return Err(CoreError::VersionOutOfRange {
                value: u64::from(value),
                max: Self::MAX.0,
            });
        }
        Ok(Self(value))
    }

    /// Convert a raw ledger value into a version.
    pub fn from_i64(value: i64) -> CoreResult<Self> {
        let raw = u32::try_from(value).map_err(|_| CoreError::InvalidVersion {
            input: value.to_string(),
        })?;
        Self::new(raw)
    }

    /// Numeric value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// File-name form, e.g. `00042`.
    pub fn padded(self) -> String {
        format!("{:0width$}", self.0, width = VERSION_WIDTH)
    }

    /// The adjacent version in `direction`, or `None` when stepping would
    /// leave `0..=MAX`.
    pub fn step(self, direction: Direction) -> Option<Version> {
        match direction {
            Direction::Up if self < Self::MAX => Some(Version(self.0 + 1)),
            Direction::Down if self > Self::ZERO => Some(Version(self.0 - 1)),
            _ => None,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        let value: u64 = trimmed.parse().map_err(|_| CoreError::InvalidVersion {
            input: s.to_string(),
        })?;
        if value > u64::from(Self::MAX.0) {
            return Err(CoreError::VersionOutOfRange {
                value,
                max: Self::MAX.0,
            });
        }
        // value <= 99_999 fits in u32
        Ok(Self(value as u32))
    }
}

impl TryFrom<u32> for Version {
    type Error = CoreError;

    fn try_from(value: u32) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<Version> for i64 {
    fn from(v: Version) -> Self {
        i64::from(v.0)
    }
}

/// Direction of travel through the version sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Apply `up` scripts, increment `+1`
    Up,
    /// Apply `down` scripts, increment `-1`
    Down,
}

impl Direction {
    /// Derive the direction from the sign of a step increment.
    ///
    /// Zero is treated as `Up`.
    pub fn from_increment(increment: i32) -> Self {
        if increment < 0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    /// Signed step increment.
    pub fn increment(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    /// Name of the script subdirectory for this direction.
    pub fn dir_name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// True once `candidate` lies beyond `target` in this direction.
    ///
    /// The boundary is inclusive: a candidate equal to the target has not
    /// passed it, so the target's own script is still applied.
    pub fn has_passed(self, candidate: Version, target: Version) -> bool {
        match self {
            Direction::Up => candidate > target,
            Direction::Down => candidate < target,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
