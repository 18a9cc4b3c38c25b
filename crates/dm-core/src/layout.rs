//! Script locator for a migration folder.
//!
//! ```text
//! <root>/base.sql
//! <root>/migrations/up/NNNNN.sql
//! <root>/migrations/down/NNNNN.sql
//! ```
//!
//! Path computation never touches the filesystem; a missing script is the
//! caller's termination signal, not an error here.

use crate::error::{CoreError, CoreResult};
use crate::version::{Direction, Version, VERSION_WIDTH};
use std::fs;
use std::path::{Path, PathBuf};

const BASE_SCRIPT: &str = "base.sql";
const MIGRATIONS_DIR: &str = "migrations";

/// Deterministic file locations under a validated folder root.
#[derive(Debug, Clone)]
pub struct ScriptLayout {
    root: PathBuf,
}

impl ScriptLayout {
    /// Bind to an existing folder root.
    ///
    /// Fails with [`CoreError::FolderNotFound`] if `root` is missing or is
    /// not a directory.
    pub fn open(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CoreError::FolderNotFound {
                path: root.display().to_string(),
            });
        }
        Ok(Self { root })
    }

    /// Create the folder root and both script directories, then bind to it.
    pub fn create(root: impl Into<PathBuf>) -> CoreResult<Self> {
        let layout = Self { root: root.into() };
        for dir in [
            layout.script_dir(Direction::Up),
            layout.script_dir(Direction::Down),
        ] {
            fs::create_dir_all(&dir).map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(layout)
    }

    /// The folder root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/base.sql`
    pub fn base_path(&self) -> PathBuf {
        self.root.join(BASE_SCRIPT)
    }

    /// `<root>/migrations/<up|down>`
    pub fn script_dir(&self, direction: Direction) -> PathBuf {
        self.root.join(MIGRATIONS_DIR).join(direction.dir_name())
    }

    /// `<root>/migrations/<up|down>/NNNNN.sql`
    pub fn migration_path(&self, version: Version, direction: Direction) -> PathBuf {
        self.script_dir(direction)
            .join(format!("{}.sql", version.padded()))
    }

    /// Like [`migration_path`](Self::migration_path) but takes the signed
    /// step increment; a negative increment selects the `down` set.
    pub fn migration_path_for_increment(&self, version: Version, increment: i32) -> PathBuf {
        self.migration_path(version, Direction::from_increment(increment))
    }

    /// Versions of every well-formed `NNNNN.sql` script in `direction`,
    /// sorted ascending. A missing directory yields an empty list.
    pub fn list_versions(&self, direction: Direction) -> CoreResult<Vec<Version>> {
        let dir = self.script_dir(direction);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: dir.display().to_string(),
                source: e,
            })?;
            let name = entry.file_name();
            let Some(version) = name.to_str().and_then(parse_script_name) else {
                log::debug!("Ignoring non-migration file {}", entry.path().display());
                continue;
            };
            versions.push(version);
        }
        versions.sort();
        Ok(versions)
    }
}

/// Parse `NNNNN.sql` into a version. Anything else is not a migration script.
fn parse_script_name(name: &str) -> Option<Version> {
    let stem = name.strip_suffix(".sql")?;
    if stem.len() != VERSION_WIDTH || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
