//! Migration orchestrator.
//!
//! [`Migration`] drives a target database through the versioned scripts of a
//! folder root. Both directions share one stepping loop:
//!
//! 1. `candidate = current + increment`
//! 2. stop once `candidate` is beyond the target (inclusive boundary), or
//!    when the script for `candidate` does not exist
//! 3. execute the script, write `candidate` to the ledger, step again
//!
//! The ledger is only written after a script fully succeeds, so it always
//! names the last version that was applied completely.

use crate::error::{RunnerError, RunnerResult};
use crate::report::{MigrationReport, MigrationStatus, StopReason};
use dm_core::{Config, Direction, ScriptLayout, Version};
use dm_db::{Database, DatabaseCommand, DbError, ScriptExecutor};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Optional hardening switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Run each script and its ledger write inside one transaction
    pub transactional: bool,

    /// Treat stopping short of an explicit target as an error
    pub strict: bool,
}

impl MigrationOptions {
    /// Options as set in `dbmigrate.yml`
    pub fn from_config(config: &Config) -> Self {
        Self {
            transactional: config.transactional,
            strict: config.strict,
        }
    }
}

/// Orchestrates reset/up/down for one target database.
///
/// Not safe to run concurrently against the same target: the ledger has no
/// locking.
pub struct Migration {
    layout: ScriptLayout,
    db: Box<dyn Database>,
    options: MigrationOptions,
}

impl Migration {
    /// Create an orchestrator over `folder`.
    ///
    /// Fails immediately if `folder` is missing or not a directory.
    pub fn new(folder: impl Into<PathBuf>, db: Box<dyn Database>) -> RunnerResult<Self> {
        let layout = ScriptLayout::open(folder)?;
        Ok(Self {
            layout,
            db,
            options: MigrationOptions::default(),
        })
    }

    /// Build from a loaded config, resolving the folder and database path
    /// against `project_root` and applying `target` overrides.
    pub fn from_config(
        config: &Config,
        project_root: &Path,
        target: Option<&str>,
    ) -> RunnerResult<Self> {
        let db_config = config
            .get_database_config(target)?
            .resolved_against(project_root);
        let db = dm_db::connect(&db_config)?;
        Ok(Self::new(config.folder_absolute(project_root), db)?
            .with_options(MigrationOptions::from_config(config)))
    }

    /// Replace the run options
    pub fn with_options(mut self, options: MigrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Script locator for this folder
    pub fn layout(&self) -> &ScriptLayout {
        &self.layout
    }

    /// Engine identifier of the target database
    pub fn db_type(&self) -> &'static str {
        self.db.db_type()
    }

    /// Current ledger version
    pub fn current_version(&mut self) -> RunnerResult<Version> {
        Ok(self.db.get_version()?)
    }

    /// Drop and recreate the database, run `base.sql`, initialize the ledger
    /// to 0, then migrate up to `target` (or as far as scripts exist).
    pub fn reset(&mut self, target: Option<Version>) -> RunnerResult<MigrationReport> {
        log::info!("Resetting {} database", self.db.db_type());
        self.db.drop_database()?;
        self.db.create_database()?;

        let base = self.layout.base_path();
        let sql = read_script(&base)?;
        self.db.execute(&sql)?;
        log::info!("Applied base script {}", base.display());

        self.db.create_version()?;
        self.up(target)
    }

    /// Apply up scripts until `target` (inclusive) or the first missing script.
    pub fn up(&mut self, target: Option<Version>) -> RunnerResult<MigrationReport> {
        self.migrate(target, Direction::Up)
    }

    /// Apply down scripts until `target` (inclusive) or the first missing script.
    pub fn down(&mut self, target: Version) -> RunnerResult<MigrationReport> {
        self.migrate(Some(target), Direction::Down)
    }

    /// Move toward `target` in whichever direction it lies; `None` means
    /// up to the latest script.
    pub fn update(&mut self, target: Option<Version>) -> RunnerResult<MigrationReport> {
        match target {
            Some(t) if t < self.current_version()? => self.down(t),
            _ => self.up(target),
        }
    }

    /// Compare the ledger with the scripts on disk without changing anything.
    pub fn status(&mut self) -> RunnerResult<MigrationStatus> {
        let current = self.current_version()?;
        let available = self.layout.list_versions(Direction::Up)?;

        let mut pending = Vec::new();
        let mut candidate = current.step(Direction::Up);
        while let Some(version) = candidate {
            if !self.layout.migration_path(version, Direction::Up).is_file() {
                break;
            }
            pending.push(version);
            candidate = version.step(Direction::Up);
        }

        Ok(MigrationStatus {
            current,
            pending,
            available,
        })
    }

    fn migrate(
        &mut self,
        target: Option<Version>,
        direction: Direction,
    ) -> RunnerResult<MigrationReport> {
        let started = Instant::now();
        let from = self.current_version()?;
        let mut current = from;
        let mut applied = Vec::new();
        let mut candidate = from.step(direction);

        let stop = loop {
            let Some(version) = candidate else {
                break if target == Some(current) {
                    StopReason::TargetReached
                } else {
                    StopReason::EndOfRange
                };
            };
            if target.is_some_and(|t| direction.has_passed(version, t)) {
                break StopReason::TargetReached;
            }
            let path = self.layout.migration_path(version, direction);
            if !path.is_file() {
                break StopReason::MissingScript(version);
            }

            self.apply(&path, version, direction)?;
            applied.push(version);
            current = version;
            candidate = version.step(direction);
        };

        log::debug!("Stopped {direction} at {current}: {stop}");

        if let (Some(t), StopReason::MissingScript(missing)) = (target, stop) {
            let path = self.layout.migration_path(missing, direction);
            if self.options.strict {
                return Err(RunnerError::TargetNotReached {
                    target: t,
                    reached: current,
                    missing: path.display().to_string(),
                });
            }
            log::warn!(
                "Target version {t} not reached: stopped at {current}, {} does not exist",
                path.display()
            );
        }

        Ok(MigrationReport {
            direction,
            from,
            to: current,
            applied,
            stop,
            duration: started.elapsed(),
        })
    }

    /// Execute one script and record its version.
    fn apply(&mut self, path: &Path, version: Version, direction: Direction) -> RunnerResult<()> {
        let sql = read_script(path)?;
        log::debug!("Applying {direction} script {}", path.display());

        let result = if self.options.transactional {
            self.apply_in_transaction(&sql, version)
        } else {
            self.db
                .execute(&sql)
                .and_then(|()| self.db.set_version(version))
        };

        result.map_err(|source| RunnerError::ScriptFailed {
            version,
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Applied {direction} script {}", version.padded());
        Ok(())
    }

    /// `BEGIN` / `COMMIT` around script and ledger write, rolling back on error.
    fn apply_in_transaction(&mut self, sql: &str, version: Version) -> Result<(), DbError> {
        self.db.execute("BEGIN TRANSACTION")?;

        let result = self
            .db
            .execute(sql)
            .and_then(|()| self.db.set_version(version));

        match result {
            Ok(()) => {
                if let Err(commit_err) = self.db.execute("COMMIT") {
                    let _ = self.db.execute("ROLLBACK");
                    return Err(commit_err);
                }
                Ok(())
            }
            Err(e) => {
                let _ = self.db.execute("ROLLBACK");
                Err(e)
            }
        }
    }
}

fn read_script(path: &Path) -> RunnerResult<String> {
    fs::read_to_string(path).map_err(|e| RunnerError::ScriptRead {
        path: path.display().to_string(),
        source: e,
    })
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
