//! Error types for dm-runner

use dm_core::{CoreError, Version};
use dm_db::DbError;
use thiserror::Error;

/// Migration run errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration or layout error from dm-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Database command or script execution error from dm-db
    #[error(transparent)]
    Db(#[from] DbError),

    /// Script file could not be read (R001)
    #[error("[R001] Failed to read script '{path}': {source}")]
    ScriptRead {
        path: String,
        source: std::io::Error,
    },

    /// Script failed to apply; the ledger stays at the previous version (R002)
    #[error("[R002] Migration script {version} ({path}) failed: {source}")]
    ScriptFailed {
        version: Version,
        path: String,
        #[source]
        source: DbError,
    },

    /// Explicit target not reached because a script is missing (R003)
    #[error("[R003] Target version {target} not reached: stopped at {reached}, missing script {missing}")]
    TargetNotReached {
        target: Version,
        reached: Version,
        missing: String,
    },
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
