//! Database command and script executor traits

use crate::error::DbResult;
use dm_core::Version;

/// Raw SQL execution against the target database.
pub trait ScriptExecutor {
    /// Run every statement in `sql`. Fails on the first failing statement,
    /// leaving whatever partial state the engine produced.
    fn execute(&mut self, sql: &str) -> DbResult<()>;
}

/// Per-engine administrative commands and version ledger access.
pub trait DatabaseCommand {
    /// Destroy the target database. Succeeds if it does not exist.
    fn drop_database(&mut self) -> DbResult<()>;

    /// Create an empty target database.
    fn create_database(&mut self) -> DbResult<()>;

    /// Create the version ledger if missing, seeded with version 0.
    fn create_version(&mut self) -> DbResult<()>;

    /// Current ledger value; 0 when the ledger was never initialized.
    fn get_version(&mut self) -> DbResult<Version>;

    /// Overwrite the ledger value.
    fn set_version(&mut self, version: Version) -> DbResult<()>;
}

/// A complete engine adapter: admin commands plus script execution.
///
/// Implementations open their connection lazily and keep it for their own
/// lifetime; one instance drives one target.
pub trait Database: DatabaseCommand + ScriptExecutor + Send {
    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
