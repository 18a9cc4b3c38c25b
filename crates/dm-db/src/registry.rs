//! Engine registry: resolve a [`DbType`] to its command implementation.

use crate::duckdb::DuckDbCommand;
use crate::error::{DbError, DbResult};
use crate::sqlite::SqliteCommand;
use crate::traits::Database;
use dm_core::config::is_plain_identifier;
use dm_core::{DatabaseConfig, DbType};

/// Constructor for one engine adapter.
pub type Constructor = fn(&DatabaseConfig) -> Box<dyn Database>;

fn duckdb(config: &DatabaseConfig) -> Box<dyn Database> {
    Box::new(DuckDbCommand::new(config))
}

fn sqlite(config: &DatabaseConfig) -> Box<dyn Database> {
    Box::new(SqliteCommand::new(config))
}

/// Look up the constructor registered for `db_type`.
pub fn constructor(db_type: DbType) -> Constructor {
    match db_type {
        DbType::DuckDb => duckdb,
        DbType::Sqlite => sqlite,
    }
}

/// Build the database command for `config`.
///
/// No connection is opened here; engines connect on first use.
pub fn connect(config: &DatabaseConfig) -> DbResult<Box<dyn Database>> {
    if !is_plain_identifier(&config.version_table) {
        return Err(DbError::ConnectionError(format!(
            "invalid version table name '{}'",
            config.version_table
        )));
    }
    log::debug!("Using {} database at {}", config.db_type, config.path);
    Ok(constructor(config.db_type)(config))
}
