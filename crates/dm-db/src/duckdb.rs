//! DuckDB database command implementation

use crate::error::{DbError, DbResult};
use crate::files::{ensure_parent_dir, remove_database_files};
use crate::traits::{Database, DatabaseCommand, ScriptExecutor};
use dm_core::config::MEMORY_PATH;
use dm_core::{DatabaseConfig, Version};
use duckdb::Connection;
use std::path::PathBuf;

const SIDE_FILES: &[&str] = &[".wal"];

/// Where the DuckDB database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Memory,
    File(PathBuf),
}

/// DuckDB database command
///
/// The connection is opened on first use and kept until the database is
/// dropped or the command is discarded.
pub struct DuckDbCommand {
    location: Location,
    version_table: String,
    conn: Option<Connection>,
}

impl DuckDbCommand {
    /// Command for an in-memory DuckDB database
    pub fn in_memory(version_table: &str) -> Self {
        Self {
            location: Location::Memory,
            version_table: version_table.to_string(),
            conn: None,
        }
    }

    /// Command for a DuckDB database file
    pub fn from_path(path: impl Into<PathBuf>, version_table: &str) -> Self {
        Self {
            location: Location::File(path.into()),
            version_table: version_table.to_string(),
            conn: None,
        }
    }

    /// Build from config (handles :memory: special case)
    pub fn new(config: &DatabaseConfig) -> Self {
        if config.path == MEMORY_PATH {
            Self::in_memory(&config.version_table)
        } else {
            Self::from_path(&config.path, &config.version_table)
        }
    }

    /// Borrow the connection, opening it if needed.
    pub fn conn(&mut self) -> DbResult<&Connection> {
        if self.conn.is_none() {
            let conn = match &self.location {
                Location::Memory => Connection::open_in_memory(),
                Location::File(path) => Connection::open(path),
            }
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
            log::debug!("Opened DuckDB connection ({:?})", self.location);
            self.conn = Some(conn);
        }
        self.conn
            .as_ref()
            .ok_or_else(|| DbError::ConnectionError("connection unavailable".to_string()))
    }

    fn ledger_exists(&mut self) -> DbResult<bool> {
        let table = self.version_table.clone();
        let count: i64 = self
            .conn()?
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
                duckdb::params![table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(e.to_string()))?;
        Ok(count > 0)
    }
}

impl ScriptExecutor for DuckDbCommand {
    fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.conn()?
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }
}

impl DatabaseCommand for DuckDbCommand {
    fn drop_database(&mut self) -> DbResult<()> {
        // Close before removing the file
        self.conn = None;
        match &self.location {
            Location::Memory => Ok(()),
            Location::File(path) => remove_database_files(path, SIDE_FILES),
        }
    }

    fn create_database(&mut self) -> DbResult<()> {
        if let Location::File(path) = &self.location {
            ensure_parent_dir(path)?;
        }
        self.conn()
            .map_err(|e| DbError::AdminError(format!("create database: {e}")))?;
        Ok(())
    }

    fn create_version(&mut self) -> DbResult<()> {
        let table = self.version_table.clone();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (version BIGINT NOT NULL);
             INSERT INTO {table} SELECT 0 WHERE NOT EXISTS (SELECT 1 FROM {table});"
        );
        self.conn()?
            .execute_batch(&sql)
            .map_err(|e| DbError::LedgerError(format!("failed to create {table}: {e}")))
    }

    fn get_version(&mut self) -> DbResult<Version> {
        if !self.ledger_exists()? {
            return Ok(Version::ZERO);
        }
        let sql = format!(
            "SELECT CAST(COALESCE(MAX(version), 0) AS BIGINT) FROM {}",
            self.version_table
        );
        let raw: i64 = self
            .conn()?
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| DbError::LedgerError(format!("failed to read version: {e}")))?;
        Ok(Version::from_i64(raw)?)
    }

    fn set_version(&mut self, version: Version) -> DbResult<()> {
        let raw = i64::from(version);
        let update = format!("UPDATE {} SET version = ?", self.version_table);
        let insert = format!("INSERT INTO {} (version) VALUES (?)", self.version_table);

        let conn = self.conn()?;
        let updated = conn
            .execute(&update, duckdb::params![raw])
            .map_err(|e| DbError::LedgerError(format!("failed to write version {version}: {e}")))?;
        if updated == 0 {
            conn.execute(&insert, duckdb::params![raw]).map_err(|e| {
                DbError::LedgerError(format!("failed to write version {version}: {e}"))
            })?;
        }
        Ok(())
    }
}

impl Database for DuckDbCommand {
    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
