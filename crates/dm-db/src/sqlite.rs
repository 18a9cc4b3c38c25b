//! SQLite database command implementation

use crate::error::{DbError, DbResult};
use crate::files::{ensure_parent_dir, remove_database_files};
use crate::traits::{Database, DatabaseCommand, ScriptExecutor};
use dm_core::config::MEMORY_PATH;
use dm_core::{DatabaseConfig, Version};
use rusqlite::Connection;
use std::path::PathBuf;

const SIDE_FILES: &[&str] = &["-wal", "-shm", "-journal"];

/// SQLite database command
///
/// Mirrors [`crate::DuckDbCommand`]: lazily opened, single owner.
pub struct SqliteCommand {
    path: Option<PathBuf>,
    version_table: String,
    conn: Option<Connection>,
}

impl SqliteCommand {
    /// Command for an in-memory SQLite database
    pub fn in_memory(version_table: &str) -> Self {
        Self {
            path: None,
            version_table: version_table.to_string(),
            conn: None,
        }
    }

    /// Command for a SQLite database file
    pub fn from_path(path: impl Into<PathBuf>, version_table: &str) -> Self {
        Self {
            path: Some(path.into()),
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
            let conn = match &self.path {
                None => Connection::open_in_memory(),
                Some(path) => Connection::open(path),
            }
            .map_err(|e| DbError::ConnectionError(e.to_string()))?;
            log::debug!("Opened SQLite connection ({:?})", self.path);
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
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                rusqlite::params![table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(e.to_string()))?;
        Ok(count > 0)
    }
}

impl ScriptExecutor for SqliteCommand {
    fn execute(&mut self, sql: &str) -> DbResult<()> {
        self.conn()?
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }
}

impl DatabaseCommand for SqliteCommand {
    fn drop_database(&mut self) -> DbResult<()> {
        self.conn = None;
        match &self.path {
            None => Ok(()),
            Some(path) => remove_database_files(path, SIDE_FILES),
        }
    }

    fn create_database(&mut self) -> DbResult<()> {
        if let Some(path) = &self.path {
            ensure_parent_dir(path)?;
        }
        self.conn()
            .map_err(|e| DbError::AdminError(format!("create database: {e}")))?;
        Ok(())
    }

    fn create_version(&mut self) -> DbResult<()> {
        let table = self.version_table.clone();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (version INTEGER NOT NULL);
             INSERT INTO {table} (version) SELECT 0 WHERE NOT EXISTS (SELECT 1 FROM {table});"
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
            "SELECT COALESCE(MAX(version), 0) FROM {}",
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
        let update = format!("UPDATE {} SET version = ?1", self.version_table);
        let insert = format!("INSERT INTO {} (version) VALUES (?1)", self.version_table);

        let conn = self.conn()?;
        let updated = conn
            .execute(&update, rusqlite::params![raw])
            .map_err(|e| DbError::LedgerError(format!("failed to write version {version}: {e}")))?;
        if updated == 0 {
            conn.execute(&insert, rusqlite::params![raw]).map_err(|e| {
                DbError::LedgerError(format!("failed to write version {version}: {e}"))
            })?;
        }
        Ok(())
    }
}

impl Database for SqliteCommand {
    fn db_type(&self) -> &'static str {
        "sqlite"
    }
}
