//! dm-db - Database command layer for dbmigrate
//!
//! This crate provides the `DatabaseCommand` and `ScriptExecutor` traits the
//! migration runner depends on, with DuckDB and SQLite implementations and a
//! registry that picks one by engine type.

pub mod duckdb;
pub mod error;
mod files;
pub mod registry;
pub mod sqlite;
pub mod traits;

pub use duckdb::DuckDbCommand;
pub use error::{DbError, DbResult};
pub use registry::connect;
pub use sqlite::SqliteCommand;
pub use traits::{Database, DatabaseCommand, ScriptExecutor};
