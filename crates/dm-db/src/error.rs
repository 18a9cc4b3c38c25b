//! Error types for dm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Script execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Create/drop database failure (D003)
    #[error("[D003] Database administration failed: {0}")]
    AdminError(String),

    /// Version ledger read/write failure (D004)
    #[error("[D004] Version ledger error: {0}")]
    LedgerError(String),

    /// Ledger holds a value that is not a valid version (D005)
    #[error("[D005] Version ledger holds an invalid version: {0}")]
    InvalidVersion(#[from] dm_core::CoreError),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
