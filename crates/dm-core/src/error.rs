//! Error types for dm-core

use thiserror::Error;

/// Core error type for dbmigrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Migration folder root is missing or not a directory
    #[error("[C004] Base migrations directory '{path}' not found")]
    FolderNotFound { path: String },

    /// C005: Version does not fit in the zero-padded file name
    #[error("[C005] Version {value} is out of range (maximum is {max})")]
    VersionOutOfRange { value: u64, max: u32 },

    /// C006: Version string could not be parsed
    #[error("[C006] Invalid version '{input}': expected a non-negative integer")]
    InvalidVersion { input: String },

    /// C007: IO error with file path context
    #[error("[C007] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
