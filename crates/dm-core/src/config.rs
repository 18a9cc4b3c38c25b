//! Configuration types and parsing for dbmigrate.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// In-memory database marker accepted by every engine.
pub const MEMORY_PATH: &str = ":memory:";

/// Environment variable consulted when no `--target` flag is given.
pub const TARGET_ENV_VAR: &str = "DBMIGRATE_TARGET";

const CONFIG_FILE_NAMES: [&str; 2] = ["dbmigrate.yml", "dbmigrate.yaml"];

/// Main project configuration from dbmigrate.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Migration folder root, relative to the config file's directory
    #[serde(default = "default_folder")]
    pub folder: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Wrap each script and its version write in a transaction
    #[serde(default)]
    pub transactional: bool,

    /// Fail when an explicit target cannot be reached because a script is missing
    #[serde(default)]
    pub strict: bool,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Database engine selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// SQLite
    Sqlite,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for DbType {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(DbType::DuckDb),
            "sqlite" | "sqlite3" => Ok(DbType::Sqlite),
            other => Err(CoreError::ConfigInvalid {
                message: format!("Unknown database type '{other}'. Expected duckdb or sqlite"),
            }),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (duckdb or sqlite)
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Table holding the current schema version
    #[serde(default = "default_version_table")]
    pub version_table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
            version_table: default_version_table(),
        }
    }
}

impl DatabaseConfig {
    /// True for `:memory:` targets.
    pub fn is_memory(&self) -> bool {
        self.path == MEMORY_PATH
    }

    /// Resolve a relative file path against `root`. In-memory and absolute
    /// paths are returned unchanged.
    pub fn resolved_against(&self, root: &Path) -> DatabaseConfig {
        let mut resolved = self.clone();
        if !self.is_memory() && Path::new(&self.path).is_relative() {
            resolved.path = root.join(&self.path).display().to_string();
        }
        resolved
    }

    fn validate(&self) -> CoreResult<()> {
        if self.path.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path cannot be empty".to_string(),
            });
        }
        if !is_plain_identifier(&self.version_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "database.version_table '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                    self.version_table
                ),
            });
        }
        Ok(())
    }
}

fn default_folder() -> String {
    ".".to_string()
}

fn default_db_path() -> String {
    MEMORY_PATH.to_string()
}

fn default_version_table() -> String {
    "migration_version".to_string()
}

/// True when `name` can be interpolated into SQL without quoting.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Config {
    /// Minimal configuration for a project name with every other field defaulted.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: default_folder(),
            database: DatabaseConfig::default(),
            transactional: false,
            strict: false,
            targets: HashMap::new(),
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for dbmigrate.yml or dbmigrate.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = dir.join(name);
            if path.exists() {
                return Self::load(&path);
            }
        }
        Err(CoreError::ConfigNotFound {
            path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        self.database.validate()?;
        for (name, target) in &self.targets {
            if let Some(db) = &target.database {
                db.validate().map_err(|e| CoreError::ConfigInvalid {
                    message: format!("target '{name}': {e}"),
                })?;
            }
        }
        Ok(())
    }

    /// Get absolute folder root relative to a project root
    pub fn folder_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.folder)
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get database configuration, optionally applying target overrides
    ///
    /// If target is specified and exists, uses target's database config.
    /// Otherwise, uses the base database config.
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve target from CLI flag or DBMIGRATE_TARGET environment variable
    ///
    /// Priority: CLI flag > DBMIGRATE_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
