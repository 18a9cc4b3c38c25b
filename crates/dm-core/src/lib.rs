//! dm-core - Core library for dbmigrate
//!
//! This crate provides the shared vocabulary used across all dbmigrate
//! components: schema versions and step directions, the script locator for
//! a migration folder, and `dbmigrate.yml` configuration parsing.

pub mod config;
pub mod error;
pub mod layout;
pub mod version;

pub use config::{Config, DatabaseConfig, DbType, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use layout::ScriptLayout;
pub use version::{Direction, Version, VERSION_WIDTH};
