//! dm-runner - Migration orchestrator for dbmigrate
//!
//! Moves a database between schema versions by applying the numbered
//! scripts of a migration folder and recording each completed step in the
//! engine's version ledger.

pub mod error;
pub mod migration;
pub mod report;

pub use error::{RunnerError, RunnerResult};
pub use migration::{Migration, MigrationOptions};
pub use report::{MigrationReport, MigrationStatus, StopReason};
