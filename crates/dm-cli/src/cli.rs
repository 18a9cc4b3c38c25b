//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use dm_core::{DbType, Version};

/// dbmigrate - versioned SQL schema migrations
#[derive(Parser, Debug)]
#[command(name = "dbmigrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Named target from dbmigrate.yml (or DBMIGRATE_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the migration folder root
    #[arg(short, long, global = true)]
    pub folder: Option<String>,

    /// Override the database engine (duckdb, sqlite)
    #[arg(long, global = true)]
    pub engine: Option<DbType>,

    /// Override the database file path (or :memory:)
    #[arg(long, global = true)]
    pub database_path: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a migration folder and dbmigrate.yml
    Init(InitArgs),

    /// Create the next empty up/down script pair
    New(NewArgs),

    /// Drop and recreate the database, run base.sql, then migrate up
    Reset(ResetArgs),

    /// Apply up scripts from the current version
    Up(UpArgs),

    /// Apply down scripts to a target version
    Down(DownArgs),

    /// Migrate up or down toward a version
    Update(UpArgs),

    /// Print the current database version
    Version,

    /// Show current version and pending scripts
    Status,
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scaffold
    #[arg(default_value = ".")]
    pub path: String,

    /// Project name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Optional description written into the script headers
    #[arg(short, long)]
    pub message: Option<String>,
}

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Stop after this version (default: latest)
    #[arg(short, long)]
    pub up_to: Option<Version>,
}

/// Arguments for the up and update commands
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Stop after this version (default: latest)
    #[arg(short, long)]
    pub up_to: Option<Version>,
}

/// Arguments for the down command
#[derive(Args, Debug)]
pub struct DownArgs {
    /// Version to revert to (required)
    pub version: Version,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
