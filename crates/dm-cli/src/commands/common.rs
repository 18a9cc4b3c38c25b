//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dm_core::{Config, CoreError};
use dm_runner::{Migration, MigrationReport, StopReason};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Configuration resolved from dbmigrate.yml plus CLI overrides.
#[derive(Debug)]
pub(crate) struct ResolvedProject {
    /// Directory relative paths in the config are resolved against
    pub(crate) root: PathBuf,
    /// Config with target and CLI overrides already applied
    pub(crate) config: Config,
}

/// Load dbmigrate.yml and apply `--target`, `--folder`, `--engine`, and
/// `--database-path`.
///
/// Without a config file the project falls back to defaults, but only when
/// `--folder` says where the scripts live.
pub(crate) fn resolve_project(global: &GlobalArgs) -> Result<ResolvedProject> {
    let (root, mut config) = match &global.config {
        Some(path) => {
            let path = Path::new(path);
            let config = Config::load(path)?;
            let root = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            (root, config)
        }
        None => {
            let root = PathBuf::from(&global.project_dir);
            match Config::load_from_dir(&root) {
                Ok(config) => (root, config),
                Err(CoreError::ConfigNotFound { .. }) if global.folder.is_some() => {
                    log::debug!("No dbmigrate.yml in {}, using defaults", root.display());
                    (root, Config::with_name("dbmigrate"))
                }
                Err(e) => return Err(e.into()),
            }
        }
    };

    let target = Config::resolve_target(global.target.as_deref());
    config.database = config.get_database_config(target.as_deref())?;

    if let Some(folder) = &global.folder {
        // CLI paths are relative to the working directory, not the project
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        config.folder = cwd.join(folder).display().to_string();
    }
    if let Some(engine) = global.engine {
        config.database.db_type = engine;
    }
    if let Some(path) = &global.database_path {
        config.database.path = path.clone();
    }
    config.validate()?;

    Ok(ResolvedProject { root, config })
}

/// Build the orchestrator for the resolved project.
pub(crate) fn load_migration(global: &GlobalArgs) -> Result<Migration> {
    let project = resolve_project(global)?;
    let migration = Migration::from_config(&project.config, &project.root, None)
        .with_context(|| format!("Failed to open project '{}'", project.config.name))?;

    if global.verbose {
        println!(
            "Project: {} ({} at {})",
            project.config.name, project.config.database.db_type, project.config.database.path
        );
    }
    Ok(migration)
}

/// Print a one-line summary of a migration run.
pub(crate) fn print_report(report: &MigrationReport) {
    let scripts = report.applied_count();
    println!(
        "Migrated {} from version {} to {} ({} script{}, {}ms)",
        report.direction,
        report.from,
        report.to,
        scripts,
        if scripts == 1 { "" } else { "s" },
        report.duration.as_millis()
    );
    if let StopReason::MissingScript(v) = report.stop {
        if report.is_noop() {
            println!("  No {} script for version {}", report.direction, v.padded());
        }
    }
}
