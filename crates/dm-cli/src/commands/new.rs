//! New command implementation - creates the next up/down script pair

use anyhow::{Context, Result};
use dm_core::{Direction, ScriptLayout, Version};
use std::fs;

use crate::cli::{GlobalArgs, NewArgs};
use crate::commands::common::resolve_project;

/// Execute the new command
pub(crate) fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let project = resolve_project(global)?;
    let layout = ScriptLayout::open(project.config.folder_absolute(&project.root))?;

    let next = next_version(&layout)?;
    // down/N reverts version N + 1 back to N
    let previous = next
        .step(Direction::Down)
        .context("Version 0 has no script pair")?;

    let up_path = layout.migration_path(next, Direction::Up);
    let down_path = layout.migration_path(previous, Direction::Down);
    for path in [&up_path, &down_path] {
        if path.exists() {
            anyhow::bail!("'{}' already exists", path.display());
        }
    }

    let note = args
        .message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default();
    fs::write(
        &up_path,
        format!("-- Upgrade version {previous} to {next}{note}\n"),
    )
    .with_context(|| format!("Failed to write {}", up_path.display()))?;
    fs::write(
        &down_path,
        format!("-- Revert version {next} to {previous}{note}\n"),
    )
    .with_context(|| format!("Failed to write {}", down_path.display()))?;

    println!("Created {}", up_path.display());
    println!("Created {}", down_path.display());
    Ok(())
}

/// One past the highest version any existing script pair covers.
fn next_version(layout: &ScriptLayout) -> Result<Version> {
    let from_up = layout
        .list_versions(Direction::Up)?
        .last()
        .map(|v| v.get())
        .unwrap_or(0);
    let from_down = layout
        .list_versions(Direction::Down)?
        .last()
        .map(|v| v.get() + 1)
        .unwrap_or(0);

    Ok(Version::new(from_up.max(from_down) + 1)?)
}
