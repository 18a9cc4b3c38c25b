//! Status command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::load_migration;

/// Execute the status command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let mut migration = load_migration(global)?;
    let status = migration.status()?;

    println!("Folder:          {}", migration.layout().root().display());
    println!("Current version: {}", status.current);
    println!("Latest version:  {}", status.latest_reachable());

    if status.pending.is_empty() {
        println!("\nUp to date.");
    } else {
        println!("\nPending up scripts:");
        for version in &status.pending {
            println!("  {}.sql", version.padded());
        }
    }

    let unreachable = status.unreachable();
    if !unreachable.is_empty() {
        println!("\nUnreachable (gap in numbering):");
        for version in &unreachable {
            println!("  {}.sql", version.padded());
        }
    }
    Ok(())
}
