//! Reset command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, ResetArgs};
use crate::commands::common::{load_migration, print_report};

/// Execute the reset command
pub(crate) fn execute(args: &ResetArgs, global: &GlobalArgs) -> Result<()> {
    let mut migration = load_migration(global)?;

    println!("Resetting {} database", migration.db_type());
    let report = migration
        .reset(args.up_to)
        .context("Reset failed; the database may be partially rebuilt")?;

    print_report(&report);
    Ok(())
}
