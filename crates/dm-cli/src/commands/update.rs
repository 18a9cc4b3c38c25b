//! Update command implementation - migrate in whichever direction reaches the target

use anyhow::Result;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{load_migration, print_report};

/// Execute the update command
pub(crate) fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let mut migration = load_migration(global)?;
    let report = migration.update(args.up_to)?;
    print_report(&report);
    Ok(())
}
