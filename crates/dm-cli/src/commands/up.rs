//! Up command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common::{load_migration, print_report};

/// Execute the up command
pub(crate) fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let mut migration = load_migration(global)?;
    let report = migration.up(args.up_to)?;
    print_report(&report);
    Ok(())
}
