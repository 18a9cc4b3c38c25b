//! Down command implementation

use anyhow::Result;

use crate::cli::{DownArgs, GlobalArgs};
use crate::commands::common::{load_migration, print_report};

/// Execute the down command
pub(crate) fn execute(args: &DownArgs, global: &GlobalArgs) -> Result<()> {
    let mut migration = load_migration(global)?;
    let report = migration.down(args.version)?;
    print_report(&report);
    Ok(())
}
