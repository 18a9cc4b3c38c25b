//! Version command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::load_migration;

/// Execute the version command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let mut migration = load_migration(global)?;
    println!("{}", migration.current_version()?);
    Ok(())
}
