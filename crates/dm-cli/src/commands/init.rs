//! Init command implementation - scaffolds a migration folder

use anyhow::{Context, Result};
use dm_core::ScriptLayout;
use std::fs;
use std::path::Path;

use crate::cli::InitArgs;

const BASE_SQL: &str = "-- Base schema: the empty starting state applied by `dbmigrate reset`.\n";

/// Execute the init command
pub(crate) fn execute(args: &InitArgs) -> Result<()> {
    let project_dir = Path::new(&args.path);
    let config_path = project_dir.join("dbmigrate.yml");

    if config_path.exists() {
        anyhow::bail!(
            "'{}' already exists. Refusing to overwrite.",
            config_path.display()
        );
    }

    let name = match &args.name {
        Some(name) => name.clone(),
        None => project_name(project_dir)?,
    };
    if name.trim().is_empty() {
        anyhow::bail!("Project name cannot be empty; pass --name");
    }

    println!("Creating dbmigrate project: {}\n", name);

    let layout = ScriptLayout::create(project_dir)?;

    // Escape YAML special characters in interpolated values
    let safe_name = name.replace('"', "\\\"");
    let config_content = format!(
        r#"name: "{safe_name}"
folder: "."

database:
  type: duckdb
  path: "{safe_name}.duckdb"
  version_table: migration_version

# Wrap each script and its version write in a transaction
transactional: false

# Fail when an explicit target is missing a script instead of stopping short
strict: false

# targets:
#   ci:
#     database:
#       type: sqlite
#       path: ":memory:"
"#
    );
    fs::write(&config_path, config_content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("  Created {}", config_path.display());

    let base = layout.base_path();
    if !base.exists() {
        fs::write(&base, BASE_SQL)
            .with_context(|| format!("Failed to write {}", base.display()))?;
        println!("  Created {}", base.display());
    }

    println!("\nNext: add scripts with `dbmigrate new`, then run `dbmigrate reset`.");
    Ok(())
}

/// Default project name: the directory's final component.
fn project_name(dir: &Path) -> Result<String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to read current directory")?
            .join(dir)
    };
    let name = absolute
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .last()
        .unwrap_or("dbmigrate");
    Ok(name.to_string())
}
