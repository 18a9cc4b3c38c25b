//! Filesystem helpers shared by file-backed engines.

use crate::error::{DbError, DbResult};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// `path` with `suffix` appended to the full file name, e.g.
/// `app.duckdb` + `.wal` = `app.duckdb.wal`.
pub(crate) fn side_file(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Remove a database file and its engine side files. Missing files are skipped.
pub(crate) fn remove_database_files(path: &Path, side_suffixes: &[&str]) -> DbResult<()> {
    let candidates = std::iter::once(path.to_path_buf())
        .chain(side_suffixes.iter().map(|s| side_file(path, s)));

    for file in candidates {
        match fs::remove_file(&file) {
            Ok(()) => log::debug!("Removed {}", file.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(DbError::AdminError(format!(
                    "failed to remove {}: {e}",
                    file.display()
                )))
            }
        }
    }
    Ok(())
}

/// Create the directory that will hold a database file.
pub(crate) fn ensure_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| {
                DbError::AdminError(format!("failed to create {}: {e}", parent.display()))
            })
        }
        _ => Ok(()),
    }
}
