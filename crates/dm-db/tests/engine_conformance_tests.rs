//! Every engine must honour the same DatabaseCommand contract.

use dm_core::{DatabaseConfig, DbType, Version};
use dm_db::{connect, Database, DatabaseCommand, DbError, ScriptExecutor};
use std::path::Path;

const ENGINES: [DbType; 2] = [DbType::DuckDb, DbType::Sqlite];

fn file_db(db_type: DbType, path: &Path) -> Box<dyn Database> {
    connect(&DatabaseConfig {
        db_type,
        path: path.display().to_string(),
        ..DatabaseConfig::default()
    })
    .unwrap()
}

fn v(n: u32) -> Version {
    Version::new(n).unwrap()
}

#[test]
fn fresh_database_reports_version_zero() {
    for engine in ENGINES {
        let dir = tempfile::tempdir().unwrap();
        let mut db = file_db(engine, &dir.path().join("fresh.db"));
        assert_eq!(db.get_version().unwrap(), Version::ZERO, "{engine}");
    }
}

#[test]
fn drop_absent_database_is_noop() {
    for engine in ENGINES {
        let dir = tempfile::tempdir().unwrap();
        let mut db = file_db(engine, &dir.path().join("never-created.db"));
        db.drop_database().unwrap();
    }
}

#[test]
fn drop_and_create_clears_schema_and_ledger() {
    for engine in ENGINES {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target.db");
        let mut db = file_db(engine, &path);

        db.create_database().unwrap();
        db.execute("CREATE TABLE widgets (id INTEGER);").unwrap();
        db.create_version().unwrap();
        db.set_version(v(5)).unwrap();

        db.drop_database().unwrap();
        assert!(!path.exists(), "{engine}: file survived drop");

        db.create_database().unwrap();
        assert_eq!(db.get_version().unwrap(), Version::ZERO, "{engine}");
        // The table is gone with the old file
        assert!(db.execute("INSERT INTO widgets VALUES (1);").is_err());
    }
}

#[test]
fn ledger_persists_across_instances() {
    for engine in ENGINES {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        {
            let mut db = file_db(engine, &path);
            db.create_database().unwrap();
            db.create_version().unwrap();
            db.set_version(v(12)).unwrap();
        }
        let mut db = file_db(engine, &path);
        assert_eq!(db.get_version().unwrap(), v(12), "{engine}");
    }
}

#[test]
fn failing_script_reports_execution_error() {
    for engine in ENGINES {
        let mut db = connect(&DatabaseConfig {
            db_type: engine,
            ..DatabaseConfig::default()
        })
        .unwrap();
        let err = db.execute("CREATE TABLE broken (").unwrap_err();
        assert!(matches!(err, DbError::ExecutionError(_)), "{engine}: {err}");
        assert!(err.to_string().starts_with("[D002]"));
    }
}

#[test]
fn transaction_statements_are_plain_scripts() {
    for engine in ENGINES {
        let mut db = connect(&DatabaseConfig {
            db_type: engine,
            ..DatabaseConfig::default()
        })
        .unwrap();
        db.create_version().unwrap();

        db.execute("BEGIN TRANSACTION").unwrap();
        db.set_version(v(3)).unwrap();
        db.execute("ROLLBACK").unwrap();

        assert_eq!(db.get_version().unwrap(), Version::ZERO, "{engine}");
    }
}
