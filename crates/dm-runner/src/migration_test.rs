use super::*;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────────────

/// Observable state behind [`FakeDb`].
#[derive(Debug, Default)]
struct FakeState {
    /// `None` until `create_version` runs
    ledger: Option<Version>,
    /// Ledger value at `BEGIN TRANSACTION`
    snapshot: Option<Option<Version>>,
    /// Every executed SQL text, in order
    executed: Vec<String>,
    /// Admin calls, in order
    admin: Vec<&'static str>,
    /// Scripts containing this marker fail
    fail_marker: Option<String>,
}

/// Recording fake engine.
#[derive(Clone, Default)]
struct FakeDb(Arc<Mutex<FakeState>>);

impl FakeDb {
    fn at(version: u32) -> Self {
        let db = Self::default();
        db.0.lock().unwrap().ledger = Some(v(version));
        db
    }

    fn failing_on(self, marker: &str) -> Self {
        self.0.lock().unwrap().fail_marker = Some(marker.to_string());
        self
    }

    fn executed(&self) -> Vec<String> {
        self.0.lock().unwrap().executed.clone()
    }

    fn admin(&self) -> Vec<&'static str> {
        self.0.lock().unwrap().admin.clone()
    }

    fn ledger(&self) -> Option<Version> {
        self.0.lock().unwrap().ledger
    }
}

impl ScriptExecutor for FakeDb {
    fn execute(&mut self, sql: &str) -> Result<(), DbError> {
        let mut state = self.0.lock().unwrap();
        match sql {
            "BEGIN TRANSACTION" => state.snapshot = Some(state.ledger),
            "COMMIT" => state.snapshot = None,
            "ROLLBACK" => {
                if let Some(previous) = state.snapshot.take() {
                    state.ledger = previous;
                }
            }
            _ => {}
        }
        state.executed.push(sql.to_string());
        match &state.fail_marker {
            Some(marker) if sql.contains(marker.as_str()) => {
                Err(DbError::ExecutionError(format!("boom: {sql}")))
            }
            _ => Ok(()),
        }
    }
}

impl DatabaseCommand for FakeDb {
    fn drop_database(&mut self) -> Result<(), DbError> {
        let mut state = self.0.lock().unwrap();
        state.admin.push("drop");
        state.ledger = None;
        Ok(())
    }

    fn create_database(&mut self) -> Result<(), DbError> {
        self.0.lock().unwrap().admin.push("create");
        Ok(())
    }

    fn create_version(&mut self) -> Result<(), DbError> {
        let mut state = self.0.lock().unwrap();
        state.admin.push("create_version");
        state.ledger.get_or_insert(Version::ZERO);
        Ok(())
    }

    fn get_version(&mut self) -> Result<Version, DbError> {
        Ok(self.0.lock().unwrap().ledger.unwrap_or(Version::ZERO))
    }

    fn set_version(&mut self, version: Version) -> Result<(), DbError> {
        self.0.lock().unwrap().ledger = Some(version);
        Ok(())
    }
}

impl Database for FakeDb {
    fn db_type(&self) -> &'static str {
        "fake"
    }
}

fn v(n: u32) -> Version {
    Version::new(n).unwrap()
}

fn up_sql(n: u32) -> String {
    format!("-- up {n}")
}

fn down_sql(n: u32) -> String {
    format!("-- down {n}")
}

/// Folder with `base.sql` plus the given up/down script versions.
fn folder(up: &[u32], down: &[u32]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let layout = ScriptLayout::create(dir.path()).unwrap();
    fs::write(layout.base_path(), "-- base").unwrap();
    for n in up {
        fs::write(layout.migration_path(v(*n), Direction::Up), up_sql(*n)).unwrap();
    }
    for n in down {
        fs::write(layout.migration_path(v(*n), Direction::Down), down_sql(*n)).unwrap();
    }
    dir
}

fn migration(dir: &TempDir, db: &FakeDb) -> Migration {
    Migration::new(dir.path(), Box::new(db.clone())).unwrap()
}

// ── Construction ───────────────────────────────────────────────────────

#[test]
fn new_fails_for_missing_folder() {
    let dir = tempfile::tempdir().unwrap();
    let result = Migration::new(dir.path().join("missing"), Box::new(FakeDb::default()));
    assert!(matches!(
        result,
        Err(RunnerError::Core(dm_core::CoreError::FolderNotFound { .. }))
    ));
}

#[test]
fn new_does_not_touch_database() {
    let dir = folder(&[1], &[]);
    let db = FakeDb::default();
    let _m = migration(&dir, &db);
    assert!(db.executed().is_empty());
    assert!(db.admin().is_empty());
}

// ── up ─────────────────────────────────────────────────────────────────

#[test]
fn up_applies_scripts_in_increasing_order() {
    let dir = folder(&[1, 2, 3], &[]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db);

    let report = m.up(None).unwrap();

    assert_eq!(db.executed(), vec![up_sql(1), up_sql(2), up_sql(3)]);
    assert_eq!(report.applied, vec![v(1), v(2), v(3)]);
    assert_eq!(report.from, Version::ZERO);
    assert_eq!(report.to, v(3));
    assert_eq!(report.stop, StopReason::MissingScript(v(4)));
    assert_eq!(m.current_version().unwrap(), v(3));
}

#[test]
fn up_to_target_is_inclusive() {
    let dir = folder(&[1, 2, 3, 4], &[]);
    let db = FakeDb::at(1);
    let mut m = migration(&dir, &db);

    let report = m.up(Some(v(3))).unwrap();

    assert_eq!(db.executed(), vec![up_sql(2), up_sql(3)]);
    assert_eq!(report.stop, StopReason::TargetReached);
    assert_eq!(db.ledger(), Some(v(3)));
}

#[test]
fn up_at_target_is_noop() {
    let dir = folder(&[1, 2, 3], &[]);
    let db = FakeDb::at(2);
    let mut m = migration(&dir, &db);

    let report = m.up(Some(v(2))).unwrap();

    assert!(report.is_noop());
    assert!(db.executed().is_empty());
    assert_eq!(db.ledger(), Some(v(2)));
}

#[test]
fn up_below_current_is_noop() {
    let dir = folder(&[1, 2, 3], &[1, 2]);
    let db = FakeDb::at(3);
    let mut m = migration(&dir, &db);

    let report = m.up(Some(v(1))).unwrap();

    assert!(report.is_noop());
    assert_eq!(report.stop, StopReason::TargetReached);
    assert_eq!(db.ledger(), Some(v(3)));
}

#[test]
fn up_stops_at_first_gap() {
    let dir = folder(&[1, 2, 4, 5], &[]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db);

    let report = m.up(None).unwrap();

    assert_eq!(report.to, v(2));
    assert_eq!(report.stop, StopReason::MissingScript(v(3)));
    assert_eq!(db.executed(), vec![up_sql(1), up_sql(2)]);
}

#[test]
fn up_short_of_target_is_silent_by_default() {
    let dir = folder(&[1, 2], &[]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db);

    let report = m.up(Some(v(5))).unwrap();

    assert_eq!(report.to, v(2));
    assert_eq!(report.stop, StopReason::MissingScript(v(3)));
}

#[test]
fn up_short_of_target_fails_in_strict_mode() {
    let dir = folder(&[1, 2], &[]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db).with_options(MigrationOptions {
        strict: true,
        ..MigrationOptions::default()
    });

    let err = m.up(Some(v(5))).unwrap_err();

    match err {
        RunnerError::TargetNotReached {
            target, reached, ..
        } => {
            assert_eq!(target, v(5));
            assert_eq!(reached, v(2));
        }
        other => panic!("unexpected error: {other}"),
    }
    // Applied scripts stay applied
    assert_eq!(db.ledger(), Some(v(2)));
}

#[test]
fn strict_mode_allows_open_ended_up() {
    let dir = folder(&[1], &[]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db).with_options(MigrationOptions {
        strict: true,
        ..MigrationOptions::default()
    });

    assert_eq!(m.up(None).unwrap().to, v(1));
}

#[test]
fn up_from_max_version_ends_range() {
    let dir = folder(&[], &[]);
    let db = FakeDb::at(99_999);
    let mut m = migration(&dir, &db);

    let report = m.up(None).unwrap();

    assert!(report.is_noop());
    assert_eq!(report.stop, StopReason::EndOfRange);
}

#[test]
fn up_to_max_version_applies_last_script() {
    let dir = folder(&[99_999], &[]);
    let db = FakeDb::at(99_998);
    let mut m = migration(&dir, &db);

    let report = m.up(Some(Version::MAX)).unwrap();

    assert_eq!(report.applied, vec![Version::MAX]);
    assert_eq!(report.stop, StopReason::TargetReached);
}

// ── Failure handling ───────────────────────────────────────────────────

#[test]
fn failing_script_keeps_last_good_version() {
    let dir = folder(&[1, 2, 3], &[]);
    let db = FakeDb::default().failing_on(&up_sql(2));
    let mut m = migration(&dir, &db);

    let err = m.up(None).unwrap_err();

    match err {
        RunnerError::ScriptFailed {
            version, source, ..
        } => {
            assert_eq!(version, v(2));
            assert!(matches!(source, DbError::ExecutionError(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(db.ledger(), Some(v(1)));
    // Script 3 never ran
    assert_eq!(db.executed(), vec![up_sql(1), up_sql(2)]);
}

#[test]
fn transactional_apply_wraps_each_script() {
    let dir = folder(&[1, 2], &[]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db).with_options(MigrationOptions {
        transactional: true,
        ..MigrationOptions::default()
    });

    m.up(None).unwrap();

    assert_eq!(
        db.executed(),
        vec![
            "BEGIN TRANSACTION".to_string(),
            up_sql(1),
            "COMMIT".to_string(),
            "BEGIN TRANSACTION".to_string(),
            up_sql(2),
            "COMMIT".to_string(),
        ]
    );
}

#[test]
fn transactional_failure_rolls_back() {
    let dir = folder(&[1, 2], &[]);
    let db = FakeDb::at(0).failing_on(&up_sql(2));
    let mut m = migration(&dir, &db).with_options(MigrationOptions {
        transactional: true,
        ..MigrationOptions::default()
    });

    assert!(m.up(None).is_err());
    assert_eq!(db.executed().last().map(String::as_str), Some("ROLLBACK"));
    assert_eq!(db.ledger(), Some(v(1)));
}

// ── down ───────────────────────────────────────────────────────────────

#[test]
fn down_applies_scripts_in_decreasing_order() {
    let dir = folder(&[1, 2, 3, 4], &[1, 2, 3]);
    let db = FakeDb::at(4);
    let mut m = migration(&dir, &db);

    let report = m.down(v(1)).unwrap();

    assert_eq!(db.executed(), vec![down_sql(3), down_sql(2), down_sql(1)]);
    assert_eq!(report.direction, Direction::Down);
    assert_eq!(report.to, v(1));
    assert_eq!(report.stop, StopReason::TargetReached);
    assert_eq!(db.ledger(), Some(v(1)));
}

#[test]
fn down_to_zero_uses_script_zero() {
    let dir = folder(&[1, 2], &[0, 1]);
    let db = FakeDb::at(2);
    let mut m = migration(&dir, &db);

    let report = m.down(Version::ZERO).unwrap();

    assert_eq!(db.executed(), vec![down_sql(1), down_sql(0)]);
    assert_eq!(report.to, Version::ZERO);
    assert_eq!(report.stop, StopReason::TargetReached);
}

#[test]
fn down_from_zero_is_noop() {
    let dir = folder(&[], &[0]);
    let db = FakeDb::default();
    let mut m = migration(&dir, &db);

    let report = m.down(Version::ZERO).unwrap();

    assert!(report.is_noop());
    assert!(db.executed().is_empty());
}

#[test]
fn down_above_current_is_noop() {
    let dir = folder(&[1, 2], &[0, 1]);
    let db = FakeDb::at(1);
    let mut m = migration(&dir, &db);

    let report = m.down(v(5)).unwrap();

    assert!(report.is_noop());
    assert_eq!(db.ledger(), Some(v(1)));
}

#[test]
fn down_stops_at_missing_script() {
    let dir = folder(&[], &[1, 3]);
    let db = FakeDb::at(4);
    let mut m = migration(&dir, &db);

    let report = m.down(v(1)).unwrap();

    assert_eq!(report.to, v(3));
    assert_eq!(report.stop, StopReason::MissingScript(v(2)));
}

// ── reset / update / status ────────────────────────────────────────────

#[test]
fn reset_rebuilds_then_migrates() {
    let dir = folder(&[1, 2, 3], &[]);
    let db = FakeDb::at(7);
    let mut m = migration(&dir, &db);

    let report = m.reset(Some(v(2))).unwrap();

    assert_eq!(db.admin(), vec!["drop", "create", "create_version"]);
    assert_eq!(
        db.executed(),
        vec!["-- base".to_string(), up_sql(1), up_sql(2)]
    );
    assert_eq!(report.from, Version::ZERO);
    assert_eq!(m.current_version().unwrap(), v(2));
}

#[test]
fn reset_without_base_script_fails() {
    let dir = folder(&[1], &[]);
    fs::remove_file(dir.path().join("base.sql")).unwrap();
    let db = FakeDb::default();
    let mut m = migration(&dir, &db);

    assert!(matches!(
        m.reset(None),
        Err(RunnerError::ScriptRead { .. })
    ));
    assert_eq!(db.admin(), vec!["drop", "create"]);
}

#[test]
fn reset_propagates_base_script_failure() {
    let dir = folder(&[1], &[]);
    let db = FakeDb::default().failing_on("-- base");
    let mut m = migration(&dir, &db);

    assert!(matches!(
        m.reset(None),
        Err(RunnerError::Db(DbError::ExecutionError(_)))
    ));
    assert!(!db.admin().contains(&"create_version"));
}

#[test]
fn update_picks_direction() {
    let dir = folder(&[1, 2, 3], &[0, 1, 2]);
    let db = FakeDb::at(1);
    let mut m = migration(&dir, &db);

    let report = m.update(Some(v(3))).unwrap();
    assert_eq!(report.direction, Direction::Up);
    assert_eq!(report.to, v(3));

    let report = m.update(Some(v(1))).unwrap();
    assert_eq!(report.direction, Direction::Down);
    assert_eq!(report.to, v(1));

    let report = m.update(None).unwrap();
    assert_eq!(report.direction, Direction::Up);
    assert_eq!(report.to, v(3));
}

#[test]
fn status_lists_pending_and_unreachable() {
    let dir = folder(&[1, 2, 3, 5], &[]);
    let db = FakeDb::at(1);
    let mut m = migration(&dir, &db);

    let status = m.status().unwrap();

    assert_eq!(status.current, v(1));
    assert_eq!(status.pending, vec![v(2), v(3)]);
    assert_eq!(status.available, vec![v(1), v(2), v(3), v(5)]);
    assert_eq!(status.latest_reachable(), v(3));
    assert_eq!(status.unreachable(), vec![v(5)]);
    assert!(db.executed().is_empty());
}
