//! # Store Integrity Integration Tests / 存储完整性集成测试
//!
//! Tampers with the database file through a second raw connection to check
//! that core operations stay all-or-nothing and report missing rows.
//!
//! 通过第二个原始连接修改数据库文件，检查核心操作保持原子性并报告缺失的记录。

mod common;

use casebook::core::catalog;
use casebook::core::error::{Entity, Error};
use casebook::core::planner::start_run;
use casebook::Store;
use common::{add_case, add_environment, add_step};
use rusqlite::Connection;
use std::path::Path;
use tempfile::tempdir;

fn seed(db: &Path) -> (Store, i64) {
    let store = Store::open(db).unwrap();
    let case = add_case(&store, "Login");
    add_step(&store, case.id, "Open page", None);
    add_step(&store, case.id, "Submit", None);
    let env_id = add_environment(&store, "Staging", &[]).id;
    (store, env_id)
}

#[test]
fn test_start_run_rolls_back_when_step_insert_fails() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("casebook.db");
    let (mut store, env_id) = seed(&db);

    let raw = Connection::open(&db).unwrap();
    raw.execute_batch(
        "CREATE TRIGGER reject_run_steps BEFORE INSERT ON test_run_steps
         BEGIN SELECT RAISE(ABORT, 'run steps rejected'); END;",
    )
    .unwrap();

    let err = start_run(&mut store, env_id, Some("doomed")).unwrap_err();
    assert!(matches!(err, Error::Storage(_)));

    // The run row inserted before the failure is gone too.
    assert!(catalog::list_runs(&store).unwrap().is_empty());
    let runs: i64 = raw
        .query_row("SELECT COUNT(*) FROM test_runs", [], |row| row.get(0))
        .unwrap();
    assert_eq!(runs, 0);
}

#[test]
fn test_list_runs_reports_missing_environment() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("casebook.db");
    let (mut store, env_id) = seed(&db);
    start_run(&mut store, env_id, None).unwrap();

    // Foreign keys are off by default on a fresh connection.
    let raw = Connection::open(&db).unwrap();
    raw.execute("DELETE FROM environments WHERE id = ?1", [env_id])
        .unwrap();

    let err = catalog::list_runs(&store).unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: Entity::Environment, id } if id == env_id));
}
