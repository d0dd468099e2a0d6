//! Concurrent writers on a shared database file.

mod common;

use casebook::core::cursor::{record, view, StepView};
use casebook::core::planner::start_run;
use casebook::models::StepStatus;
use casebook::Store;
use common::{add_case, add_environment, add_step};
use std::thread;
use tempfile::tempdir;

#[test]
fn test_concurrent_starts_produce_independent_runs() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("casebook.db");
    let env_id = {
        let store = Store::open(&db).unwrap();
        let case = add_case(&store, "Shared");
        add_step(&store, case.id, "one", None);
        add_step(&store, case.id, "two", None);
        add_environment(&store, "Dev", &[]).id
    };

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            thread::spawn(move || {
                let mut store = Store::open(&db).unwrap();
                start_run(&mut store, env_id, None).unwrap().id
            })
        })
        .collect();
    let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);

    let store = Store::open(&db).unwrap();
    for id in ids {
        assert_eq!(store.repo().count_run_steps(id).unwrap(), 2);
    }
}

#[test]
fn test_last_write_wins_across_connections() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("casebook.db");
    let mut first = Store::open(&db).unwrap();
    let case = add_case(&first, "Shared");
    add_step(&first, case.id, "only", None);
    let env = add_environment(&first, "Dev", &[]);
    let run = start_run(&mut first, env.id, None).unwrap();

    let mut second = Store::open(&db).unwrap();
    record(&mut first, run.id, 0, StepStatus::Pass, Some("tester a")).unwrap();
    record(&mut second, run.id, 0, StepStatus::Fail, Some("tester b")).unwrap();

    match view(&first, run.id, 0).unwrap() {
        StepView::InProgress(frame) => {
            assert_eq!(frame.run_step.status, Some(StepStatus::Fail));
            assert_eq!(frame.run_step.notes.as_deref(), Some("tester b"));
        }
        StepView::Complete { .. } => panic!("Expected InProgress view"),
    }
}
