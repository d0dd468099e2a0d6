//! # SQLite Store Module / SQLite 存储模块
//!
//! The data-access layer for casebook. A [`Store`] owns one SQLite
//! connection; every operation receives the store explicitly, so tests open
//! their own in-memory instance and nothing is shared process-wide.
//!
//! [`Repo`] exposes one method per query. It borrows either the plain
//! connection ([`Store::repo`]) or an open transaction
//! ([`Store::in_transaction`]), so the same queries serve both paths.
//!
//! # Tables
//!
//! - `test_cases`, `test_steps`: the catalog
//! - `environments`, `environment_variables`: run contexts
//! - `test_runs`, `test_run_steps`: runs and their snapshot rows
//!
//! `test_run_steps` keeps `testcase_id`/`teststep_id` without foreign keys:
//! deleting catalog entries must leave materialized runs untouched.
//!
//! 此模块是 casebook 的数据访问层。

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior, params};
use tracing::{debug, info};

use crate::core::error::{Error, Result};
use crate::core::models::{
    Environment, EnvironmentVariable, NewCase, NewEnvironment, NewStep, NewVariable, StepStatus,
    TestCase, TestRun, TestRunStep, TestStep,
};

/// How long a writer waits for a lock held by another connection.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Current schema version, tracked through `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Schema initialization SQL. Idempotent.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS test_cases (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS test_steps (
    id INTEGER PRIMARY KEY,
    testcase_id INTEGER NOT NULL REFERENCES test_cases(id),
    step_text TEXT NOT NULL,
    expected_result TEXT NOT NULL,
    slug TEXT
);

CREATE INDEX IF NOT EXISTS idx_test_steps_case ON test_steps(testcase_id, id);

CREATE TABLE IF NOT EXISTS environments (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    url TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS environment_variables (
    id INTEGER PRIMARY KEY,
    environment_id INTEGER NOT NULL REFERENCES environments(id),
    name TEXT NOT NULL,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_env_vars_env ON environment_variables(environment_id, id);

CREATE TABLE IF NOT EXISTS test_runs (
    id INTEGER PRIMARY KEY,
    started_at TEXT NOT NULL,
    notes TEXT,
    environment_id INTEGER NOT NULL REFERENCES environments(id)
);

-- testcase_id / teststep_id are snapshot references, intentionally unconstrained
CREATE TABLE IF NOT EXISTS test_run_steps (
    id INTEGER PRIMARY KEY,
    testrun_id INTEGER NOT NULL REFERENCES test_runs(id),
    position INTEGER NOT NULL,
    testcase_id INTEGER NOT NULL,
    teststep_id INTEGER NOT NULL,
    status TEXT,
    notes TEXT,
    UNIQUE(testrun_id, position)
);
"#;

/// Owner of the SQLite connection. / SQLite 连接的所有者。
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        info!(target: "casebook::store", path = %path.display(), "Opened database");
        Self::init(conn)
    }

    /// Opens a private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(Error::Corrupt(format!(
                "database schema version {version} is newer than supported version {SCHEMA_VERSION}"
            )));
        }
        if version < SCHEMA_VERSION {
            conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            debug!(target: "casebook::store", from = version, to = SCHEMA_VERSION, "Schema version updated");
        }
        Ok(Self { conn })
    }

    /// Query access outside of an explicit transaction.
    pub fn repo(&self) -> Repo<'_> {
        Repo { conn: &self.conn }
    }

    /// Runs `f` inside a transaction. The transaction commits only when `f`
    /// returns `Ok`; on error it is rolled back when dropped.
    ///
    /// The write lock is taken up front, so two connections never both read
    /// and then race to upgrade.
    ///
    /// 在事务中运行 `f`，仅当 `f` 返回 `Ok` 时提交。
    pub fn in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Repo<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&Repo { conn: &tx })?;
        tx.commit()?;
        Ok(out)
    }
}

/// Query methods over a borrowed connection or transaction.
/// 基于借用连接或事务的查询方法。
pub struct Repo<'c> {
    conn: &'c Connection,
}

fn case_from_row(row: &Row<'_>) -> rusqlite::Result<TestCase> {
    Ok(TestCase {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
    })
}

fn step_from_row(row: &Row<'_>) -> rusqlite::Result<TestStep> {
    Ok(TestStep {
        id: row.get(0)?,
        case_id: row.get(1)?,
        step_text: row.get(2)?,
        expected_result: row.get(3)?,
        slug: row.get(4)?,
    })
}

fn environment_from_row(row: &Row<'_>) -> rusqlite::Result<Environment> {
    Ok(Environment {
        id: row.get(0)?,
        title: row.get(1)?,
        url: row.get(2)?,
        description: row.get(3)?,
    })
}

fn variable_from_row(row: &Row<'_>) -> rusqlite::Result<EnvironmentVariable> {
    Ok(EnvironmentVariable {
        id: row.get(0)?,
        environment_id: row.get(1)?,
        name: row.get(2)?,
        value: row.get(3)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<TestRun> {
    Ok(TestRun {
        id: row.get(0)?,
        started_at: row.get(1)?,
        notes: row.get(2)?,
        environment_id: row.get(3)?,
    })
}

fn run_step_from_row(row: &Row<'_>) -> rusqlite::Result<TestRunStep> {
    let position: i64 = row.get(2)?;
    Ok(TestRunStep {
        id: row.get(0)?,
        run_id: row.get(1)?,
        position: position as usize,
        case_id: row.get(3)?,
        step_id: row.get(4)?,
        status: row.get(5)?,
        notes: row.get(6)?,
    })
}

const RUN_STEP_COLUMNS: &str =
    "id, testrun_id, position, testcase_id, teststep_id, status, notes";

impl Repo<'_> {
    // ----- test cases ---------------------------------------------------

    pub fn insert_case(&self, case: &NewCase) -> Result<TestCase> {
        self.conn.execute(
            "INSERT INTO test_cases (title, description) VALUES (?1, ?2)",
            params![case.title, case.description],
        )?;
        Ok(TestCase {
            id: self.conn.last_insert_rowid(),
            title: case.title.clone(),
            description: case.description.clone(),
        })
    }

    pub fn find_case(&self, id: i64) -> Result<Option<TestCase>> {
        let case = self
            .conn
            .query_row(
                "SELECT id, title, description FROM test_cases WHERE id = ?1",
                params![id],
                case_from_row,
            )
            .optional()?;
        Ok(case)
    }

    /// All test cases in creation order.
    pub fn list_cases(&self) -> Result<Vec<TestCase>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, description FROM test_cases ORDER BY id")?;
        let cases = stmt
            .query_map([], case_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cases)
    }

    pub fn delete_case(&self, id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM test_cases WHERE id = ?1", params![id])?)
    }

    // ----- test steps ---------------------------------------------------

    pub fn insert_step(&self, case_id: i64, step: &NewStep) -> Result<TestStep> {
        self.conn.execute(
            "INSERT INTO test_steps (testcase_id, step_text, expected_result, slug) VALUES (?1, ?2, ?3, ?4)",
            params![case_id, step.step_text, step.expected_result, step.slug],
        )?;
        Ok(TestStep {
            id: self.conn.last_insert_rowid(),
            case_id,
            step_text: step.step_text.clone(),
            expected_result: step.expected_result.clone(),
            slug: step.slug.clone(),
        })
    }

    pub fn find_step(&self, id: i64) -> Result<Option<TestStep>> {
        let step = self
            .conn
            .query_row(
                "SELECT id, testcase_id, step_text, expected_result, slug FROM test_steps WHERE id = ?1",
                params![id],
                step_from_row,
            )
            .optional()?;
        Ok(step)
    }

    /// Steps of one case in creation order.
    pub fn list_steps(&self, case_id: i64) -> Result<Vec<TestStep>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, testcase_id, step_text, expected_result, slug FROM test_steps \
             WHERE testcase_id = ?1 ORDER BY id",
        )?;
        let steps = stmt
            .query_map(params![case_id], step_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(steps)
    }

    pub fn delete_step(&self, id: i64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM test_steps WHERE id = ?1", params![id])?)
    }

    pub fn delete_steps_of_case(&self, case_id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM test_steps WHERE testcase_id = ?1",
            params![case_id],
        )?)
    }

    // ----- environments -------------------------------------------------

    pub fn insert_environment(&self, env: &NewEnvironment) -> Result<Environment> {
        self.conn.execute(
            "INSERT INTO environments (title, url, description) VALUES (?1, ?2, ?3)",
            params![env.title, env.url, env.description],
        )?;
        Ok(Environment {
            id: self.conn.last_insert_rowid(),
            title: env.title.clone(),
            url: env.url.clone(),
            description: env.description.clone(),
        })
    }

    pub fn find_environment(&self, id: i64) -> Result<Option<Environment>> {
        let env = self
            .conn
            .query_row(
                "SELECT id, title, url, description FROM environments WHERE id = ?1",
                params![id],
                environment_from_row,
            )
            .optional()?;
        Ok(env)
    }

    pub fn list_environments(&self) -> Result<Vec<Environment>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, url, description FROM environments ORDER BY id")?;
        let envs = stmt
            .query_map([], environment_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(envs)
    }

    pub fn insert_variable(&self, environment_id: i64, var: &NewVariable) -> Result<EnvironmentVariable> {
        self.conn.execute(
            "INSERT INTO environment_variables (environment_id, name, value) VALUES (?1, ?2, ?3)",
            params![environment_id, var.name, var.value],
        )?;
        Ok(EnvironmentVariable {
            id: self.conn.last_insert_rowid(),
            environment_id,
            name: var.name.clone(),
            value: var.value.clone(),
        })
    }

    /// Variables of one environment in creation order.
    pub fn list_variables(&self, environment_id: i64) -> Result<Vec<EnvironmentVariable>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, environment_id, name, value FROM environment_variables \
             WHERE environment_id = ?1 ORDER BY id",
        )?;
        let vars = stmt
            .query_map(params![environment_id], variable_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(vars)
    }

    // ----- runs ---------------------------------------------------------

    pub fn insert_run(
        &self,
        environment_id: i64,
        started_at: DateTime<Utc>,
        notes: Option<&str>,
    ) -> Result<TestRun> {
        self.conn.execute(
            "INSERT INTO test_runs (started_at, notes, environment_id) VALUES (?1, ?2, ?3)",
            params![started_at, notes, environment_id],
        )?;
        Ok(TestRun {
            id: self.conn.last_insert_rowid(),
            started_at,
            notes: notes.map(str::to_string),
            environment_id,
        })
    }

    pub fn find_run(&self, id: i64) -> Result<Option<TestRun>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, notes, environment_id FROM test_runs WHERE id = ?1",
                params![id],
                run_from_row,
            )
            .optional()?;
        Ok(run)
    }

    /// All runs, newest first. Runs started in the same instant are ordered
    /// by id, newest first.
    pub fn list_runs(&self) -> Result<Vec<TestRun>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, notes, environment_id FROM test_runs \
             ORDER BY started_at DESC, id DESC",
        )?;
        let runs = stmt
            .query_map([], run_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(runs)
    }

    pub fn insert_run_step(
        &self,
        run_id: i64,
        position: usize,
        case_id: i64,
        step_id: i64,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO test_run_steps (testrun_id, position, testcase_id, teststep_id) \
             VALUES (?1, ?2, ?3, ?4)",
            params![run_id, position as i64, case_id, step_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn count_run_steps(&self, run_id: i64) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM test_run_steps WHERE testrun_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    pub fn find_run_step(&self, run_id: i64, position: usize) -> Result<Option<TestRunStep>> {
        let sql = format!(
            "SELECT {RUN_STEP_COLUMNS} FROM test_run_steps WHERE testrun_id = ?1 AND position = ?2"
        );
        let step = self
            .conn
            .query_row(&sql, params![run_id, position as i64], run_step_from_row)
            .optional()?;
        Ok(step)
    }

    /// Snapshot rows of a run ordered by position.
    pub fn list_run_steps(&self, run_id: i64) -> Result<Vec<TestRunStep>> {
        let sql = format!(
            "SELECT {RUN_STEP_COLUMNS} FROM test_run_steps WHERE testrun_id = ?1 ORDER BY position"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let steps = stmt
            .query_map(params![run_id], run_step_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(steps)
    }

    pub fn update_run_step_result(
        &self,
        run_id: i64,
        position: usize,
        status: StepStatus,
        notes: Option<&str>,
    ) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE test_run_steps SET status = ?1, notes = ?2 \
             WHERE testrun_id = ?3 AND position = ?4",
            params![status, notes, run_id, position as i64],
        )?)
    }
}
