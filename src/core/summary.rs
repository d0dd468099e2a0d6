//! # Run Summary Module / 运行摘要模块
//!
//! Reads a run back as an ordered list of (case, step, status, notes) entries.
//! Counting by status is a pure reduction over that list, see [`Tally`].
//!
//! 将运行读回为有序的（用例、步骤、状态、备注）条目列表。

use serde::Serialize;

use crate::core::error::{Entity, Error, Result};
use crate::core::models::{Environment, StepStatus, TestCase, TestRun, TestStep};
use crate::infra::store::Store;

/// One line of a run summary, in run order.
/// 运行摘要中的一行，按运行顺序排列。
#[derive(Debug, Clone, Serialize)]
pub struct SummaryEntry {
    pub case: TestCase,
    pub step: TestStep,
    pub status: Option<StepStatus>,
    pub notes: Option<String>,
}

/// Counts of recorded outcomes. / 记录结果的计数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Steps with no recorded status / 没有记录状态的步骤
    pub pending: usize,
}

impl Tally {
    pub fn from_statuses<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = Option<StepStatus>>,
    {
        statuses.into_iter().fold(Tally::default(), |mut tally, status| {
            match status {
                Some(StepStatus::Pass) => tally.passed += 1,
                Some(StepStatus::Fail) => tally.failed += 1,
                Some(StepStatus::Skip) => tally.skipped += 1,
                None => tally.pending += 1,
            }
            tally
        })
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.pending
    }

    /// A run is finished once no step is pending.
    pub fn is_finished(&self) -> bool {
        self.pending == 0
    }
}

/// A run with its resolved entries. / 包含已解析条目的运行。
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run: TestRun,
    pub environment: Environment,
    pub entries: Vec<SummaryEntry>,
}

impl RunSummary {
    pub fn tally(&self) -> Tally {
        Tally::from_statuses(self.entries.iter().map(|e| e.status))
    }
}

/// Builds the summary of `run_id`.
///
/// # Errors
/// * `Error::NotFound` if the run does not exist
/// * `Error::NotFound` if any originating case or step was deleted after the
///   run started
pub fn summarize(store: &Store, run_id: i64) -> Result<RunSummary> {
    let repo = store.repo();
    let run = repo
        .find_run(run_id)?
        .ok_or_else(|| Error::not_found(Entity::TestRun, run_id))?;
    let environment = repo
        .find_environment(run.environment_id)?
        .ok_or_else(|| Error::not_found(Entity::Environment, run.environment_id))?;

    let entries = repo
        .list_run_steps(run_id)?
        .into_iter()
        .map(|row| {
            let case = repo
                .find_case(row.case_id)?
                .ok_or_else(|| Error::not_found(Entity::TestCase, row.case_id))?;
            let step = repo
                .find_step(row.step_id)?
                .ok_or_else(|| Error::not_found(Entity::TestStep, row.step_id))?;
            Ok(SummaryEntry {
                case,
                step,
                status: row.status,
                notes: row.notes,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RunSummary {
        run,
        environment,
        entries,
    })
}
