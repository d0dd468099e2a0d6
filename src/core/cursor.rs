//! # Run Cursor Module / 运行游标模块
//!
//! Walks a materialized run one step at a time. The cursor keeps no state of
//! its own: the position is the index `idx` passed on every call, and all
//! other state lives in the store. A run is `InProgress` at `idx < total`
//! and `Complete` at `idx >= total`; `Complete` is terminal.
//!
//! There is no locking between calls. Two `record` calls on the same step
//! both succeed and the later write wins.
//!
//! 逐步遍历已物化的运行。游标自身不保存状态：位置即每次调用传入的 `idx`。

use serde::Serialize;
use tracing::debug;

use crate::core::error::{Entity, Error, Result};
use crate::core::models::{Environment, StepStatus, TestCase, TestRun, TestRunStep, TestStep};
use crate::core::slug::{self, Variables};
use crate::infra::store::{Repo, Store};

/// Everything needed to present one step of a run.
/// 展示运行中一个步骤所需的全部信息。
#[derive(Debug, Clone, Serialize)]
pub struct StepFrame {
    pub run: TestRun,
    pub run_step: TestRunStep,
    pub case: TestCase,
    pub step: TestStep,
    pub environment: Environment,
    /// Zero-based position of this step / 此步骤从零开始的位置
    pub idx: usize,
    /// Number of steps in the run / 运行中的步骤总数
    pub total: usize,
    /// The step's slug rendered against the environment's variables.
    /// 按环境变量渲染后的步骤 slug。
    pub rendered_slug: String,
}

impl StepFrame {
    /// Environment base URL joined with the rendered slug.
    /// Exactly one `/` separates them when both sides are non-empty.
    pub fn target_url(&self) -> String {
        join_url(&self.environment.url, &self.rendered_slug)
    }

    /// `true` if this is the last step of the run.
    pub fn is_last(&self) -> bool {
        self.idx + 1 >= self.total
    }
}

fn join_url(base: &str, slug: &str) -> String {
    if slug.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return slug.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), slug.trim_start_matches('/'))
}

/// The cursor state at a given index.
/// 给定索引处的游标状态。
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepView {
    /// A step remains to be executed at this index.
    InProgress(Box<StepFrame>),
    /// The index is past the last step; the run's summary is the next stop.
    Complete { run_id: i64, total: usize },
}

impl StepView {
    pub fn is_complete(&self) -> bool {
        matches!(self, StepView::Complete { .. })
    }
}

/// Outcome of [`record`]. / [`record`] 的结果。
#[derive(Debug, Clone, Serialize)]
pub struct Recorded {
    /// `false` when `idx` was past the end and nothing was stored.
    pub written: bool,
    /// The view at `idx + 1`, or `Complete` when nothing was written.
    pub next: StepView,
}

fn require_run(repo: &Repo<'_>, run_id: i64) -> Result<TestRun> {
    repo.find_run(run_id)?
        .ok_or_else(|| Error::not_found(Entity::TestRun, run_id))
}

/// Resolves the step at `idx` of `run_id`. Pure read.
///
/// # Errors
/// * `Error::NotFound` if the run does not exist
/// * `Error::NotFound` if the originating case or step was deleted after the
///   run started
pub fn view(store: &Store, run_id: i64, idx: usize) -> Result<StepView> {
    let repo = store.repo();
    let run = require_run(&repo, run_id)?;
    let total = repo.count_run_steps(run_id)?;
    if idx >= total {
        return Ok(StepView::Complete { run_id, total });
    }

    let run_step = repo
        .find_run_step(run_id, idx)?
        .ok_or_else(|| Error::Corrupt(format!("run {run_id} has no step at position {idx}")))?;
    let step = repo
        .find_step(run_step.step_id)?
        .ok_or_else(|| Error::not_found(Entity::TestStep, run_step.step_id))?;
    let case = repo
        .find_case(run_step.case_id)?
        .ok_or_else(|| Error::not_found(Entity::TestCase, run_step.case_id))?;
    let environment = repo
        .find_environment(run.environment_id)?
        .ok_or_else(|| Error::not_found(Entity::Environment, run.environment_id))?;
    let variables: Variables = repo.list_variables(environment.id)?.iter().collect();
    let rendered_slug = slug::render(step.slug.as_deref(), &variables);

    Ok(StepView::InProgress(Box::new(StepFrame {
        run,
        run_step,
        case,
        step,
        environment,
        idx,
        total,
        rendered_slug,
    })))
}

/// Records `status` and `notes` on the step at `idx`, then returns the view
/// at `idx + 1`.
///
/// Re-recording a step overwrites the earlier result. An `idx` past the end
/// writes nothing, reports `written: false` and yields `Complete`.
///
/// # Errors
/// `Error::NotFound` if the run does not exist, or if resolving the next
/// step hits a deleted case or step.
pub fn record(
    store: &mut Store,
    run_id: i64,
    idx: usize,
    status: StepStatus,
    notes: Option<&str>,
) -> Result<Recorded> {
    let notes = crate::core::models::optional(notes);
    let written = store.in_transaction(|repo| {
        require_run(repo, run_id)?;
        if idx >= repo.count_run_steps(run_id)? {
            return Ok(false);
        }
        repo.update_run_step_result(run_id, idx, status, notes.as_deref())?;
        Ok(true)
    })?;

    let next = if written {
        debug!(target: "casebook::run", run_id, idx, status = %status, "Step result recorded");
        view(store, run_id, idx + 1)?
    } else {
        debug!(target: "casebook::run", run_id, idx, "Index past the end, nothing recorded");
        view(store, run_id, idx)?
    };
    Ok(Recorded { written, next })
}
