//! # Run Planning Module / 运行计划模块
//!
//! This module turns the current catalog into the ordered step sequence of a
//! new run and persists it. Planning is pure: it walks every test case in
//! creation order and, within each case, every step in creation order.
//! Materialization writes the run and all of its rows in one transaction, so
//! a run is either complete or absent.
//!
//! 此模块将当前目录转换为新运行的有序步骤序列并持久化。

use chrono::Utc;
use tracing::info;

use crate::core::error::{Entity, Error, Result};
use crate::core::models::{CaseWithSteps, TestRun};
use crate::infra::store::{Repo, Store};

/// One planned run step: the identities of the originating case and step.
/// 一个计划中的运行步骤：原始用例和步骤的标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStep {
    pub case_id: i64,
    pub step_id: i64,
}

/// The ordered snapshot a run is materialized from.
/// 运行物化所依据的有序快照。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunPlan {
    /// Steps in run order; index is the cursor position.
    /// 按运行顺序排列的步骤；索引即游标位置。
    pub steps: Vec<PlannedStep>,
    /// Number of test cases that contributed no steps.
    /// 没有贡献任何步骤的测试用例数量。
    pub empty_cases: usize,
}

impl RunPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builds the run plan for a catalog already in creation order.
///
/// # Arguments
/// * `catalog` - Test cases with their steps, both in creation order
///
/// # Returns
/// A `RunPlan` with one entry per (case, step) pair
pub fn plan_run(catalog: &[CaseWithSteps]) -> RunPlan {
    let mut plan = RunPlan::default();
    for entry in catalog {
        if entry.steps.is_empty() {
            plan.empty_cases += 1;
        }
        plan.steps.extend(entry.steps.iter().map(|step| PlannedStep {
            case_id: entry.case.id,
            step_id: step.id,
        }));
    }
    plan
}

/// Reads the whole catalog, cases and steps in creation order.
pub fn load_catalog(repo: &Repo<'_>) -> Result<Vec<CaseWithSteps>> {
    repo.list_cases()?
        .into_iter()
        .map(|case| {
            let steps = repo.list_steps(case.id)?;
            Ok(CaseWithSteps { case, steps })
        })
        .collect()
}

/// Starts a new run bound to `environment_id`.
///
/// The environment check, catalog read, and every insert happen in the same
/// transaction. Later catalog edits never touch the rows written here.
///
/// # Arguments
/// * `store` - The store to read the catalog from and write the run to
/// * `environment_id` - The environment the run is bound to
/// * `notes` - Optional free-text notes for the run
///
/// # Errors
/// `Error::NotFound` if the environment does not exist.
pub fn start_run(store: &mut Store, environment_id: i64, notes: Option<&str>) -> Result<TestRun> {
    let notes = crate::core::models::optional(notes);
    let (run, plan) = store.in_transaction(|repo| {
        if repo.find_environment(environment_id)?.is_none() {
            return Err(Error::not_found(Entity::Environment, environment_id));
        }
        let plan = plan_run(&load_catalog(repo)?);
        let run = repo.insert_run(environment_id, Utc::now(), notes.as_deref())?;
        for (position, planned) in plan.steps.iter().enumerate() {
            repo.insert_run_step(run.id, position, planned.case_id, planned.step_id)?;
        }
        Ok((run, plan))
    })?;

    info!(
        target: "casebook::run",
        run_id = run.id,
        environment_id,
        steps = plan.len(),
        empty_cases = plan.empty_cases,
        "Run materialized"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{TestCase, TestStep};

    fn case(id: i64, step_ids: &[i64]) -> CaseWithSteps {
        CaseWithSteps {
            case: TestCase { id, title: format!("case-{id}"), description: None },
            steps: step_ids
                .iter()
                .map(|&sid| TestStep {
                    id: sid,
                    case_id: id,
                    step_text: format!("step-{sid}"),
                    expected_result: "ok".to_string(),
                    slug: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_plan_orders_by_case_then_step() {
        let plan = plan_run(&[case(1, &[10, 11]), case(2, &[]), case(3, &[5])]);
        let pairs: Vec<_> = plan.steps.iter().map(|p| (p.case_id, p.step_id)).collect();
        assert_eq!(pairs, vec![(1, 10), (1, 11), (3, 5)]);
        assert_eq!(plan.empty_cases, 1);
    }

    #[test]
    fn test_plan_of_empty_catalog_is_empty() {
        let plan = plan_run(&[]);
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
    }
}
