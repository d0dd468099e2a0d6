//! # Catalog Operations Module / 目录操作模块
//!
//! Create, list and delete operations for test cases, steps, environments and
//! variables, plus the run listing. Inputs are validated before any write and
//! references to missing parents fail with `NotFound`.
//!
//! 测试用例、步骤、环境和变量的创建、列出和删除操作，以及运行列表。

use serde::Serialize;
use tracing::info;

use crate::core::error::{Entity, Error, Result};
use crate::core::models::{
    CaseWithSteps, Environment, EnvironmentVariable, EnvironmentWithVariables, NewCase,
    NewEnvironment, NewStep, NewVariable, TestCase, TestRun, TestStep,
};
use crate::core::planner::load_catalog;
use crate::core::summary::Tally;
use crate::infra::store::Store;

pub fn add_case(store: &Store, input: &NewCase) -> Result<TestCase> {
    let input = input.validated()?;
    let case = store.repo().insert_case(&input)?;
    info!(target: "casebook::catalog", case_id = case.id, "Test case created");
    Ok(case)
}

/// All cases with their steps, in creation order.
pub fn list_cases(store: &Store) -> Result<Vec<CaseWithSteps>> {
    load_catalog(&store.repo())
}

/// Deletes a case and all of its steps in one transaction.
/// Run steps that reference them are left in place.
///
/// 在一个事务中删除用例及其所有步骤。
pub fn delete_case(store: &mut Store, case_id: i64) -> Result<usize> {
    let removed_steps = store.in_transaction(|repo| {
        if repo.find_case(case_id)?.is_none() {
            return Err(Error::not_found(Entity::TestCase, case_id));
        }
        let removed = repo.delete_steps_of_case(case_id)?;
        repo.delete_case(case_id)?;
        Ok(removed)
    })?;
    info!(target: "casebook::catalog", case_id, removed_steps, "Test case deleted");
    Ok(removed_steps)
}

pub fn add_step(store: &Store, case_id: i64, input: &NewStep) -> Result<TestStep> {
    let input = input.validated()?;
    let repo = store.repo();
    if repo.find_case(case_id)?.is_none() {
        return Err(Error::not_found(Entity::TestCase, case_id));
    }
    let step = repo.insert_step(case_id, &input)?;
    info!(target: "casebook::catalog", case_id, step_id = step.id, "Test step created");
    Ok(step)
}

pub fn delete_step(store: &Store, step_id: i64) -> Result<()> {
    if store.repo().delete_step(step_id)? == 0 {
        return Err(Error::not_found(Entity::TestStep, step_id));
    }
    info!(target: "casebook::catalog", step_id, "Test step deleted");
    Ok(())
}

pub fn add_environment(store: &Store, input: &NewEnvironment) -> Result<Environment> {
    let input = input.validated()?;
    let env = store.repo().insert_environment(&input)?;
    info!(target: "casebook::catalog", environment_id = env.id, "Environment created");
    Ok(env)
}

/// All environments with their variables, in creation order.
pub fn list_environments(store: &Store) -> Result<Vec<EnvironmentWithVariables>> {
    let repo = store.repo();
    repo.list_environments()?
        .into_iter()
        .map(|environment| {
            let variables = repo.list_variables(environment.id)?;
            Ok(EnvironmentWithVariables {
                environment,
                variables,
            })
        })
        .collect()
}

/// Adds a variable to an environment. Duplicate names are accepted.
pub fn add_variable(
    store: &Store,
    environment_id: i64,
    input: &NewVariable,
) -> Result<EnvironmentVariable> {
    let input = input.validated()?;
    let repo = store.repo();
    if repo.find_environment(environment_id)?.is_none() {
        return Err(Error::not_found(Entity::Environment, environment_id));
    }
    let var = repo.insert_variable(environment_id, &input)?;
    info!(target: "casebook::catalog", environment_id, name = %var.name, "Environment variable created");
    Ok(var)
}

/// One row of the run history. / 运行历史中的一行。
#[derive(Debug, Clone, Serialize)]
pub struct RunOverview {
    pub run: TestRun,
    /// Title of the bound environment / 绑定环境的标题
    pub environment_title: String,
    pub tally: Tally,
}

/// All runs, newest first, with their environment title and tally.
///
/// # Errors
/// `Error::NotFound` if a run's environment no longer exists.
pub fn list_runs(store: &Store) -> Result<Vec<RunOverview>> {
    let repo = store.repo();
    repo.list_runs()?
        .into_iter()
        .map(|run| {
            let environment_title = repo
                .find_environment(run.environment_id)?
                .map(|env| env.title)
                .ok_or_else(|| Error::not_found(Entity::Environment, run.environment_id))?;
            let tally = Tally::from_statuses(
                repo.list_run_steps(run.id)?.into_iter().map(|s| s.status),
            );
            Ok(RunOverview {
                run,
                environment_title,
                tally,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_case_rejects_blank_title() {
        let store = Store::open_in_memory().unwrap();
        let err = add_case(&store, &NewCase { title: "  ".into(), description: None }).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "title", .. }));
        assert!(list_cases(&store).unwrap().is_empty());
    }

    #[test]
    fn test_add_step_to_missing_case_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let step = NewStep {
            step_text: "Click".into(),
            expected_result: "Opens".into(),
            slug: None,
        };
        let err = add_step(&store, 12, &step).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: Entity::TestCase, id: 12 }));
    }

    #[test]
    fn test_delete_case_cascades_to_steps() {
        let mut store = Store::open_in_memory().unwrap();
        let case = add_case(&store, &NewCase { title: "Checkout".into(), description: None }).unwrap();
        for text in ["Add item", "Pay"] {
            add_step(
                &store,
                case.id,
                &NewStep { step_text: text.into(), expected_result: "ok".into(), slug: None },
            )
            .unwrap();
        }
        assert_eq!(delete_case(&mut store, case.id).unwrap(), 2);
        assert!(list_cases(&store).unwrap().is_empty());
        assert!(store.repo().list_steps(case.id).unwrap().is_empty());
    }

    #[test]
    fn test_delete_missing_entities_is_not_found() {
        let mut store = Store::open_in_memory().unwrap();
        assert!(delete_case(&mut store, 1).unwrap_err().is_not_found());
        assert!(delete_step(&store, 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_add_variable_to_missing_environment_is_not_found() {
        let store = Store::open_in_memory().unwrap();
        let var = NewVariable { name: "env".into(), value: "prod".into() };
        let err = add_variable(&store, 3, &var).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: Entity::Environment, id: 3 }));
    }

    #[test]
    fn test_list_environments_includes_variables_in_order() {
        let store = Store::open_in_memory().unwrap();
        let env = add_environment(
            &store,
            &NewEnvironment { title: "Prod".into(), url: "https://prod.test".into(), description: None },
        )
        .unwrap();
        for (name, value) in [("tenant", "acme"), ("region", "eu")] {
            add_variable(&store, env.id, &NewVariable { name: name.into(), value: value.into() }).unwrap();
        }
        let envs = list_environments(&store).unwrap();
        assert_eq!(envs.len(), 1);
        let names: Vec<_> = envs[0].variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["tenant", "region"]);
    }
}
