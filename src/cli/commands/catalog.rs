//! # Catalog Commands Module / 目录命令模块
//!
//! Handlers for `case`, `step` and `env`: thin wrappers that read arguments,
//! call the catalog operations and print the outcome.
//!
//! `case`、`step` 和 `env` 命令的处理程序。

use anyhow::Result;
use clap::ArgMatches;
use colored::*;

use crate::cli::Session;
use crate::core::catalog;
use crate::core::models::{NewCase, NewEnvironment, NewStep, NewVariable};
use crate::infra::t;
use crate::reporting::console::{print_cases, print_environments};

fn text(matches: &ArgMatches, name: &str) -> String {
    matches.get_one::<String>(name).cloned().unwrap_or_default()
}

fn opt_text(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

fn id(matches: &ArgMatches, name: &str) -> i64 {
    // Required and typed by clap.
    matches.get_one::<i64>(name).copied().unwrap_or_default()
}

/// `case add | list | delete`
pub fn case(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    let locale = session.locale.clone();
    match matches.subcommand() {
        Some(("add", args)) => {
            let case = catalog::add_case(
                &session.store,
                &NewCase {
                    title: text(args, "title"),
                    description: opt_text(args, "description"),
                },
            )?;
            println!(
                "{}",
                t!("case.created", locale = &locale, id = case.id, title = case.title).green()
            );
        }
        Some(("list", _)) => {
            print_cases(&catalog::list_cases(&session.store)?, &locale);
        }
        Some(("delete", args)) => {
            let case_id = id(args, "id");
            let removed = catalog::delete_case(&mut session.store, case_id)?;
            println!(
                "{}",
                t!("case.deleted", locale = &locale, id = case_id, steps = removed).yellow()
            );
        }
        _ => {}
    }
    Ok(())
}

/// `step add | delete`
pub fn step(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    let locale = session.locale.clone();
    match matches.subcommand() {
        Some(("add", args)) => {
            let case_id = id(args, "case");
            let step = catalog::add_step(
                &session.store,
                case_id,
                &NewStep {
                    step_text: text(args, "text"),
                    expected_result: text(args, "expected"),
                    slug: opt_text(args, "slug"),
                },
            )?;
            println!(
                "{}",
                t!("step.created", locale = &locale, id = step.id, case = case_id).green()
            );
        }
        Some(("delete", args)) => {
            let step_id = id(args, "id");
            catalog::delete_step(&session.store, step_id)?;
            println!("{}", t!("step.deleted", locale = &locale, id = step_id).yellow());
        }
        _ => {}
    }
    Ok(())
}

/// `env add | list | var`
pub fn env(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    let locale = session.locale.clone();
    match matches.subcommand() {
        Some(("add", args)) => {
            let env = catalog::add_environment(
                &session.store,
                &NewEnvironment {
                    title: text(args, "title"),
                    url: text(args, "url"),
                    description: opt_text(args, "description"),
                },
            )?;
            println!(
                "{}",
                t!("env.created", locale = &locale, id = env.id, title = env.title).green()
            );
        }
        Some(("list", _)) => {
            print_environments(&catalog::list_environments(&session.store)?, &locale);
        }
        Some(("var", args)) => {
            let env_id = id(args, "env");
            let var = catalog::add_variable(
                &session.store,
                env_id,
                &NewVariable {
                    name: text(args, "name"),
                    value: text(args, "value"),
                },
            )?;
            println!(
                "{}",
                t!("env.var_created", locale = &locale, name = var.name, env = env_id).green()
            );
        }
        _ => {}
    }
    Ok(())
}
