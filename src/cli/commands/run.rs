//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` commands: starting a run, viewing and
//! recording individual steps, the interactive walk, summaries and the run
//! history. Every command ends by showing where the cursor now stands: the
//! next step, or the summary once the run is complete.
//!
//! 此模块实现了 `run` 命令：启动运行、查看和记录单个步骤、交互式遍历、
//! 摘要和运行历史。

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::path::PathBuf;

use crate::cli::Session;
use crate::core::catalog;
use crate::core::cursor::{self, StepView};
use crate::core::models::StepStatus;
use crate::core::planner;
use crate::core::summary::summarize;
use crate::infra::t;
use crate::reporting::{generate_html_report, print_frame, print_runs, print_summary};

/// Dispatches `run start | view | record | walk | summary`.
pub fn execute(session: &mut Session, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("start", args)) => {
            let env_id = args.get_one::<i64>("env").copied().unwrap_or_default();
            let notes = args.get_one::<String>("notes").map(String::as_str);
            start(session, env_id, notes)
        }
        Some(("view", args)) => {
            let run_id = args.get_one::<i64>("run").copied().unwrap_or_default();
            let idx = args.get_one::<usize>("idx").copied().unwrap_or_default();
            let view = cursor::view(&session.store, run_id, idx)?;
            show(session, view)
        }
        Some(("record", args)) => {
            let run_id = args.get_one::<i64>("run").copied().unwrap_or_default();
            let idx = args.get_one::<usize>("idx").copied().unwrap_or_default();
            let status: StepStatus = args
                .get_one::<String>("status")
                .map(String::as_str)
                .unwrap_or_default()
                .parse()?;
            let notes = args.get_one::<String>("notes").map(String::as_str);
            record(session, run_id, idx, status, notes)
        }
        Some(("walk", args)) => {
            let run_id = args.get_one::<i64>("run").copied().unwrap_or_default();
            let from = args.get_one::<usize>("from").copied().unwrap_or_default();
            walk(session, run_id, from)
        }
        Some(("summary", args)) => {
            let run_id = args.get_one::<i64>("run").copied().unwrap_or_default();
            let html = args.get_one::<PathBuf>("html").cloned();
            summary(
                session,
                run_id,
                html,
                args.get_flag("report"),
                args.get_flag("json"),
            )
        }
        _ => Ok(()),
    }
}

/// Starts a run and shows its first step.
fn start(session: &mut Session, env_id: i64, notes: Option<&str>) -> Result<()> {
    let run = planner::start_run(&mut session.store, env_id, notes)?;
    let view = cursor::view(&session.store, run.id, 0)?;
    let total = match &view {
        StepView::InProgress(frame) => frame.total,
        StepView::Complete { total, .. } => *total,
    };
    println!(
        "{}",
        t!("run.started", locale = &session.locale, id = run.id, total = total)
            .green()
            .bold()
    );
    show(session, view)
}

/// Records one step result and shows the next step.
fn record(
    session: &mut Session,
    run_id: i64,
    idx: usize,
    status: StepStatus,
    notes: Option<&str>,
) -> Result<()> {
    let outcome = cursor::record(&mut session.store, run_id, idx, status, notes)?;
    if !outcome.written {
        let total = match &outcome.next {
            StepView::Complete { total, .. } => *total,
            StepView::InProgress(frame) => frame.total,
        };
        println!(
            "{}",
            t!(
                "run.out_of_range",
                locale = &session.locale,
                current = idx.saturating_add(1),
                total = total
            )
            .yellow()
        );
        return Ok(());
    }
    println!(
        "{}",
        t!(
            "run.recorded",
            locale = &session.locale,
            current = idx.saturating_add(1),
            status = status.label(&session.locale)
        )
        .green()
    );
    show(session, outcome.next)
}

/// Prints a cursor view; a complete run is shown as its summary.
fn show(session: &Session, view: StepView) -> Result<()> {
    match view {
        StepView::InProgress(frame) => {
            print_frame(&frame, &session.locale);
            println!(
                "{}",
                t!(
                    "run.record_hint",
                    locale = &session.locale,
                    run = frame.run.id,
                    idx = frame.idx
                )
                .dimmed()
            );
        }
        StepView::Complete { run_id, .. } => {
            println!("{}", t!("run.complete", locale = &session.locale).green().bold());
            print_summary(&summarize(&session.store, run_id)?, &session.locale);
        }
    }
    Ok(())
}

/// Walks the run interactively from `from`, prompting for a status and notes
/// on every step. Choosing "stop" leaves the run resumable.
fn walk(session: &mut Session, run_id: i64, from: usize) -> Result<()> {
    let theme = ColorfulTheme::default();
    let locale = session.locale.clone();
    let mut view = cursor::view(&session.store, run_id, from)?;

    loop {
        let frame = match view {
            StepView::Complete { run_id, total } => {
                return show(session, StepView::Complete { run_id, total });
            }
            StepView::InProgress(frame) => frame,
        };
        print_frame(&frame, &locale);

        let mut options: Vec<String> = StepStatus::ALL.iter().map(|s| s.label(&locale)).collect();
        options.push(t!("walk.stop", locale = &locale).to_string());
        let default = frame
            .run_step
            .status
            .and_then(|s| StepStatus::ALL.iter().position(|c| *c == s))
            .unwrap_or(0);

        let choice = Select::with_theme(&theme)
            .with_prompt(t!("walk.status_prompt", locale = &locale))
            .items(&options)
            .default(default)
            .interact()
            .context(t!("walk.prompt_failed", locale = &locale).to_string())?;

        let Some(status) = StepStatus::ALL.get(choice).copied() else {
            println!(
                "{}",
                t!("walk.stopped", locale = &locale, run = run_id, idx = frame.idx).yellow()
            );
            return Ok(());
        };

        let notes: String = Input::with_theme(&theme)
            .with_prompt(t!("walk.notes_prompt", locale = &locale))
            .with_initial_text(frame.run_step.notes.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()
            .context(t!("walk.prompt_failed", locale = &locale).to_string())?;

        view = cursor::record(&mut session.store, run_id, frame.idx, status, Some(&notes))?.next;
    }
}

/// Prints the summary of a run, optionally as JSON or with an HTML report.
fn summary(
    session: &Session,
    run_id: i64,
    html: Option<PathBuf>,
    report: bool,
    json: bool,
) -> Result<()> {
    let summary = summarize(&session.store, run_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &session.locale);
    }

    let report_path = match (html, report) {
        (Some(path), _) => Some(path),
        (None, true) => {
            let dir = session.config.report_dir_path()?.unwrap_or_else(|| PathBuf::from("."));
            Some(dir.join(format!("run-{run_id}.html")))
        }
        (None, false) => None,
    };
    if let Some(path) = report_path {
        generate_html_report(&summary, &path, &session.locale)?;
        eprintln!(
            "{}",
            t!("run.report_written", locale = &session.locale, path = path.display()).cyan()
        );
    }
    Ok(())
}

/// Lists all runs, newest first.
pub fn list(session: &Session) -> Result<()> {
    print_runs(&catalog::list_runs(&session.store)?, &session.locale);
    Ok(())
}
