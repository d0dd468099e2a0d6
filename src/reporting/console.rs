//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints catalog listings, the current step of a run, run
//! summaries and the run history to the console, using color coding and
//! internationalized labels.
//!
//! 此模块在控制台打印目录列表、运行的当前步骤、运行摘要和运行历史，
//! 使用颜色编码和国际化标签。

use colored::*;

use crate::core::catalog::RunOverview;
use crate::core::cursor::StepFrame;
use crate::core::models::{
    status_label, CaseWithSteps, EnvironmentWithVariables, StepStatus,
};
use crate::core::summary::{RunSummary, Tally};
use crate::infra::t;

/// Colors a status label the way every listing does.
fn colored_status(status: Option<StepStatus>, locale: &str) -> ColoredString {
    let label = status_label(status, locale);
    match status {
        Some(StepStatus::Pass) => label.green(),
        Some(StepStatus::Fail) => label.red(),
        Some(StepStatus::Skip) => label.yellow(),
        None => label.dimmed(),
    }
}

fn print_tally(tally: &Tally, locale: &str) {
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        tally.passed.to_string().green().bold(),
        t!("summary.passed", locale = locale),
        tally.failed.to_string().red().bold(),
        t!("summary.failed", locale = locale),
        tally.skipped.to_string().yellow().bold(),
        t!("summary.skipped", locale = locale),
        tally.pending.to_string().dimmed(),
        t!("summary.pending", locale = locale),
    );
}

/// Prints every test case with its steps.
///
/// # Output Format / 输出格式
/// ```text
/// #1 Login
///     #1  Open the login page -> Form is shown  [/+env+/login]
/// ```
pub fn print_cases(cases: &[CaseWithSteps], locale: &str) {
    if cases.is_empty() {
        println!("{}", t!("case.none", locale = locale).dimmed());
        return;
    }
    println!("{}", t!("case.banner", locale = locale).bold());
    for entry in cases {
        println!("{} {}", format!("#{}", entry.case.id).cyan(), entry.case.title.bold());
        if let Some(description) = &entry.case.description {
            println!("    {}", description.dimmed());
        }
        for step in &entry.steps {
            let slug = step
                .slug
                .as_deref()
                .map(|s| format!("  [{}]", s))
                .unwrap_or_default();
            println!(
                "    {:<4} {} -> {}{}",
                format!("#{}", step.id),
                step.step_text,
                step.expected_result,
                slug.dimmed()
            );
        }
    }
}

/// Prints every environment with its variables.
pub fn print_environments(environments: &[EnvironmentWithVariables], locale: &str) {
    if environments.is_empty() {
        println!("{}", t!("env.none", locale = locale).dimmed());
        return;
    }
    println!("{}", t!("env.banner", locale = locale).bold());
    for entry in environments {
        let env = &entry.environment;
        println!(
            "{} {}  {}",
            format!("#{}", env.id).cyan(),
            env.title.bold(),
            env.url.underline()
        );
        if let Some(description) = &env.description {
            println!("    {}", description.dimmed());
        }
        for var in &entry.variables {
            println!("    +{}+ = {}", var.name.yellow(), var.value);
        }
    }
}

/// Prints the step a run is currently positioned on.
///
/// # Output Format / 输出格式
/// ```text
/// --- Run #3 · Step 2/5 ---
///   Case:     Login
///   Step:     Submit the form
///   Expected: Dashboard is shown
///   URL:      https://staging.test/prod/login
///   Status:   Pending
/// ```
pub fn print_frame(frame: &StepFrame, locale: &str) {
    println!(
        "\n{}",
        t!(
            "step.banner",
            locale = locale,
            run = frame.run.id,
            current = frame.idx + 1,
            total = frame.total
        )
        .bold()
    );
    println!("  {:<10} {}", t!("step.case", locale = locale), frame.case.title.cyan());
    println!("  {:<10} {}", t!("step.action", locale = locale), frame.step.step_text);
    println!(
        "  {:<10} {}",
        t!("step.expected", locale = locale),
        frame.step.expected_result
    );
    println!(
        "  {:<10} {}",
        t!("step.url", locale = locale),
        frame.target_url().underline()
    );
    println!(
        "  {:<10} {}",
        t!("step.status", locale = locale),
        colored_status(frame.run_step.status, locale)
    );
    if let Some(notes) = &frame.run_step.notes {
        println!("  {:<10} {}", t!("step.notes", locale = locale), notes);
    }
    if frame.is_last() {
        println!("  {}", t!("step.last", locale = locale).italic());
    }
}

/// Prints a formatted summary of a run.
/// Displays one line per step with its status, case, step text and notes.
///
/// 在控制台打印格式化的运行摘要。
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary #3 (Staging) ---
///   - Passed     | Login                | Open the login page      |
///   - Failed     | Login                | Submit the form          | 500 error
///   2 passed  1 failed  0 skipped  0 pending
/// ```
pub fn print_summary(summary: &RunSummary, locale: &str) {
    println!(
        "\n{}",
        t!(
            "summary.banner",
            locale = locale,
            run = summary.run.id,
            environment = summary.environment.title
        )
        .bold()
    );
    println!(
        "  {}",
        t!(
            "summary.started",
            locale = locale,
            at = summary.run.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .dimmed()
    );
    if let Some(notes) = &summary.run.notes {
        println!("  {}", notes.dimmed());
    }

    for entry in &summary.entries {
        println!(
            "  - {:<18} | {:<30} | {:<40} | {}",
            colored_status(entry.status, locale),
            entry.case.title,
            entry.step.step_text,
            entry.notes.as_deref().unwrap_or_default()
        );
    }
    print_tally(&summary.tally(), locale);
}

/// Prints the run history, newest first.
pub fn print_runs(runs: &[RunOverview], locale: &str) {
    if runs.is_empty() {
        println!("{}", t!("runs.none", locale = locale).dimmed());
        return;
    }
    println!("{}", t!("runs.banner", locale = locale).bold());
    for overview in runs {
        let tally = &overview.tally;
        let state = if tally.is_finished() {
            t!("runs.finished", locale = locale).green()
        } else {
            t!("runs.in_progress", locale = locale).yellow()
        };
        println!(
            "  {:<6} {}  {:<20} {:<12} {}/{}/{}/{}",
            format!("#{}", overview.run.id).cyan(),
            overview.run.started_at.format("%Y-%m-%d %H:%M"),
            overview.environment_title,
            state,
            tally.passed.to_string().green(),
            tally.failed.to_string().red(),
            tally.skipped.to_string().yellow(),
            tally.pending.to_string().dimmed(),
        );
    }
}
