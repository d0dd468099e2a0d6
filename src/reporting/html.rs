//! # HTML Reporting Module / HTML 报告模块
//!
//! This module generates a standalone HTML report for one run: summary
//! counts followed by a table of every step with its recorded outcome.
//! Markup is produced with `maud`, which escapes all interpolated text.
//!
//! 此模块为单次运行生成独立的 HTML 报告：先是摘要计数，然后是包含每个步骤及其
//! 记录结果的表格。

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use std::fs;
use std::path::Path;

use crate::core::models::{status_class, status_label};
use crate::core::summary::RunSummary;
use crate::infra::fs::ensure_parent_dir;
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

fn summary_item(count: usize, class: &str, label: &str) -> Markup {
    html! {
        div.summary-item {
            span class={ "count " (class) } { (count) }
            span.label { (label) }
        }
    }
}

/// Renders the HTML report of `summary` to a string.
///
/// 将 `summary` 的 HTML 报告渲染为字符串。
pub fn render_html_report(summary: &RunSummary, locale: &str) -> String {
    let tally = summary.tally();
    let title = t!("html_report.title", locale = locale, run = summary.run.id).to_string();

    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(HTML_STYLE)) }
            }
            body {
                h1 { (title) }
                div.meta {
                    (t!("html_report.environment", locale = locale).to_string()) ": "
                    strong { (summary.environment.title) } " · "
                    (summary.environment.url) " · "
                    (summary.run.started_at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    @if let Some(notes) = &summary.run.notes {
                        p.notes { (notes) }
                    }
                }
                div.summary-container {
                    (summary_item(tally.total(), "", &t!("html_report.summary.total", locale = locale)))
                    (summary_item(tally.passed, "passed-text", &t!("summary.passed", locale = locale)))
                    (summary_item(tally.failed, "failed-text", &t!("summary.failed", locale = locale)))
                    (summary_item(tally.skipped, "skipped-text", &t!("summary.skipped", locale = locale)))
                    (summary_item(tally.pending, "pending-text", &t!("summary.pending", locale = locale)))
                }
                table {
                    thead {
                        tr {
                            th { "#" }
                            th { (t!("html_report.table.case", locale = locale).to_string()) }
                            th { (t!("html_report.table.step", locale = locale).to_string()) }
                            th { (t!("html_report.table.expected", locale = locale).to_string()) }
                            th { (t!("html_report.table.status", locale = locale).to_string()) }
                            th { (t!("html_report.table.notes", locale = locale).to_string()) }
                        }
                    }
                    tbody {
                        @for (i, entry) in summary.entries.iter().enumerate() {
                            tr {
                                td { (i + 1) }
                                td { (entry.case.title) }
                                td { (entry.step.step_text) }
                                td { (entry.step.expected_result) }
                                td {
                                    div class={ "status-cell " (status_class(entry.status)) } {
                                        (status_label(entry.status, locale))
                                    }
                                }
                                td.notes { (entry.notes.as_deref().unwrap_or_default()) }
                            }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Writes the HTML report of `summary` to `output_path`, creating parent
/// directories as needed.
///
/// # Errors / 错误
/// Returns an error if the file cannot be written.
pub fn generate_html_report(summary: &RunSummary, output_path: &Path, locale: &str) -> Result<()> {
    ensure_parent_dir(output_path)?;
    fs::write(output_path, render_html_report(summary, locale))
        .with_context(|| format!("Failed to write HTML report: {}", output_path.display()))?;
    Ok(())
}
