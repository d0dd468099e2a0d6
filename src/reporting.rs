//! # Reporting Module / 报告模块
//!
//! This module handles the display of catalog listings, run steps and run
//! summaries. It provides colorful console output with internationalization
//! support and a standalone HTML report of a run summary.
//!
//! 此模块处理目录列表、运行步骤和运行摘要的显示。
//! 它提供支持国际化的彩色控制台输出和独立的 HTML 运行摘要报告。

pub mod console;
pub mod html;

// Re-export common reporting functions
pub use console::{print_frame, print_runs, print_summary};
pub use html::{generate_html_report, render_html_report};
