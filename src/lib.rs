//! # Casebook Library / Casebook 库
//!
//! This library provides the functionality behind the `casebook` tool, a
//! manual test-case manager and run tracker. Test cases are made of steps;
//! a run snapshots every step of the catalog against one environment and is
//! walked step by step, recording pass, fail or skip for each.
//!
//! 此库为 `casebook` 工具提供功能，这是一个手动测试用例管理和运行跟踪工具。
//!
//! ## Modules / 模块
//!
//! - `core` - Data models, slug rendering, run materialization, cursor and summary
//! - `infra` - SQLite storage, file system helpers and i18n
//! - `reporting` - Console and HTML output
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 数据模型、slug 渲染、运行物化、游标和摘要
//! - `infra` - SQLite 存储、文件系统辅助功能和国际化
//! - `reporting` - 控制台和 HTML 输出
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use core::models;
pub use core::error::{Error, Result};
pub use infra::store::Store;

/// Resolves the locale to use for output messages.
///
/// An explicit language (from `--lang` or the config file) wins when it is a
/// known locale. Otherwise the system locale is tried as a whole (e.g.
/// "zh-CN"), then by its language part (e.g. "en" from "en-US"), and
/// finally "en" is used.
pub fn resolve_locale(explicit: Option<&str>) -> String {
    let available_locales = rust_i18n::available_locales!();
    let pick = |candidate: &str| -> Option<String> {
        if available_locales.iter().any(|known| *known == candidate) {
            return Some(candidate.to_string());
        }
        candidate
            .split(['-', '_'])
            .next()
            .filter(|lang_code| available_locales.iter().any(|known| known == lang_code))
            .map(str::to_string)
    };

    explicit
        .and_then(|lang| pick(lang))
        .or_else(|| sys_locale::get_locale().and_then(|locale| pick(&locale)))
        .unwrap_or_else(|| "en".to_string())
}

/// Initializes the application's locale and returns the one selected.
pub fn init(explicit: Option<&str>) -> String {
    let lang = resolve_locale(explicit);
    rust_i18n::set_locale(&lang);
    lang
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
