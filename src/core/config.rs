use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::infra::fs::expand_path;

/// Default file name of the configuration file.
pub const DEFAULT_CONFIG_FILE: &str = "Casebook.toml";

/// Represents the casebook configuration, loaded from a TOML file.
/// Every field has a default, so a missing file yields a usable config.
///
/// 代表从 TOML 文件加载的 casebook 配置。每个字段都有默认值。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CasebookConfig {
    /// The language for output messages (e.g., "en", "zh-CN").
    /// Defaults to "en" if not specified.
    ///
    /// 输出消息的语言（例如 "en", "zh-CN"）。如果未指定，则默认为 "en"。
    #[serde(default = "default_language")]
    pub language: String,

    /// Path of the SQLite database. `~` and `$VARS` are expanded.
    /// SQLite 数据库路径。会展开 `~` 和 `$VARS`。
    #[serde(default = "default_database")]
    pub database: String,

    /// Directory HTML reports are written to when no explicit path is given.
    /// 未指定路径时写入 HTML 报告的目录。
    #[serde(default)]
    pub report_dir: Option<String>,
}

impl Default for CasebookConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            database: default_database(),
            report_dir: None,
        }
    }
}

impl CasebookConfig {
    /// The database path with shell expansions applied.
    pub fn database_path(&self) -> Result<PathBuf> {
        expand_path(&self.database)
    }

    /// The report directory with shell expansions applied, if configured.
    pub fn report_dir_path(&self) -> Result<Option<PathBuf>> {
        self.report_dir.as_deref().map(expand_path).transpose()
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_database() -> String {
    "casebook.db".to_string()
}

/// Parses a configuration document.
pub fn parse_config(content: &str) -> Result<CasebookConfig> {
    toml::from_str(content).context("Failed to parse casebook configuration")
}

/// Loads the configuration at `path`, falling back to defaults when the file
/// does not exist. A file that exists but fails to parse is an error.
pub fn load_config(path: &Path) -> Result<CasebookConfig> {
    if !path.exists() {
        return Ok(CasebookConfig::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}
