//! # Init Command Module / 初始化命令模块
//!
//! This module implements the `init` command, which writes a commented
//! default configuration file.
//!
//! 此模块实现了 `init` 命令，用于写入带注释的默认配置文件。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::Path};

use crate::infra::{fs::ensure_parent_dir, t};

pub const DEFAULT_CONFIG: &str = r#"# Casebook Configuration / Casebook 配置

# Language for output messages / 输出消息的语言
language = "en"

# SQLite database file; `~` and $VARS are expanded / SQLite 数据库文件，会展开 `~` 和 $VARS
database = "casebook.db"

# Default directory for `run summary --report` / `run summary --report` 的默认目录
# report_dir = "reports"
"#;

/// Executes the init command.
///
/// # Arguments
/// * `output` - Path for the new configuration file
/// * `force` - Whether to overwrite an existing file
/// * `locale` - Language for messages
///
/// # Returns
/// A Result indicating success or failure of the command execution
pub fn execute(output: &Path, force: bool, locale: &str) -> Result<()> {
    if output.exists() && !force {
        println!(
            "{}",
            t!("init.file_exists", locale = locale, path = output.display()).red()
        );
        println!("{}", t!("init.use_force", locale = locale).yellow());
        return Ok(());
    }

    ensure_parent_dir(output)?;
    fs::write(output, DEFAULT_CONFIG).with_context(|| {
        t!("init.write_failed", locale = locale, path = output.display()).to_string()
    })?;

    println!(
        "{}",
        t!("init.success", locale = locale, path = output.display()).green()
    );
    println!("{}", t!("init.next_steps", locale = locale));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{parse_config, CasebookConfig};

    #[test]
    fn test_default_config_parses_to_defaults() {
        assert_eq!(parse_config(DEFAULT_CONFIG).unwrap(), CasebookConfig::default());
    }

    #[test]
    fn test_existing_file_is_kept_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Casebook.toml");
        fs::write(&path, "language = \"zh-CN\"\n").unwrap();
        execute(&path, false, "en").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "language = \"zh-CN\"\n");

        execute(&path, true, "en").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
