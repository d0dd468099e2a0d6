//! # File System Operations Module / 文件系统操作模块
//!
//! Path helpers for the configuration and database files: shell expansion
//! of configured paths and creation of missing parent directories.
//!
//! 配置和数据库文件的路径辅助函数。

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expands `~` and environment variables in a configured path.
///
/// # Arguments
/// * `raw` - The path as written in the config file or on the command line
///
/// # Returns
/// The expanded path, or an error naming the undefined variable
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path: {raw}"))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Creates the parent directory of `path` if it does not exist yet.
///
/// # Arguments
/// * `path` - A file path whose directory must exist before writing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}
