//! # Config Module Unit Tests / Config 模块单元测试
//!
//! Unit tests for `config.rs`: defaults, partial documents and loading.
//!
//! `config.rs` 的单元测试：默认值、部分文档和加载。

use casebook::core::config::{load_config, parse_config, CasebookConfig};

#[test]
fn test_empty_document_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config, CasebookConfig::default());
    assert_eq!(config.language, "en");
    assert_eq!(config.database, "casebook.db");
}

#[test]
fn test_partial_document() {
    let config = parse_config("language = \"zh-CN\"\nreport_dir = \"reports\"\n").unwrap();
    assert_eq!(config.language, "zh-CN");
    assert_eq!(config.database, "casebook.db");
    assert_eq!(config.report_dir.as_deref(), Some("reports"));
}

#[test]
fn test_invalid_document_is_error() {
    assert!(parse_config("language = ").is_err());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, CasebookConfig::default());
}

#[test]
fn test_existing_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Casebook.toml");
    std::fs::write(&path, "database = \"data/cases.db\"\n").unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.database, "data/cases.db");
}
