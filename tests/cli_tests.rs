//! # CLI Integration Tests / 命令行集成测试
//!
//! Drives the `casebook` binary end to end against a database in a
//! temporary directory.
//!
//! 在临时目录中的数据库上端到端地驱动 `casebook` 可执行文件。

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn db(&self) -> PathBuf {
        self.path().join("casebook.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("casebook").expect("Failed to find binary");
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .arg("--lang")
            .arg("en")
            .arg("--config")
            .arg(self.path().join("Casebook.toml"))
            .arg("--db")
            .arg(self.db());
        cmd
    }

    /// Creates one case with two steps and one environment with a variable.
    fn seed(&self) {
        self.cmd()
            .args(["case", "add", "--title", "Login"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created test case #1: Login"));
        self.cmd()
            .args(["step", "add", "1", "--text", "Open page", "--expected", "Form shown"])
            .args(["--slug", "/+tenant+/login"])
            .assert()
            .success();
        self.cmd()
            .args(["step", "add", "1", "--text", "Submit", "--expected", "Dashboard"])
            .assert()
            .success();
        self.cmd()
            .args(["env", "add", "--title", "Staging", "--url", "https://staging.test"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created environment #1: Staging"));
        self.cmd()
            .args(["env", "var", "1", "--name", "tenant", "--value", "acme"])
            .assert()
            .success();
    }
}

#[test]
fn test_init_writes_config_once() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(ws.path().join("Casebook.toml").exists());

    ws.cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_full_run_flow() {
    let ws = Workspace::new();
    ws.seed();

    ws.cmd()
        .args(["run", "start", "1", "--notes", "smoke"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started run #1 with 2 step(s)"));

    ws.cmd()
        .args(["run", "view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://staging.test/acme/login"))
        .stdout(predicate::str::contains("Open page"));

    ws.cmd()
        .args(["run", "record", "1", "0", "--status", "pass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Submit"));

    ws.cmd()
        .args(["run", "record", "1", "1", "--status", "fail", "--notes", "500 error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run complete."));

    ws.cmd()
        .args(["run", "summary", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"pass\""))
        .stdout(predicate::str::contains("\"status\": \"fail\""))
        .stdout(predicate::str::contains("500 error"));

    ws.cmd()
        .arg("runs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Staging"));
}

#[test]
fn test_summary_html_report() {
    let ws = Workspace::new();
    ws.seed();
    ws.cmd().args(["run", "start", "1"]).assert().success();

    let report = ws.path().join("out").join("report.html");
    ws.cmd()
        .args(["run", "summary", "1", "--html"])
        .arg(&report)
        .assert()
        .success();

    let html = std::fs::read_to_string(&report).expect("Failed to read report");
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("Open page"));
}

#[test]
fn test_invalid_status_is_rejected() {
    let ws = Workspace::new();
    ws.seed();
    ws.cmd().args(["run", "start", "1"]).assert().success();
    ws.cmd()
        .args(["run", "record", "1", "0", "--status", "maybe"])
        .assert()
        .failure();
}

#[test]
fn test_missing_run_reports_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["run", "view", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("42"));
}

#[test]
fn test_blank_title_is_rejected() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["case", "add", "--title", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title"));
}

#[test]
fn test_record_past_end_is_not_confirmed() {
    let ws = Workspace::new();
    ws.seed();
    ws.cmd().args(["run", "start", "1"]).assert().success();

    ws.cmd()
        .args(["run", "record", "1", "5", "--status", "fail"])
        .assert()
        .success()
        .stdout(predicate::str::contains("out of range"))
        .stdout(predicate::str::contains("2 step(s)"))
        .stdout(predicate::str::contains("recorded as").not());

    let max_idx = usize::MAX.to_string();
    ws.cmd()
        .args(["run", "record", "1", max_idx.as_str(), "--status", "pass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing was recorded"));

    ws.cmd()
        .args(["run", "summary", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": null").count(2));
}
