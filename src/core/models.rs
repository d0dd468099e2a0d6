//! # Data Models Module / 数据模型模块
//!
//! This module defines the records persisted by the store: the test catalog
//! (cases and steps), environments and their variables, and runs with their
//! snapshot run-steps. It also holds the input structs used to create catalog
//! records, which validate required fields before anything is written.
//!
//! 此模块定义了存储层持久化的记录：测试目录（用例和步骤）、环境及其变量，
//! 以及运行及其快照步骤。

use crate::core::error::{Error, Result};
use crate::infra::t;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The outcome recorded for a single run step.
/// An unrecorded step is represented by `Option::None` at the use site.
///
/// 单个运行步骤记录的结果。未记录的步骤在使用处以 `None` 表示。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// The step behaved as expected. / 步骤符合预期。
    Pass,
    /// The step did not produce the expected result. / 步骤未产生预期结果。
    Fail,
    /// The tester chose not to execute the step. / 测试人员选择跳过此步骤。
    Skip,
}

impl StepStatus {
    pub const ALL: [StepStatus; 3] = [StepStatus::Pass, StepStatus::Fail, StepStatus::Skip];

    /// The storage and wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pass => "pass",
            StepStatus::Fail => "fail",
            StepStatus::Skip => "skip",
        }
    }

    /// Gets the localized label for display.
    /// 获取用于显示的本地化标签。
    pub fn label(&self, locale: &str) -> String {
        match self {
            StepStatus::Pass => t!("status.pass", locale = locale).to_string(),
            StepStatus::Fail => t!("status.fail", locale = locale).to_string(),
            StepStatus::Skip => t!("status.skip", locale = locale).to_string(),
        }
    }
}

/// Localized label for a possibly unrecorded status.
pub fn status_label(status: Option<StepStatus>, locale: &str) -> String {
    match status {
        Some(status) => status.label(locale),
        None => t!("status.pending", locale = locale).to_string(),
    }
}

/// CSS class used by the HTML report for a possibly unrecorded status.
pub fn status_class(status: Option<StepStatus>) -> &'static str {
    match status {
        Some(StepStatus::Pass) => "status-pass",
        Some(StepStatus::Fail) => "status-fail",
        Some(StepStatus::Skip) => "status-skip",
        None => "status-pending",
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" => Ok(StepStatus::Pass),
            "fail" => Ok(StepStatus::Fail),
            "skip" => Ok(StepStatus::Skip),
            other => Err(Error::Validation {
                field: "status",
                reason: format!("expected one of pass, fail, skip; got '{other}'"),
            }),
        }
    }
}

impl ToSql for StepStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StepStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

/// A named scenario composed of ordered steps.
/// 由有序步骤组成的命名场景。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
}

/// One action and its expected result within a test case.
/// 测试用例中的一个操作及其预期结果。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub id: i64,
    /// The owning test case / 所属测试用例
    pub case_id: i64,
    pub step_text: String,
    pub expected_result: String,
    /// Optional slug template containing `+name+` placeholders.
    /// 可选的 slug 模板，包含 `+name+` 占位符。
    pub slug: Option<String>,
}

/// A test case together with its steps in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseWithSteps {
    pub case: TestCase,
    pub steps: Vec<TestStep>,
}

/// A named execution context a run is bound to.
/// 运行所绑定的命名执行上下文。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: i64,
    pub title: String,
    /// Base URL that rendered slugs are appended to / 渲染后的 slug 所附加的基础 URL
    pub url: String,
    pub description: Option<String>,
}

/// A flat name/value pair owned by an environment.
/// Names are not unique within an environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub id: i64,
    pub environment_id: i64,
    pub name: String,
    pub value: String,
}

/// An environment together with its variables in creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentWithVariables {
    pub environment: Environment,
    pub variables: Vec<EnvironmentVariable>,
}

/// One timestamped execution pass over a materialized snapshot of all steps.
/// The environment is fixed at creation.
///
/// 对所有步骤的物化快照进行的一次带时间戳的执行。环境在创建时即固定。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRun {
    pub id: i64,
    pub started_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub environment_id: i64,
}

/// A snapshot row pairing a run with one originating case and step.
/// `case_id` and `step_id` are captured at run start and may dangle later.
///
/// 将运行与一个原始用例和步骤配对的快照行。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunStep {
    pub id: i64,
    pub run_id: i64,
    /// Zero-based index of this row within its run / 此行在运行中的从零开始的索引
    pub position: usize,
    pub case_id: i64,
    pub step_id: i64,
    pub status: Option<StepStatus>,
    pub notes: Option<String>,
}

/// Trims a required text field, rejecting blank input.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::blank(field));
    }
    Ok(trimmed.to_string())
}

/// Normalizes an optional text field so blank input is stored as NULL.
pub(crate) fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Input for creating a test case. / 创建测试用例的输入。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCase {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewCase {
    pub fn validated(&self) -> Result<NewCase> {
        Ok(NewCase {
            title: required("title", &self.title)?,
            description: optional(self.description.as_deref()),
        })
    }
}

/// Input for creating a test step. / 创建测试步骤的输入。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStep {
    pub step_text: String,
    pub expected_result: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl NewStep {
    pub fn validated(&self) -> Result<NewStep> {
        Ok(NewStep {
            step_text: required("step_text", &self.step_text)?,
            expected_result: required("expected_result", &self.expected_result)?,
            slug: optional(self.slug.as_deref()),
        })
    }
}

/// Input for creating an environment. / 创建环境的输入。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewEnvironment {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEnvironment {
    pub fn validated(&self) -> Result<NewEnvironment> {
        Ok(NewEnvironment {
            title: required("title", &self.title)?,
            url: required("url", &self.url)?,
            description: optional(self.description.as_deref()),
        })
    }
}

/// Input for creating an environment variable.
/// The value is kept verbatim apart from the blank check; leading or
/// trailing spaces can be significant inside a URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewVariable {
    pub name: String,
    pub value: String,
}

impl NewVariable {
    pub fn validated(&self) -> Result<NewVariable> {
        required("value", &self.value)?;
        Ok(NewVariable {
            name: required("name", &self.name)?,
            value: self.value.clone(),
        })
    }
}
