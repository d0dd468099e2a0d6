//! # Error Types / 错误类型
//!
//! Every fallible operation in the core returns [`Result`]. The variants map
//! directly onto what a caller can do about the failure: a missing record, a
//! rejected input, or a storage fault that aborts the request.
//!
//! 核心中所有可能失败的操作都返回 [`Result`]。

use std::fmt;
use thiserror::Error;

/// Result type alias for casebook operations / casebook 操作的结果类型别名
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of record a lookup was performed against.
/// 查找所针对的记录类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    TestCase,
    TestStep,
    Environment,
    TestRun,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::TestCase => "test case",
            Entity::TestStep => "test step",
            Entity::Environment => "environment",
            Entity::TestRun => "test run",
        };
        f.write_str(name)
    }
}

/// Error types for casebook / casebook 的错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced record does not exist.
    /// 引用的记录不存在。
    #[error("{entity} {id} not found")]
    NotFound {
        /// Which table was searched
        entity: Entity,
        /// The id that was looked up
        id: i64,
    },

    /// A required field was blank or a value could not be parsed.
    /// 必填字段为空或值无法解析。
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// Human readable explanation
        reason: String,
    },

    /// The SQLite layer failed.
    /// SQLite 层出错。
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Stored data could not be decoded into a model.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl Error {
    pub fn not_found(entity: Entity, id: i64) -> Self {
        Error::NotFound { entity, id }
    }

    pub fn blank(field: &'static str) -> Self {
        Error::Validation {
            field,
            reason: "must not be blank".to_string(),
        }
    }

    /// `true` for [`Error::NotFound`] regardless of entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_names_entity_and_id() {
        let err = Error::not_found(Entity::TestRun, 42);
        assert_eq!(err.to_string(), "test run 42 not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_display() {
        let err = Error::blank("title");
        let msg = err.to_string();
        assert!(msg.contains("title"));
        assert!(msg.contains("must not be blank"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_storage_from_rusqlite() {
        let err: Error = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(err.to_string().starts_with("storage error"));
    }
}
