//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for casebook,
//! including SQLite storage, file system helpers, and i18n support.
//!
//! 此模块为 casebook 提供基础设施服务，
//! 包括 SQLite 存储、文件系统辅助功能和国际化支持。

pub mod fs;
pub mod store;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
