//! # Core Module / 核心模块
//!
//! This module contains the core functionality of casebook: the data
//! models, the slug renderer, run materialization, the run cursor and the
//! summary aggregator, plus validated catalog operations.
//!
//! 此模块包含 casebook 的核心功能：数据模型、slug 渲染、运行物化、
//! 运行游标和摘要聚合，以及经过校验的目录操作。

pub mod catalog;
pub mod config;
pub mod cursor;
pub mod error;
pub mod models;
pub mod planner;
pub mod slug;
pub mod summary;

// Re-exports
pub use cursor::{record, view, Recorded, StepFrame, StepView};
pub use error::{Error, Result};
pub use planner::start_run;
pub use slug::render;
pub use summary::{summarize, RunSummary};
