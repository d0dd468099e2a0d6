//! # Commands Module / 命令模块
//!
//! One submodule per top-level command group.
//!
//! 每个顶级命令组对应一个子模块。

pub mod catalog;
pub mod init;
pub mod run;
