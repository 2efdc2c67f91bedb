//! # 文件读写模块
//!
//! 数据集的持久化格式。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: tsv

pub mod tsv;

pub use tsv::{load, read, read_table, save, save_table, write, write_table};
