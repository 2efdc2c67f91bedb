//! # 工具函数模块
//!
//! 提供美化输出。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 子模块: output

pub mod output;
