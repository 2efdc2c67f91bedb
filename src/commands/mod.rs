//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `models/`, `io/`, `utils/`
//! - 子模块: list, convert, data

pub mod convert;
pub mod data;
pub mod list;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::List => list::execute(),
        Commands::Pressure(args) => convert::pressure(args),
        Commands::Reading(args) => convert::reading(args),
        Commands::Data(args) => data::execute(args),
    }
}
