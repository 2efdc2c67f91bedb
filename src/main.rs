//! # myprl 命令行入口
//!
//! ## 子命令
//! - `list` - 列出标定模型
//! - `pressure` - 读数 -> 压力
//! - `reading` - 压力 -> 读数
//! - `data` - 编辑测量数据集 (show / add / remove / set)
//!
//! 日志级别由 `RUST_LOG` 控制，默认 `warn`。

use clap::Parser;
use myprl::cli::Cli;
use myprl::{commands, utils};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
