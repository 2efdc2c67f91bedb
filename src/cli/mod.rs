//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `list`: 列出内置标定模型
//! - `pressure`: 由探针读数计算压力
//! - `reading`: 由压力反演探针读数
//! - `data`: 编辑测量数据集文件（嵌套子命令）
//!   - `show`, `add`, `remove`, `set`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, data

pub mod convert;
pub mod data;

use clap::{Parser, Subcommand};

/// myprl - 光谱压标换算工具
#[derive(Parser)]
#[command(name = "myprl")]
#[command(version)]
#[command(about = "Pressure calibration from ruby, samarium borate, diamond and cBN probes", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// List the registered calibrations
    List,

    /// Compute pressure from a probe reading
    Pressure(convert::PressureArgs),

    /// Compute the probe reading that gives a pressure
    Reading(convert::ReadingArgs),

    /// Edit a measurement dataset stored as a TSV file
    Data(data::DataArgs),
}
