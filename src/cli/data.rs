//! # data 子命令 CLI 定义
//!
//! 数据集文件编辑，包含多个子命令：
//! - `show`: 显示数据集
//! - `add`: 追加一条测量
//! - `remove`: 删除最后一条或指定索引的测量
//! - `set`: 编辑单元格（自动重算）
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/data.rs`

use super::convert::ConditionArgs;
use clap::{ArgGroup, Args, Subcommand};
use std::path::PathBuf;

/// data 主命令参数
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Dataset file (tab-separated)
    #[arg(short, long, global = true, env = "MYPRL_DATASET", default_value = "myprl.tsv")]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: DataCommands,
}

/// data 子命令
#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Print the dataset
    Show,

    /// Append a measurement
    Add(AddArgs),

    /// Remove the last measurement, or the one at --index
    Remove(RemoveArgs),

    /// Edit one cell; pressure and probe reading are kept consistent
    Set(SetArgs),
}

/// add 子命令参数
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["reading", "pressure"])))]
pub struct AddArgs {
    /// Probe reading x; pressure is computed from it
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    pub reading: Option<f64>,

    /// Pressure (GPa); the probe reading is solved for
    #[arg(short, long, allow_negative_numbers = true)]
    pub pressure: Option<f64>,

    /// Independent gauge reading (e.g. membrane pressure in bar)
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub measured: f64,

    /// Free-form source tag (e.g. spectrum file name)
    #[arg(long, default_value = "No")]
    pub tag: String,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

/// remove 子命令参数
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Index of the record to remove (0-based)
    #[arg(short, long)]
    pub index: Option<usize>,
}

/// set 子命令参数
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Index of the record (0-based)
    #[arg(short, long)]
    pub index: usize,

    /// Column name (measuredRaw, pressure, probeReading, temperature,
    /// referenceProbeReading, referenceTemperature, calibrationName, sourceTag)
    #[arg(long)]
    pub field: String,

    /// New cell value
    #[arg(long, allow_hyphen_values = true)]
    pub value: String,
}
