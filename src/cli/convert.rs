//! # pressure / reading 子命令 CLI 定义
//!
//! 单点正向计算与反演。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs`, `cli/data.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::Args;

/// 测量条件（标定模型、温度、参考点）
#[derive(Args, Debug, Clone)]
pub struct ConditionArgs {
    /// Calibration name (see `myprl list`)
    #[arg(short, long, default_value = "Ruby2020")]
    pub calib: String,

    /// Sample temperature T (K)
    #[arg(short, long, default_value_t = 298.0)]
    pub temperature: f64,

    /// Reference probe reading x0 [default: zero-pressure reading of the calibration]
    #[arg(long)]
    pub ref_reading: Option<f64>,

    /// Reference temperature T0 (K)
    #[arg(long, default_value_t = 298.0)]
    pub ref_temperature: f64,
}

/// pressure 子命令参数
#[derive(Args, Debug)]
pub struct PressureArgs {
    /// Probe reading x (nm or cm-1)
    #[arg(short = 'x', long, allow_negative_numbers = true)]
    pub reading: f64,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}

/// reading 子命令参数
#[derive(Args, Debug)]
pub struct ReadingArgs {
    /// Target pressure (GPa)
    #[arg(short, long, allow_negative_numbers = true)]
    pub pressure: f64,

    /// Starting guess for the inversion [default: zero-pressure reading of the calibration]
    #[arg(long)]
    pub seed: Option<f64>,

    #[command(flatten)]
    pub conditions: ConditionArgs,
}
