//! # list 命令实现
//!
//! 以表格形式列出注册表中的标定模型。
//!
//! ## 依赖关系
//! - 使用 `models/calibration.rs` 的 Registry
//! - 使用 `utils/output.rs`

use crate::error::Result;
use crate::models::{CalibrationModel, Registry};
use crate::utils::output;

use tabled::{Table, Tabled};

/// 标定模型表格行
#[derive(Debug, Clone, Tabled)]
struct CalibrationRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
    #[tabled(rename = "Probe")]
    probe: String,
    #[tabled(rename = "x0 default")]
    seed: f64,
    #[tabled(rename = "Step")]
    step: f64,
    #[tabled(rename = "T correction")]
    temperature_correction: &'static str,
}

impl From<CalibrationModel> for CalibrationRow {
    fn from(model: CalibrationModel) -> Self {
        CalibrationRow {
            name: model.name(),
            description: model.long_name(),
            probe: format!("{} ({})", model.probe_name(), model.probe_unit()),
            seed: model.inverse_seed(),
            step: model.step(),
            temperature_correction: model.temperature_correction(),
        }
    }
}

/// 执行 list 命令
pub fn execute() -> Result<()> {
    let registry = Registry::builtin();
    output::print_header("Registered Calibrations");

    let rows: Vec<CalibrationRow> = registry.iter().map(CalibrationRow::from).collect();
    println!("{}", Table::new(&rows));

    Ok(())
}
