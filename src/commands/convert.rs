//! # pressure / reading 命令实现
//!
//! 单点正向计算与反演，结果按显示精度（3 位小数）打印。
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `models/measurement.rs`, `solver.rs`
//! - 使用 `utils/output.rs`

use crate::cli::convert::{ConditionArgs, PressureArgs, ReadingArgs};
use crate::error::Result;
use crate::models::{CalibrationModel, Measurement, Registry};
use crate::solver::Solver;
use crate::utils::output;

/// 由命令行条件构建工作记录（读数与压力待填）
pub(crate) fn buffer_from(conditions: &ConditionArgs, registry: &Registry) -> Result<Measurement> {
    let model = registry.get(&conditions.calib)?;
    let mut buffer = Measurement::initial(model);
    buffer.set_temperature(conditions.temperature);
    buffer.set_reference_probe_reading(conditions.ref_reading.unwrap_or_else(|| model.inverse_seed()));
    buffer.set_reference_temperature(conditions.ref_temperature);
    Ok(buffer)
}

fn print_conditions(m: &Measurement) {
    let model: CalibrationModel = m.calibration();
    output::print_info(&format!(
        "{} | T = {} K | {}0 = {} {} | T0 = {} K",
        model.long_name(),
        m.temperature(),
        model.probe_name(),
        m.reference_probe_reading(),
        model.probe_unit(),
        m.reference_temperature()
    ));
}

/// 执行 pressure 命令
pub fn pressure(args: PressureArgs) -> Result<()> {
    let registry = Registry::builtin();
    let mut buffer = buffer_from(&args.conditions, &registry)?;
    buffer.set_probe_reading(args.reading);
    buffer.recompute_pressure()?;

    print_conditions(&buffer);
    output::print_result("P", buffer.pressure(), "GPa");
    Ok(())
}

/// 执行 reading 命令
pub fn reading(args: ReadingArgs) -> Result<()> {
    let registry = Registry::builtin();
    let mut buffer = buffer_from(&args.conditions, &registry)?;
    let model = buffer.calibration();
    buffer.set_pressure(args.pressure);

    let x = Solver::default().invert(
        model,
        buffer.pressure(),
        buffer.temperature(),
        buffer.reference_probe_reading(),
        buffer.reference_temperature(),
        args.seed,
    )?;
    buffer.set_probe_reading(x);

    print_conditions(&buffer);
    output::print_result(model.probe_name(), buffer.probe_reading(), model.probe_unit());
    Ok(())
}
