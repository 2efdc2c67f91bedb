//! # 单条测量记录
//!
//! 一条记录包含压力计读数、压力、探针读数、温度、参考读数、参考温度、
//! 所用标定模型和来源标签。
//!
//! 字段的 setter 只赋值，不会自动重算；调用者在一批修改之后显式调用
//! `recompute_pressure()` 或 `recompute_probe_reading()`。
//!
//! ## 依赖关系
//! - 被 `models/dataset.rs` 使用
//! - 使用 `models/calibration.rs`, `solver.rs`

use crate::error::Result;
use crate::models::CalibrationModel;
use crate::solver::Solver;
use serde::{Deserialize, Serialize};

/// 默认温度 (K)
pub const AMBIENT_TEMPERATURE: f64 = 298.0;

/// 测量记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// 独立压力计读数（如膜压 bar），不参与标定计算
    measured_raw: f64,

    /// 压力 (GPa)
    pressure: f64,

    /// 探针读数 x (nm 或 cm-1)
    probe_reading: f64,

    /// 样品温度 T (K)
    temperature: f64,

    /// 参考读数 x0
    reference_probe_reading: f64,

    /// 参考温度 T0 (K)
    reference_temperature: f64,

    /// 标定模型
    calibration: CalibrationModel,

    /// 来源标签（通常是光谱文件名）
    source_tag: String,
}

impl Measurement {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        measured_raw: f64,
        pressure: f64,
        probe_reading: f64,
        temperature: f64,
        reference_probe_reading: f64,
        reference_temperature: f64,
        calibration: CalibrationModel,
        source_tag: impl Into<String>,
    ) -> Self {
        Measurement {
            measured_raw,
            pressure,
            probe_reading,
            temperature,
            reference_probe_reading,
            reference_temperature,
            calibration,
            source_tag: source_tag.into(),
        }
    }

    /// 零压、室温下的初始记录，读数取模型默认种子
    pub fn initial(calibration: CalibrationModel) -> Self {
        let x0 = calibration.inverse_seed();
        Measurement::new(
            0.0,
            0.0,
            x0,
            AMBIENT_TEMPERATURE,
            x0,
            AMBIENT_TEMPERATURE,
            calibration,
            "No",
        )
    }

    pub fn measured_raw(&self) -> f64 {
        self.measured_raw
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn probe_reading(&self) -> f64 {
        self.probe_reading
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn reference_probe_reading(&self) -> f64 {
        self.reference_probe_reading
    }

    pub fn reference_temperature(&self) -> f64 {
        self.reference_temperature
    }

    pub fn calibration(&self) -> CalibrationModel {
        self.calibration
    }

    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

    pub fn set_measured_raw(&mut self, value: f64) {
        self.measured_raw = value;
    }

    pub fn set_pressure(&mut self, value: f64) {
        self.pressure = value;
    }

    pub fn set_probe_reading(&mut self, value: f64) {
        self.probe_reading = value;
    }

    pub fn set_temperature(&mut self, value: f64) {
        self.temperature = value;
    }

    pub fn set_reference_probe_reading(&mut self, value: f64) {
        self.reference_probe_reading = value;
    }

    pub fn set_reference_temperature(&mut self, value: f64) {
        self.reference_temperature = value;
    }

    pub fn set_source_tag(&mut self, value: impl Into<String>) {
        self.source_tag = value.into();
    }

    /// 更换标定模型，不做任何重算
    pub fn reassign_calibration(&mut self, model: CalibrationModel) {
        self.calibration = model;
    }

    /// 由探针读数重算压力
    ///
    /// # Errors
    /// 公式在当前输入处无定义时返回 `PrlError::Evaluation`，记录保持不变。
    pub fn recompute_pressure(&mut self) -> Result<()> {
        self.pressure = self.calibration.evaluate(
            self.probe_reading,
            self.temperature,
            self.reference_probe_reading,
            self.reference_temperature,
        )?;
        Ok(())
    }

    /// 由压力反演探针读数（默认求解器配置）
    pub fn recompute_probe_reading(&mut self) -> Result<()> {
        self.recompute_probe_reading_with(&Solver::default())
    }

    /// 由压力反演探针读数，以当前读数为起点
    ///
    /// # Errors
    /// 原样传递求解器的 `PrlError::Inversion`，记录保持不变。
    pub fn recompute_probe_reading_with(&mut self, solver: &Solver) -> Result<()> {
        let seed = (self.probe_reading.is_finite() && self.probe_reading > 0.0)
            .then_some(self.probe_reading);
        self.probe_reading = solver.invert(
            self.calibration,
            self.pressure,
            self.temperature,
            self.reference_probe_reading,
            self.reference_temperature,
            seed,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrlError;

    fn ruby(x: f64) -> Measurement {
        Measurement::new(12.0, 0.0, x, 298.0, 694.28, 298.0, CalibrationModel::Ruby2020, "run1")
    }

    #[test]
    fn test_initial_buffer() {
        let m = Measurement::initial(CalibrationModel::SamariumBorateDatchi1997);
        assert_eq!(m.probe_reading(), 685.41);
        assert_eq!(m.reference_probe_reading(), 685.41);
        assert_eq!(m.temperature(), 298.0);
        assert_eq!(m.source_tag(), "No");
    }

    #[test]
    fn test_recompute_pressure() {
        let mut m = ruby(700.0);
        m.recompute_pressure().unwrap();
        assert!((m.pressure() - 16.12108).abs() < 1e-4);
        assert_eq!(m.measured_raw(), 12.0);
    }

    #[test]
    fn test_setters_do_not_recompute() {
        let mut m = ruby(700.0);
        m.recompute_pressure().unwrap();
        let p = m.pressure();
        m.set_temperature(400.0);
        m.set_reference_probe_reading(694.0);
        m.set_probe_reading(705.0);
        assert_eq!(m.pressure(), p);
        m.recompute_pressure().unwrap();
        assert!(m.pressure() != p);
    }

    #[test]
    fn test_recompute_probe_reading() {
        let mut m = ruby(694.28);
        m.set_pressure(30.0);
        m.recompute_probe_reading().unwrap();
        let p = CalibrationModel::Ruby2020.pressure(m.probe_reading(), 298.0, 694.28, 298.0);
        assert!((p - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_reassign_calibration_keeps_values() {
        let mut m = ruby(700.0);
        m.recompute_pressure().unwrap();
        let before = m.clone();
        m.reassign_calibration(CalibrationModel::SamariumBorateDatchi1997);
        assert_eq!(m.calibration(), CalibrationModel::SamariumBorateDatchi1997);
        assert_eq!(m.pressure(), before.pressure());
        assert_eq!(m.probe_reading(), before.probe_reading());
    }

    #[test]
    fn test_evaluation_error_leaves_pressure() {
        let mut m = Measurement::new(
            0.0,
            3.0,
            -10.0,
            300.0,
            1054.0,
            300.0,
            CalibrationModel::CbnRamanDatchi2007,
            "bad",
        );
        let err = m.recompute_pressure().unwrap_err();
        assert!(matches!(err, PrlError::Evaluation { .. }));
        assert_eq!(m.pressure(), 3.0);
    }

    #[test]
    fn test_inversion_error_leaves_reading() {
        let mut m = ruby(700.0);
        m.set_pressure(-5000.0);
        let err = m.recompute_probe_reading().unwrap_err();
        assert!(matches!(err, PrlError::Inversion { .. }));
        assert_eq!(m.probe_reading(), 700.0);
    }
}
