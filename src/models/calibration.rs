//! # 压力标定模型
//!
//! 定义内置的光谱压标（红宝石荧光、SrB4O7:Sm2+ 荧光、金刚石 Raman 边、
//! cBN Raman）及其正向公式，以及按名称查找模型的注册表。
//!
//! ## 参考
//! - Shen G. et al., High Pressure Research 40 (2020) 299, doi:10.1080/08957959.2020.1791107
//! - Datchi F. et al., High Pressure Research 27 (2007) 447, doi:10.1080/08957950701659593
//! - Datchi F. et al., J. Appl. Phys. 81 (1997) 3333
//! - Akahama Y., Kawamura H., J. Appl. Phys. 100 (2006) 043516
//!
//! ## 依赖关系
//! - 被 `models/measurement.rs`, `models/dataset.rs`, `solver.rs`, `io/` 使用
//! - 无外部模块依赖

use crate::error::{PrlError, Result};
use serde::{Deserialize, Serialize};

/// 内置标定模型（封闭集合，每个变体对应一条公式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationModel {
    /// 红宝石 R1 荧光线, Shen 2020 + Datchi 2007 温度修正
    Ruby2020,
    /// SrB4O7:Sm2+ 7D0-5F0 荧光线, Datchi 1997（无温度修正）
    SamariumBorateDatchi1997,
    /// 金刚石 Raman 高频边, Akahama 2006
    DiamondRamanEdgeAkahama2006,
    /// cBN TO Raman 模, Datchi 2007
    CbnRamanDatchi2007,
}

/// 全部内置模型，按注册顺序
pub const BUILTIN_MODELS: [CalibrationModel; 4] = [
    CalibrationModel::Ruby2020,
    CalibrationModel::SamariumBorateDatchi1997,
    CalibrationModel::DiamondRamanEdgeAkahama2006,
    CalibrationModel::CbnRamanDatchi2007,
];

impl CalibrationModel {
    /// 注册表键
    pub fn name(&self) -> &'static str {
        match self {
            CalibrationModel::Ruby2020 => "Ruby2020",
            CalibrationModel::SamariumBorateDatchi1997 => "SamariumBorateDatchi1997",
            CalibrationModel::DiamondRamanEdgeAkahama2006 => "DiamondRamanEdgeAkahama2006",
            CalibrationModel::CbnRamanDatchi2007 => "cBNRamanDatchi2007",
        }
    }

    /// 可读名称
    pub fn long_name(&self) -> &'static str {
        match self {
            CalibrationModel::Ruby2020 => "Ruby 2020",
            CalibrationModel::SamariumBorateDatchi1997 => "Samarium Borate Datchi 1997",
            CalibrationModel::DiamondRamanEdgeAkahama2006 => "Diamond Raman Edge Akahama 2006",
            CalibrationModel::CbnRamanDatchi2007 => "cBN Raman Datchi 2007",
        }
    }

    /// 探针读数的名称
    pub fn probe_name(&self) -> &'static str {
        if self.is_raman() { "nu" } else { "lambda" }
    }

    /// 探针读数的单位
    pub fn probe_unit(&self) -> &'static str {
        if self.is_raman() { "cm-1" } else { "nm" }
    }

    /// 所用温度修正的名称
    pub fn temperature_correction(&self) -> &'static str {
        match self {
            CalibrationModel::Ruby2020 | CalibrationModel::CbnRamanDatchi2007 => "Datchi 2007",
            _ => "NA",
        }
    }

    /// 反演起点（零压下的典型读数）
    pub fn inverse_seed(&self) -> f64 {
        match self {
            CalibrationModel::Ruby2020 => 694.28,
            CalibrationModel::SamariumBorateDatchi1997 => 685.41,
            CalibrationModel::DiamondRamanEdgeAkahama2006 => 1333.0,
            CalibrationModel::CbnRamanDatchi2007 => 1054.0,
        }
    }

    /// 反演收敛判据（残差平方）
    ///
    /// 波长探针 (nm) 为 1e-6，波数探针 (cm-1) 为 1e-5。
    pub fn tolerance(&self) -> f64 {
        if self.is_raman() { 1e-5 } else { 1e-6 }
    }

    /// 读数的自然步长
    pub fn step(&self) -> f64 {
        if self.is_raman() { 0.1 } else { 0.01 }
    }

    /// 是否为 Raman 波数探针
    pub fn is_raman(&self) -> bool {
        matches!(
            self,
            CalibrationModel::DiamondRamanEdgeAkahama2006 | CalibrationModel::CbnRamanDatchi2007
        )
    }

    /// 正向公式：由读数 `x`、温度 `t`、参考读数 `x0`、参考温度 `t0` 计算压力 (GPa)
    ///
    /// 不检查结果是否有限，需要检查时使用 [`CalibrationModel::evaluate`]。
    pub fn pressure(&self, x: f64, t: f64, x0: f64, t0: f64) -> f64 {
        match self {
            CalibrationModel::Ruby2020 => ruby_2020(x, t, x0, t0),
            CalibrationModel::SamariumBorateDatchi1997 => samarium_datchi_1997(x, x0),
            CalibrationModel::DiamondRamanEdgeAkahama2006 => diamond_akahama_2006(x, x0),
            CalibrationModel::CbnRamanDatchi2007 => cbn_datchi_2007(x, t, x0, t0),
        }
    }

    /// 正向求值，结果非有限时返回 `Evaluation` 错误
    pub fn evaluate(&self, x: f64, t: f64, x0: f64, t0: f64) -> Result<f64> {
        let p = self.pressure(x, t, x0, t0);
        if p.is_finite() {
            Ok(p)
        } else {
            Err(PrlError::Evaluation {
                model: self.name().to_string(),
                reason: format!("x = {}, T = {}, x0 = {}, T0 = {} gives {}", x, t, x0, t0, p),
            })
        }
    }

    /// 读数 x 是否落在包含零压参考点的单调分支上
    ///
    /// Ruby 和金刚石的二次式在顶点另一侧给出同样的压力，Sm 的有理式在极点
    /// 另一侧还有一支，反演只接受参考点所在的这一支。
    pub fn is_physical_branch(&self, x: f64, t: f64, x0: f64, t0: f64) -> bool {
        if !(x.is_finite() && x > 0.0) {
            return false;
        }
        match self {
            CalibrationModel::Ruby2020 => 1.0 + 2.0 * 5.63 * ruby_shift(x, t, x0, t0) / x0 > 0.0,
            CalibrationModel::SamariumBorateDatchi1997 => 1.0 + 2.32e-2 * (x - x0) > 0.0,
            CalibrationModel::DiamondRamanEdgeAkahama2006 => {
                1.0 + (DIAMOND_K0P - 1.0) * (x - x0) / x0 > 0.0
            }
            CalibrationModel::CbnRamanDatchi2007 => cbn_nu0_t(t, x0, t0) > 0.0,
        }
    }
}

impl std::fmt::Display for CalibrationModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ─────────────────────────────────────────────────────────────
// 公式
// ─────────────────────────────────────────────────────────────

/// 扣除温度位移后的 Ruby 波长差
fn ruby_shift(x: f64, t: f64, x0: f64, t0: f64) -> f64 {
    let dt = t - t0;
    // Datchi 2007 温度修正
    let dl_corr = 0.00746 * dt - 3.01e-6 * dt.powi(2) + 8.76e-9 * dt.powi(3);
    (x - dl_corr) - x0
}

fn ruby_2020(x: f64, t: f64, x0: f64, t0: f64) -> f64 {
    let dl = ruby_shift(x, t, x0, t0);
    1870.0 * dl / x0 * (1.0 + 5.63 * dl / x0)
}

fn samarium_datchi_1997(x: f64, x0: f64) -> f64 {
    let dl = x - x0;
    4.032 * dl * (1.0 + 9.29e-3 * dl) / (1.0 + 2.32e-2 * dl)
}

const DIAMOND_K0P: f64 = 3.75;

fn diamond_akahama_2006(x: f64, x0: f64) -> f64 {
    const K0: f64 = 547.0;
    let dnu = x - x0;
    K0 * (dnu / x0) * (1.0 + 0.5 * (DIAMOND_K0P - 1.0) * dnu / x0)
}

fn cbn_datchi_2007(x: f64, t: f64, x0: f64, t0: f64) -> f64 {
    const B0P: f64 = 3.62;
    let nu0_t = cbn_nu0_t(t, x0, t0);
    let b0_t = 396.5 - 0.0288 * (t - 300.0) - 6.84e-6 * (t - 300.0).powi(2);
    (b0_t / B0P) * ((x / nu0_t).powf(2.876) - 1.0)
}

/// 温度 T 下的零压频率；零压零温参考频率每次由 (x0, T0) 重新推出
fn cbn_nu0_t(t: f64, x0: f64, t0: f64) -> f64 {
    let nu00 = x0 + 0.0091 * t0 + 1.54e-5 * t0.powi(2);
    nu00 - 0.0091 * t - 1.54e-5 * t.powi(2)
}

// ─────────────────────────────────────────────────────────────
// 注册表
// ─────────────────────────────────────────────────────────────

/// 有序的 名称 -> 模型 映射，启动时构建，之后只读
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    models: Vec<CalibrationModel>,
}

impl Registry {
    /// 从任意模型序列构建，重复项只保留首次出现的位置
    pub fn new(models: impl IntoIterator<Item = CalibrationModel>) -> Self {
        let mut unique = Vec::new();
        for model in models {
            if !unique.contains(&model) {
                unique.push(model);
            }
        }
        Registry { models: unique }
    }

    /// 全部内置模型
    pub fn builtin() -> Self {
        Registry::new(BUILTIN_MODELS)
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Result<CalibrationModel> {
        self.models
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| PrlError::UnknownCalibration {
                name: name.to_string(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = CalibrationModel> + '_ {
        self.models.iter().copied()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::builtin()
    }
}
