//! # 标定公式的数值反演
//!
//! 给定目标压力，求使 `model.pressure(x, T, x0, T0)` 等于该压力的读数 `x`。
//!
//! ## 算法概述
//! 1. 从种子读数出发（模型默认种子或调用者提供的当前读数）
//! 2. 以中心差分估计 dP/dx
//! 3. 对残差平方做 Gauss-Newton 步，若残差未下降则步长减半
//! 4. 残差平方低于模型容差时收敛
//!
//! 求解是确定性的：相同输入给出相同结果，失败时不会自动换种子重试。
//!
//! ## 依赖关系
//! - 被 `models/measurement.rs` 调用
//! - 使用 `models/calibration.rs` 的 CalibrationModel

use crate::error::{PrlError, Result};
use crate::models::CalibrationModel;

/// 求解器配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// 最大迭代次数
    pub max_iterations: usize,
    /// 残差平方容差，`None` 时使用模型自带的容差
    pub tolerance: Option<f64>,
    /// 每次迭代中步长减半的最大次数
    pub max_halvings: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            max_iterations: 100,
            tolerance: None,
            max_halvings: 30,
        }
    }
}

/// 反演问题的固定参数
#[derive(Debug, Clone, Copy)]
struct Problem {
    model: CalibrationModel,
    target: f64,
    t: f64,
    x0: f64,
    t0: f64,
}

impl Problem {
    fn residual(&self, x: f64) -> Option<f64> {
        let r = self.model.pressure(x, self.t, self.x0, self.t0) - self.target;
        r.is_finite().then_some(r)
    }

    fn slope(&self, x: f64) -> Option<f64> {
        let h = 1e-6 * x.abs().max(1.0);
        let forward = self.residual(x + h)?;
        let backward = self.residual(x - h)?;
        let d = (forward - backward) / (2.0 * h);
        (d.is_finite() && d != 0.0).then_some(d)
    }
}

/// 标量反演求解器
#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Solver { config }
    }

    /// 求读数 `x` 使 `model.pressure(x, t, x0, t0) ≈ target`
    ///
    /// `seed` 为 `None` 时从 `model.inverse_seed()` 出发。
    ///
    /// 收敛点必须落在包含参考读数的单调分支上
    /// （见 `CalibrationModel::is_physical_branch`），从另一支出发的种子会失败而不是
    /// 返回一个数值上成立但无物理意义的根。
    ///
    /// # Errors
    /// 迭代预算内未收敛、导数退化或结果不在物理分支上时返回
    /// `PrlError::Inversion`，携带最后的残差和迭代次数。
    pub fn invert(
        &self,
        model: CalibrationModel,
        target: f64,
        t: f64,
        x0: f64,
        t0: f64,
        seed: Option<f64>,
    ) -> Result<f64> {
        let problem = Problem {
            model,
            target,
            t,
            x0,
            t0,
        };
        let tolerance = self.config.tolerance.unwrap_or_else(|| model.tolerance());
        let mut x = seed.unwrap_or_else(|| model.inverse_seed());

        let fail = |residual: f64, iterations: usize| {
            log::warn!(
                "{}: inversion for P = {} stopped after {} iterations (residual {:e})",
                model,
                target,
                iterations,
                residual
            );
            PrlError::Inversion {
                model: model.name().to_string(),
                target,
                residual,
                iterations,
            }
        };

        let mut r = problem.residual(x).ok_or_else(|| fail(f64::NAN, 0))?;

        for iteration in 0..=self.config.max_iterations {
            if r * r < tolerance {
                if !model.is_physical_branch(x, t, x0, t0) {
                    return Err(fail(r, iteration));
                }
                log::debug!(
                    "{}: P = {} -> x = {} in {} iterations",
                    model,
                    target,
                    x,
                    iteration
                );
                return Ok(x);
            }
            if iteration == self.config.max_iterations {
                break;
            }

            let slope = problem.slope(x).ok_or_else(|| fail(r, iteration))?;
            let mut step = r / slope;
            let mut accepted = false;

            for _ in 0..=self.config.max_halvings {
                let candidate = x - step;
                if let Some(rc) = problem.residual(candidate) {
                    if rc.abs() < r.abs() {
                        x = candidate;
                        r = rc;
                        accepted = true;
                        break;
                    }
                }
                step *= 0.5;
            }

            log::trace!("{}: iteration {} x = {} residual = {:e}", model, iteration, x, r);

            if !accepted {
                return Err(fail(r, iteration + 1));
            }
        }

        Err(fail(r, self.config.max_iterations))
    }
}

/// 使用默认配置反演
pub fn invert(
    model: CalibrationModel,
    target: f64,
    t: f64,
    x0: f64,
    t0: f64,
    seed: Option<f64>,
) -> Result<f64> {
    Solver::default().invert(model, target, t, x0, t0, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calibration::BUILTIN_MODELS;

    #[test]
    fn test_round_trip_all_models() {
        for model in BUILTIN_MODELS {
            let seed = model.inverse_seed();
            let x_tol = if model.is_raman() { 0.05 } else { 5e-3 };
            let offsets = if model.is_raman() {
                [0.0, 5.0, 40.0, 120.0]
            } else {
                [0.0, 0.5, 5.0, 20.0]
            };
            for t in [100.0, 298.0, 600.0] {
                for t0 in [298.0, 300.0] {
                    for dx in offsets {
                        let x = seed + dx;
                        let p = model.pressure(x, t, seed, t0);
                        let back = invert(model, p, t, seed, t0, None).unwrap();
                        let p_back = model.pressure(back, t, seed, t0);
                        assert!(
                            (p_back - p).powi(2) < model.tolerance(),
                            "{} x={} T={} T0={}",
                            model,
                            x,
                            t,
                            t0
                        );
                        assert!((back - x).abs() < x_tol, "{} x={} got {}", model, x, back);
                    }
                }
            }
        }
    }

    #[test]
    fn test_seed_from_current_reading() {
        let model = CalibrationModel::Ruby2020;
        let p = model.pressure(710.0, 298.0, 694.28, 298.0);
        let x = invert(model, p, 298.0, 694.28, 298.0, Some(709.9)).unwrap();
        assert!((x - 710.0).abs() < 1e-3);
    }

    #[test]
    fn test_deterministic() {
        let model = CalibrationModel::DiamondRamanEdgeAkahama2006;
        let a = invert(model, 42.0, 298.0, 1333.0, 298.0, None).unwrap();
        let b = invert(model, 42.0, 298.0, 1333.0, 298.0, None).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let solver = Solver::new(SolverConfig {
            max_iterations: 0,
            ..SolverConfig::default()
        });
        let err = solver
            .invert(CalibrationModel::Ruby2020, 50.0, 298.0, 694.28, 298.0, None)
            .unwrap_err();
        match err {
            PrlError::Inversion {
                iterations,
                residual,
                ..
            } => {
                assert_eq!(iterations, 0);
                assert!(residual.abs() > 1.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unphysical_result_rejected() {
        // 需要负波长才能达到的压力
        let err = invert(CalibrationModel::Ruby2020, -2000.0, 298.0, 694.28, 298.0, None);
        assert!(matches!(err, Err(PrlError::Inversion { .. })));
    }

    #[test]
    fn test_far_branch_seed_rejected() {
        // 600 nm 在 Sm 极点 (≈642.3 nm) 之外，那一支上 P = 5 也有一个根
        let sm = CalibrationModel::SamariumBorateDatchi1997;
        let err = invert(sm, 5.0, 298.0, 685.41, 298.0, Some(600.0));
        assert!(matches!(err, Err(PrlError::Inversion { .. })));

        let x = invert(sm, 5.0, 298.0, 685.41, 298.0, None).unwrap();
        assert!(x > 685.41 && x < 690.0, "got {}", x);

        // Ruby 顶点 (≈632.6 nm) 以下的种子
        let err = invert(CalibrationModel::Ruby2020, 5.0, 298.0, 694.28, 298.0, Some(600.0));
        assert!(matches!(err, Err(PrlError::Inversion { .. })));
    }
}
