//! # myprl - 光谱压标换算
//!
//! 由光谱探针读数（红宝石/SrB4O7:Sm2+ 荧光波长、金刚石/cBN Raman 波数）
//! 计算压力，或由压力反演读数，并维护可导出的测量数据集。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── models/    (标定模型、测量记录、数据集)
//!   │     ├── solver.rs  (数值反演)
//!   │     └── io/        (TSV 读写)
//!   ├── utils/      (终端输出)
//!   └── error.rs    (错误处理)
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod io;
pub mod models;
pub mod solver;
pub mod utils;

pub use error::{PrlError, Result};
pub use models::{CalibrationModel, Dataset, Measurement, Registry};
pub use solver::{Solver, SolverConfig};
