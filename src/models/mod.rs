//! # 数据模型模块
//!
//! 定义压力标定模型、测量记录与数据集。
//!
//! ## 依赖关系
//! - 被 `solver.rs`, `io/` 和 `commands/` 使用
//! - 子模块: calibration, measurement, table, dataset

pub mod calibration;
pub mod dataset;
pub mod measurement;
pub mod table;

pub use calibration::{CalibrationModel, Registry};
pub use dataset::{Dataset, SubscriptionId};
pub use measurement::Measurement;
pub use table::{Field, FieldValue, Table, TableRow, COLUMNS};
