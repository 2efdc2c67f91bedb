//! # 统一错误处理模块
//!
//! 定义 myprl 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// myprl 统一错误类型
#[derive(Error, Debug)]
pub enum PrlError {
    // ─────────────────────────────────────────────────────────────
    // 标定模型错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown calibration: '{name}'")]
    UnknownCalibration { name: String },

    #[error(
        "Inversion of {model} failed for P = {target} GPa after {iterations} iterations (residual {residual:e})"
    )]
    Inversion {
        model: String,
        target: f64,
        residual: f64,
        iterations: usize,
    },

    #[error("Cannot evaluate {model}: {reason}")]
    Evaluation { model: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 数据集错误
    // ─────────────────────────────────────────────────────────────
    #[error("Index {index} out of range for dataset of length {len}")]
    Index { index: usize, len: usize },

    #[error("Unknown field: '{0}'")]
    UnknownField(String),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 表格文件错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse table at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, PrlError>;
