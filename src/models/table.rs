//! # 数据集的表格表示
//!
//! 固定列顺序的行快照，以及按列名寻址的字段。
//!
//! ## 列顺序
//! ```text
//! measuredRaw pressure probeReading temperature referenceProbeReading referenceTemperature calibrationName sourceTag
//! ```
//!
//! ## 依赖关系
//! - 被 `models/dataset.rs`, `io/tsv.rs` 使用
//! - 使用 `models/calibration.rs`, `models/measurement.rs`

use crate::error::{PrlError, Result};
use crate::models::{CalibrationModel, Measurement, Registry};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 表头，顺序固定
pub const COLUMNS: [&str; 8] = [
    "measuredRaw",
    "pressure",
    "probeReading",
    "temperature",
    "referenceProbeReading",
    "referenceTemperature",
    "calibrationName",
    "sourceTag",
];

/// 表格中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub measured_raw: f64,
    pub pressure: f64,
    pub probe_reading: f64,
    pub temperature: f64,
    pub reference_probe_reading: f64,
    pub reference_temperature: f64,
    pub calibration_name: String,
    pub source_tag: String,
}

impl From<&Measurement> for TableRow {
    fn from(m: &Measurement) -> Self {
        TableRow {
            measured_raw: m.measured_raw(),
            pressure: m.pressure(),
            probe_reading: m.probe_reading(),
            temperature: m.temperature(),
            reference_probe_reading: m.reference_probe_reading(),
            reference_temperature: m.reference_temperature(),
            calibration_name: m.calibration().name().to_string(),
            source_tag: m.source_tag().to_string(),
        }
    }
}

impl TableRow {
    /// 按注册表解析标定名称，还原为记录
    pub fn to_measurement(&self, registry: &Registry) -> Result<Measurement> {
        let calibration = registry.get(&self.calibration_name)?;
        Ok(Measurement::new(
            self.measured_raw,
            self.pressure,
            self.probe_reading,
            self.temperature,
            self.reference_probe_reading,
            self.reference_temperature,
            calibration,
            self.source_tag.clone(),
        ))
    }
}

/// 行有序的表格快照
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Table { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// 可按列名编辑的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MeasuredRaw,
    Pressure,
    ProbeReading,
    Temperature,
    ReferenceProbeReading,
    ReferenceTemperature,
    Calibration,
    SourceTag,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::MeasuredRaw,
        Field::Pressure,
        Field::ProbeReading,
        Field::Temperature,
        Field::ReferenceProbeReading,
        Field::ReferenceTemperature,
        Field::Calibration,
        Field::SourceTag,
    ];

    /// 对应的列名
    pub fn column(&self) -> &'static str {
        match self {
            Field::MeasuredRaw => COLUMNS[0],
            Field::Pressure => COLUMNS[1],
            Field::ProbeReading => COLUMNS[2],
            Field::Temperature => COLUMNS[3],
            Field::ReferenceProbeReading => COLUMNS[4],
            Field::ReferenceTemperature => COLUMNS[5],
            Field::Calibration => COLUMNS[6],
            Field::SourceTag => COLUMNS[7],
        }
    }

    /// 数值列（前六列）
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Field::Calibration | Field::SourceTag)
    }
}

impl FromStr for Field {
    type Err = PrlError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "calib" {
            return Ok(Field::Calibration);
        }
        Field::ALL
            .into_iter()
            .find(|f| f.column() == s)
            .ok_or_else(|| PrlError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// 写入字段的值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Calibration(CalibrationModel),
}

impl FieldValue {
    /// 按字段类型解析单元格字符串
    pub fn parse(field: Field, raw: &str, registry: &Registry) -> Result<Self> {
        if field.is_numeric() {
            return raw
                .trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .map_err(|e| PrlError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("'{}': {}", raw, e),
                });
        }
        match field {
            Field::Calibration => Ok(FieldValue::Calibration(registry.get(raw.trim())?)),
            _ => Ok(FieldValue::Text(raw.to_string())),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<CalibrationModel> for FieldValue {
    fn from(v: CalibrationModel) -> Self {
        FieldValue::Calibration(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        for (field, column) in Field::ALL.iter().zip(COLUMNS) {
            assert_eq!(column.parse::<Field>().unwrap(), *field);
        }
        assert_eq!("calib".parse::<Field>().unwrap(), Field::Calibration);
        assert!(matches!(
            "lambda".parse::<Field>(),
            Err(PrlError::UnknownField(_))
        ));
    }

    #[test]
    fn test_field_value_parse() {
        let registry = Registry::builtin();
        assert_eq!(
            FieldValue::parse(Field::Pressure, " 12.5", &registry).unwrap(),
            FieldValue::Number(12.5)
        );
        assert_eq!(
            FieldValue::parse(Field::Calibration, "Ruby2020", &registry).unwrap(),
            FieldValue::Calibration(CalibrationModel::Ruby2020)
        );
        assert_eq!(
            FieldValue::parse(Field::SourceTag, "spec 01.txt", &registry).unwrap(),
            FieldValue::Text("spec 01.txt".to_string())
        );
        assert!(matches!(
            FieldValue::parse(Field::Temperature, "hot", &registry),
            Err(PrlError::InvalidValue { .. })
        ));
        assert!(matches!(
            FieldValue::parse(Field::Calibration, "Gold", &registry),
            Err(PrlError::UnknownCalibration { .. })
        ));

        // 数值列一律按数字解析，文本列保留原样
        for field in Field::ALL {
            let parsed = FieldValue::parse(field, "7", &Registry::builtin());
            if field.is_numeric() {
                assert_eq!(parsed.unwrap(), FieldValue::Number(7.0), "{}", field);
            } else {
                assert!(!matches!(parsed, Ok(FieldValue::Number(_))), "{}", field);
            }
        }
        assert_eq!(Field::ALL.iter().filter(|f| f.is_numeric()).count(), 6);
    }

    #[test]
    fn test_row_round_trip_through_registry() {
        let m = Measurement::initial(CalibrationModel::DiamondRamanEdgeAkahama2006);
        let row = TableRow::from(&m);
        assert_eq!(row.calibration_name, "DiamondRamanEdgeAkahama2006");
        let back = row.to_measurement(&Registry::builtin()).unwrap();
        assert_eq!(back, m);
    }
}
