//! # 测量数据集
//!
//! 有序的测量记录集合，保存的是独立副本。每次成功修改后，按订阅顺序
//! 同步通知所有订阅者，参数为修改后的表格快照。
//!
//! ## 自动重算规则
//! `set_field` 模拟表格单元格编辑，是唯一会自动重算的入口：
//! - `pressure` -> 反演 `probeReading`
//! - `probeReading`, `referenceProbeReading`, `temperature`, `referenceTemperature` -> 重算 `pressure`
//! - `measuredRaw`, `calibrationName`, `sourceTag` -> 不重算
//!
//! ## 依赖关系
//! - 被 `io/tsv.rs`, `commands/data.rs` 使用
//! - 使用 `models/measurement.rs`, `models/table.rs`, `models/calibration.rs`

use crate::error::{PrlError, Result};
use crate::models::table::{Field, FieldValue, Table, TableRow};
use crate::models::{Measurement, Registry};

/// 订阅者回调，返回错误时传递给修改操作的调用者
pub type Subscriber = Box<dyn FnMut(&Table) -> Result<()>>;

/// 订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// 测量数据集
///
/// 单线程使用，不加锁；订阅者不得在回调中再次修改数据集。
#[derive(Default)]
pub struct Dataset {
    records: Vec<Measurement>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field("records", &self.records)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Dataset {
    pub fn new() -> Self {
        Dataset::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Measurement> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.records.iter()
    }

    // ─────────────────────────────────────────────────────────────
    // 订阅
    // ─────────────────────────────────────────────────────────────

    pub fn subscribe(&mut self, callback: impl FnMut(&Table) -> Result<()> + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// 取消订阅，未知句柄被忽略
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sid, _)| *sid != id);
    }

    fn notify(&mut self) -> Result<()> {
        if self.subscribers.is_empty() {
            return Ok(());
        }
        let table = self.to_table();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&table)?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // 修改操作
    // ─────────────────────────────────────────────────────────────

    /// 追加记录的独立副本，返回新索引
    pub fn append(&mut self, measurement: &Measurement) -> Result<usize> {
        self.records.push(measurement.clone());
        let index = self.records.len() - 1;
        log::debug!("dataset: appended record {}", index);
        self.notify()?;
        Ok(index)
    }

    /// 删除最后一条记录，空数据集时什么也不做
    pub fn remove_last(&mut self) -> Result<()> {
        if self.records.pop().is_some() {
            log::debug!("dataset: removed last record, {} left", self.records.len());
            self.notify()?;
        }
        Ok(())
    }

    /// 删除指定索引的记录，其后的记录索引减一
    pub fn remove_at(&mut self, index: usize) -> Result<Measurement> {
        self.check_index(index)?;
        let removed = self.records.remove(index);
        log::debug!("dataset: removed record {}", index);
        self.notify()?;
        Ok(removed)
    }

    /// 整条替换记录
    pub fn replace(&mut self, index: usize, measurement: &Measurement) -> Result<()> {
        self.check_index(index)?;
        self.records[index] = measurement.clone();
        log::debug!("dataset: replaced record {}", index);
        self.notify()?;
        Ok(())
    }

    /// 按列名编辑单个字段（表格单元格编辑）
    pub fn set_field(&mut self, index: usize, field: &str, value: FieldValue) -> Result<()> {
        let field: Field = field.parse()?;
        self.set(index, field, value)
    }

    /// 编辑单个字段并按规则自动重算
    ///
    /// 在副本上修改，重算成功后才写回，失败时记录保持不变。
    pub fn set(&mut self, index: usize, field: Field, value: FieldValue) -> Result<()> {
        self.check_index(index)?;
        let mut record = self.records[index].clone();

        match (field, value) {
            (Field::Calibration, FieldValue::Calibration(model)) => {
                record.reassign_calibration(model)
            }
            (Field::SourceTag, FieldValue::Text(tag)) => record.set_source_tag(tag),
            (Field::MeasuredRaw, FieldValue::Number(v)) => record.set_measured_raw(v),
            (Field::Pressure, FieldValue::Number(v)) => {
                record.set_pressure(v);
                record.recompute_probe_reading()?;
            }
            (Field::ProbeReading, FieldValue::Number(v)) => {
                record.set_probe_reading(v);
                record.recompute_pressure()?;
            }
            (Field::Temperature, FieldValue::Number(v)) => {
                record.set_temperature(v);
                record.recompute_pressure()?;
            }
            (Field::ReferenceProbeReading, FieldValue::Number(v)) => {
                record.set_reference_probe_reading(v);
                record.recompute_pressure()?;
            }
            (Field::ReferenceTemperature, FieldValue::Number(v)) => {
                record.set_reference_temperature(v);
                record.recompute_pressure()?;
            }
            (field, value) => {
                return Err(PrlError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("unexpected value {:?}", value),
                });
            }
        }

        self.records[index] = record;
        log::debug!("dataset: set {} of record {}", field, index);
        self.notify()
    }

    // ─────────────────────────────────────────────────────────────
    // 表格
    // ─────────────────────────────────────────────────────────────

    /// 固定列顺序的表格快照
    pub fn to_table(&self) -> Table {
        Table::new(self.records.iter().map(TableRow::from).collect())
    }

    /// 由表格整体替换内容
    ///
    /// 任一行的标定名称无法解析时返回 `UnknownCalibration`，数据集保持不变。
    pub fn reconstruct_from_table(&mut self, table: &Table, registry: &Registry) -> Result<()> {
        let records = table
            .rows
            .iter()
            .map(|row| row.to_measurement(registry))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("dataset: reconstructed {} records from table", records.len());
        self.records = records;
        self.notify()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(PrlError::Index {
                index,
                len: self.records.len(),
            })
        }
    }
}
