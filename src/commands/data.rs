//! # data 命令实现
//!
//! 在 TSV 文件上编辑测量数据集。
//!
//! ## 功能
//! - 文件不存在时从空数据集开始
//! - 每次成功修改后，由订阅者把表格快照写回文件
//! - 终端表格按 3 位小数显示，文件保存完整精度
//!
//! ## 依赖关系
//! - 使用 `cli/data.rs` 定义的参数
//! - 使用 `models/dataset.rs`, `io/tsv.rs`
//! - 使用 `utils/output.rs`

use crate::cli::data::{AddArgs, DataArgs, DataCommands, RemoveArgs, SetArgs};
use crate::commands::convert::buffer_from;
use crate::error::{PrlError, Result};
use crate::io::tsv;
use crate::models::{Dataset, Field, FieldValue, Registry, Table};
use crate::utils::output;

use std::path::Path;
use tabled::Tabled;

/// 显示用表格行
#[derive(Debug, Clone, Tabled)]
struct DisplayRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Pm")]
    measured_raw: String,
    #[tabled(rename = "P (GPa)")]
    pressure: String,
    #[tabled(rename = "x")]
    probe_reading: String,
    #[tabled(rename = "T (K)")]
    temperature: String,
    #[tabled(rename = "x0")]
    reference_probe_reading: String,
    #[tabled(rename = "T0 (K)")]
    reference_temperature: String,
    #[tabled(rename = "Calibration")]
    calibration: String,
    #[tabled(rename = "Source")]
    source_tag: String,
}

fn display_rows(table: &Table) -> Vec<DisplayRow> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| DisplayRow {
            index: i,
            measured_raw: format!("{:.3}", r.measured_raw),
            pressure: format!("{:.3}", r.pressure),
            probe_reading: format!("{:.3}", r.probe_reading),
            temperature: format!("{:.3}", r.temperature),
            reference_probe_reading: format!("{:.3}", r.reference_probe_reading),
            reference_temperature: format!("{:.3}", r.reference_temperature),
            calibration: r.calibration_name.clone(),
            source_tag: r.source_tag.clone(),
        })
        .collect()
}

fn print_table(table: &Table) {
    if table.is_empty() {
        output::print_warning("Dataset is empty.");
        return;
    }
    println!("{}", tabled::Table::new(display_rows(table)));
}

/// 订阅数据集修改，把快照写回文件
fn persist(dataset: &mut Dataset, path: &Path) {
    let target = path.to_path_buf();
    dataset.subscribe(move |table| tsv::save_table(table, &target));
}

/// 打开数据集，文件不存在时新建
fn open_or_create(path: &Path, registry: &Registry) -> Result<Dataset> {
    let mut dataset = if path.exists() {
        tsv::load(path, registry)?
    } else {
        output::print_info(&format!("Starting new dataset '{}'", path.display()));
        Dataset::new()
    };
    persist(&mut dataset, path);
    Ok(dataset)
}

/// 执行 data 命令
pub fn execute(args: DataArgs) -> Result<()> {
    let registry = Registry::builtin();

    match args.command {
        DataCommands::Show => {
            let dataset = tsv::load(&args.file, &registry)?;
            output::print_header(&format!("{} ({} records)", args.file.display(), dataset.len()));
            print_table(&dataset.to_table());
            Ok(())
        }
        DataCommands::Add(add) => execute_add(add, &args.file, &registry),
        DataCommands::Remove(remove) => execute_remove(remove, &args.file, &registry),
        DataCommands::Set(set) => execute_set(set, &args.file, &registry),
    }
}

fn execute_add(args: AddArgs, path: &Path, registry: &Registry) -> Result<()> {
    let mut buffer = buffer_from(&args.conditions, registry)?;
    buffer.set_measured_raw(args.measured);
    buffer.set_source_tag(args.tag);

    if let Some(x) = args.reading {
        buffer.set_probe_reading(x);
        buffer.recompute_pressure()?;
    } else if let Some(p) = args.pressure {
        buffer.set_pressure(p);
        buffer.recompute_probe_reading()?;
    } else {
        return Err(PrlError::InvalidArgument(
            "either --reading or --pressure is required".to_string(),
        ));
    }

    let mut dataset = open_or_create(path, registry)?;
    let index = dataset.append(&buffer)?;
    output::print_success(&format!(
        "Added record {} (P = {:.3} GPa) to '{}'",
        index,
        buffer.pressure(),
        path.display()
    ));
    print_table(&dataset.to_table());
    Ok(())
}

fn execute_remove(args: RemoveArgs, path: &Path, registry: &Registry) -> Result<()> {
    let mut dataset = tsv::load(path, registry)?;
    persist(&mut dataset, path);

    match args.index {
        Some(index) => {
            dataset.remove_at(index)?;
            output::print_success(&format!("Removed record {}", index));
        }
        None if dataset.is_empty() => {
            output::print_skip("Dataset is already empty");
        }
        None => {
            dataset.remove_last()?;
            output::print_success("Removed last record");
        }
    }
    print_table(&dataset.to_table());
    Ok(())
}

fn execute_set(args: SetArgs, path: &Path, registry: &Registry) -> Result<()> {
    let mut dataset = tsv::load(path, registry)?;
    persist(&mut dataset, path);

    let field: Field = args.field.parse()?;
    let value = FieldValue::parse(field, &args.value, registry)?;
    dataset.set(args.index, field, value)?;

    output::print_success(&format!("Set {} of record {}", field, args.index));
    print_table(&dataset.to_table());
    Ok(())
}
