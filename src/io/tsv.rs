//! # 数据集的制表符分隔文件格式
//!
//! ## 格式说明
//! ```text
//! measuredRaw<TAB>pressure<TAB>probeReading<TAB>...<TAB>calibrationName<TAB>sourceTag
//! 0.0<TAB>16.121080273297533<TAB>700.0<TAB>...<TAB>Ruby2020<TAB>run1.txt
//! ```
//! - 小数点为 `.`，数值以完整精度写出（最短可精确回读的表示）
//! - 只有含制表符、引号或换行的 `sourceTag` 会被加引号
//!
//! ## 依赖关系
//! - 被 `commands/data.rs` 使用
//! - 使用 `models/` 的 Dataset, Table, Registry
//! - 使用 `csv` 库读写，`tempfile` 保证保存时整体替换

use crate::error::{PrlError, Result};
use crate::models::{Dataset, Registry, Table, TableRow, COLUMNS};

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 将表格快照写入输出流
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(COLUMNS)?;
    for row in &table.rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;

    Ok(())
}

/// 将数据集写成字节流
pub fn write(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_table(&dataset.to_table(), &mut buf)?;
    Ok(buf)
}

/// 从输入流读取表格，校验表头和数值
pub fn read_table<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers().map_err(to_parse_error)?.clone();
    if !headers.iter().eq(COLUMNS.iter().copied()) {
        return Err(PrlError::Parse {
            line: 1,
            reason: format!(
                "expected columns [{}], found [{}]",
                COLUMNS.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(to_parse_error)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: TableRow = record.deserialize(None).map_err(|e| PrlError::Parse {
            line,
            reason: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(Table::new(rows))
}

/// 从输入流读取数据集，标定名称按注册表解析
pub fn read<R: Read>(reader: R, registry: &Registry) -> Result<Dataset> {
    let table = read_table(reader)?;
    let mut dataset = Dataset::new();
    dataset.reconstruct_from_table(&table, registry)?;
    Ok(dataset)
}

/// 保存数据集到文件
pub fn save(dataset: &Dataset, path: &Path) -> Result<()> {
    save_table(&dataset.to_table(), path)
}

/// 保存表格快照到文件
///
/// 先写入同目录下的临时文件，写完后再改名覆盖目标，中途失败时原文件保持不变。
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    let write_error = |source: std::io::Error| PrlError::FileWriteError {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    write_table(table, BufWriter::new(tmp.as_file_mut()))?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    log::debug!("saved {} rows to '{}'", table.len(), path.display());
    Ok(())
}

/// 从文件加载数据集
pub fn load(path: &Path, registry: &Registry) -> Result<Dataset> {
    let file = File::open(path).map_err(|e| PrlError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    read(BufReader::new(file), registry)
}

fn to_parse_error(e: csv::Error) -> PrlError {
    if e.is_io_error() {
        return PrlError::CsvError(e);
    }
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    PrlError::Parse {
        line,
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalibrationModel, Measurement};

    const HEADER: &str = "measuredRaw\tpressure\tprobeReading\ttemperature\treferenceProbeReading\treferenceTemperature\tcalibrationName\tsourceTag";

    fn sample() -> Dataset {
        let mut data = Dataset::new();
        let mut m = Measurement::new(12.5, 0.0, 700.0, 298.0, 694.28, 298.0, CalibrationModel::Ruby2020, "run1.txt");
        m.recompute_pressure().unwrap();
        data.append(&m).unwrap();

        let mut m = Measurement::new(
            0.1 + 0.2,
            0.0,
            1100.0,
            300.0,
            1054.0,
            300.0,
            CalibrationModel::CbnRamanDatchi2007,
            "tab\there",
        );
        m.recompute_pressure().unwrap();
        data.append(&m).unwrap();

        let m = Measurement::new(
            1e-300,
            3.3333333333333335,
            1335.0,
            77.0,
            1333.0,
            298.0,
            CalibrationModel::DiamondRamanEdgeAkahama2006,
            "",
        );
        data.append(&m).unwrap();
        data
    }

    #[test]
    fn test_write_layout() {
        let bytes = write(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), HEADER);
        let first: Vec<&str> = lines.next().unwrap().split('\t').collect();
        assert_eq!(first.len(), 8);
        assert_eq!(first[2].parse::<f64>().unwrap(), 700.0);
        assert_eq!(first[6], "Ruby2020");
        assert_eq!(first[7], "run1.txt");
    }

    #[test]
    fn test_round_trip_exact() {
        let registry = Registry::builtin();
        let original = sample();
        let bytes = write(&original).unwrap();
        let restored = read(bytes.as_slice(), &registry).unwrap();
        assert_eq!(restored.to_table(), original.to_table());
        assert_eq!(restored.get(1).unwrap().source_tag(), "tab\there");
        assert_eq!(restored.get(2).unwrap().measured_raw(), 1e-300);
    }

    #[test]
    fn test_header_only() {
        let input = format!("{}\n", HEADER);
        let data = read(input.as_bytes(), &Registry::builtin()).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_header_mismatch() {
        let input = "Pm\tP\tx\tT\tx0\tT0\tcalib\tfile\n";
        let err = read(input.as_bytes(), &Registry::builtin()).unwrap_err();
        assert!(matches!(err, PrlError::Parse { line: 1, .. }));

        let err = read("".as_bytes(), &Registry::builtin()).unwrap_err();
        assert!(matches!(err, PrlError::Parse { .. }));
    }

    #[test]
    fn test_column_count_mismatch() {
        let input = format!("{}\n1.0\t2.0\t700.0\n", HEADER);
        let err = read(input.as_bytes(), &Registry::builtin()).unwrap_err();
        assert!(matches!(err, PrlError::Parse { .. }));
    }

    #[test]
    fn test_unparsable_number() {
        let input = format!(
            "{}\n0\t1,5\t700\t298\t694.28\t298\tRuby2020\tx\n",
            HEADER
        );
        let err = read(input.as_bytes(), &Registry::builtin()).unwrap_err();
        assert!(matches!(err, PrlError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unknown_calibration() {
        let input = format!(
            "{}\n0\t1.5\t700\t298\t694.28\t298\tRuby1986\tx\n",
            HEADER
        );
        let err = read(input.as_bytes(), &Registry::builtin()).unwrap_err();
        assert!(matches!(err, PrlError::UnknownCalibration { .. }));
    }

    #[test]
    fn test_restricted_registry() {
        let bytes = write(&sample()).unwrap();
        let registry = Registry::new([CalibrationModel::Ruby2020]);
        let err = read(bytes.as_slice(), &registry).unwrap_err();
        assert!(matches!(err, PrlError::UnknownCalibration { .. }));
    }

    #[test]
    fn test_save_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.tsv");
        std::fs::write(&path, "old contents that are longer than nothing\n").unwrap();

        let data = sample();
        save(&data, &path).unwrap();
        let loaded = load(&path, &Registry::builtin()).unwrap();
        assert_eq!(loaded.to_table(), data.to_table());

        save_table(&Table::default(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, format!("{}\n", HEADER));

        // 只剩目标文件，没有遗留的临时文件
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("run.tsv");
        let err = save(&sample(), &path).unwrap_err();
        assert!(matches!(err, PrlError::FileWriteError { .. }));
        assert!(!path.exists());
    }
}
