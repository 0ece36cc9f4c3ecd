use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Post-processing applied to a freshly parsed table.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Replace the header positionally (one name per column).
    pub column_names: Option<Vec<String>>,
    /// Keep only these columns, in this order (applied after renaming).
    pub keep: Option<Vec<String>>,
    /// Zero-based worksheet index for `.xls` / `.xlsx` workbooks;
    /// [`DEFAULT_SHEET`] when unset.
    pub sheet: Option<usize>,
}

/// MetExplore / MetaboRank workbooks keep the ranked table on the second sheet.
pub const DEFAULT_SHEET: usize = 1;

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma-separated, header row
/// * `.tsv` / `.txt`  – tab-separated, header row (MetExplore / MetaboRank exports)
/// * `.json`          – `[{ "Name": ..., "Formula": ..., ... }, ...]`
/// * `.parquet`       – flat scalar columns
/// * `.xls` / `.xlsx` – one worksheet, header row first
pub fn load_file(path: &Path) -> Result<Table> {
    load_file_with(path, &LoadOptions::default())
}

/// [`load_file`] followed by the renaming / column selection in `options`.
pub fn load_file_with(path: &Path, options: &LoadOptions) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_delimited(path, b','),
        "tsv" | "txt" => load_delimited(path, b'\t'),
        "xls" | "xlsx" | "xlsm" | "ods" => {
            load_workbook(path, options.sheet.unwrap_or(DEFAULT_SHEET))
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if let Some(names) = &options.column_names {
        table.rename_columns(names).context("renaming columns")?;
    }
    if let Some(keep) = &options.keep {
        table = table
            .select(keep, &path.display().to_string())
            .context("selecting columns")?;
    }

    debug!(
        "loaded {} rows x {} columns from {}",
        table.len(),
        table.column_names().count(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Name": "Glucose", "Formula": "C6H12O6", "Monoisotopic_mass": 180.0634 },
///   ...
/// ]
/// ```
///
/// A key missing from some records yields `Null` cells for those rows.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(name).map_or(CellValue::Null, json_to_cell))
                .collect();
            (name.clone(), values)
        })
        .collect::<Vec<_>>();

    Ok(Table::from_columns(columns)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per row. Every column is typed
/// cell by cell; see [`guess_cell_type`].
fn load_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .context("opening delimited file")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "row {row_no}: {} fields but the header has {}",
                record.len(),
                headers.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            columns[col_idx].push(guess_cell_type(value));
        }
    }

    Ok(Table::from_columns(headers.into_iter().zip(columns))?)
}

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() || s == "NaN" || s == "nan" {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Load worksheet `sheet` (zero-based) of a spreadsheet workbook. The first
/// row is the header; every following row is a record.
pub fn load_workbook(path: &Path, sheet: usize) -> Result<Table> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let names = workbook.sheet_names();
    let range = workbook
        .worksheet_range_at(sheet)
        .with_context(|| format!("no sheet {sheet}; workbook has {names:?}"))?
        .with_context(|| format!("reading sheet {sheet}"))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Table::default());
    };
    let headers: Vec<String> = header.iter().map(|c| c.to_string()).collect();

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];
    for row in rows {
        for (col_idx, cell) in row.iter().enumerate() {
            columns[col_idx].push(workbook_cell(cell));
        }
    }

    Ok(Table::from_columns(headers.into_iter().zip(columns))?)
}

fn workbook_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) => guess_cell_type(s),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns (strings, ints, floats,
/// bools). Other Arrow types are kept as their display string.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, array) in batch.columns().iter().enumerate() {
            for row in 0..batch.num_rows() {
                let cell = extract_cell(array, row)
                    .with_context(|| format!("column '{}', row {row}", names[col_idx]))?;
                columns[col_idx].push(cell);
            }
        }
    }

    Ok(Table::from_columns(names.into_iter().zip(columns))?)
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string_opt::<i32>().context("expected StringArray")?;
            CellValue::String(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string_opt::<i64>().context("expected LargeStringArray")?;
            CellValue::String(arr.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col.as_primitive_opt::<Int32Type>().context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_primitive_opt::<Int64Type>().context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_primitive_opt::<Float32Type>().context("expected Float32Array")?;
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_primitive_opt::<Float64Type>().context("expected Float64Array")?;
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_boolean_opt().context("expected BooleanArray")?;
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(array_value_to_string(col, row)?),
    };
    Ok(cell)
}
