//! Writers for [`MatchResultSet`]: CSV, JSON, Parquet and a pretty table.
//!
//! Flat formats (CSV, Parquet, pretty) concatenate all tables and prefix
//! each row with its zero-based `group`, the index of its table.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use crate::data::model::CellValue;
use crate::matcher::{MatchResultSet, OutputColumn};

pub const GROUP: &str = "group";

fn is_numeric(column: OutputColumn) -> bool {
    matches!(
        column,
        OutputColumn::TheoreticalMass | OutputColumn::ExperimentalMass | OutputColumn::ErrorPpm
    )
}

fn format_cell(column: OutputColumn, cell: &CellValue) -> String {
    match (column, cell) {
        (OutputColumn::ErrorPpm, CellValue::Float(v)) => format!("{v:.2}"),
        _ => cell.to_string(),
    }
}

/// Write all tables as one CSV document.
pub fn write_csv<W: Write>(result: &MatchResultSet, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec![GROUP];
    header.extend(result.headers());
    csv.write_record(&header).context("writing CSV header")?;

    let columns = result.mode.output_columns();
    for (group, table) in result.iter().enumerate() {
        for cells in result.rows(table) {
            let mut record = vec![group.to_string()];
            record.extend(
                columns
                    .iter()
                    .zip(&cells)
                    .map(|(column, cell)| format_cell(*column, cell)),
            );
            csv.write_record(&record).context("writing CSV row")?;
        }
    }
    csv.flush().context("flushing CSV")?;
    Ok(())
}

#[derive(Serialize)]
struct TableView<'a> {
    theoretical_mass: f64,
    columns: &'a [&'a str],
    rows: Vec<Vec<CellValue>>,
}

/// Write the result set as a JSON array of `{ theoretical_mass, columns, rows }`.
pub fn write_json<W: Write>(result: &MatchResultSet, writer: W) -> Result<()> {
    let headers = result.headers();
    let views: Vec<TableView<'_>> = result
        .iter()
        .map(|table| TableView {
            theoretical_mass: table.theoretical_mass,
            columns: &headers,
            rows: result.rows(table).collect(),
        })
        .collect();
    serde_json::to_writer_pretty(writer, &views).context("writing JSON")?;
    Ok(())
}

/// Flatten the result set into one Arrow batch.
pub fn to_record_batch(result: &MatchResultSet) -> Result<RecordBatch> {
    let records: Vec<(usize, _)> = result
        .iter()
        .enumerate()
        .flat_map(|(group, table)| table.records.iter().map(move |r| (group, r)))
        .collect();

    let mut fields = vec![Field::new(GROUP, DataType::Int64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int64Array::from(
        records.iter().map(|(g, _)| *g as i64).collect::<Vec<_>>(),
    ))];

    for (column, header) in result.mode.output_columns().iter().zip(result.headers()) {
        let cells = records.iter().map(|(_, r)| r.cell(*column));
        if is_numeric(*column) {
            fields.push(Field::new(header, DataType::Float64, true));
            let values: Vec<Option<f64>> = cells.map(|c| c.as_f64()).collect();
            arrays.push(Arc::new(Float64Array::from(values)));
        } else {
            fields.push(Field::new(header, DataType::Utf8, true));
            let values: Vec<Option<String>> = cells
                .map(|c| (!c.is_null()).then(|| c.to_string()))
                .collect();
            arrays.push(Arc::new(StringArray::from(values)));
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context("building record batch")
}

/// Write the flattened result set as a Parquet file.
pub fn write_parquet(result: &MatchResultSet, path: &Path) -> Result<()> {
    let batch = to_record_batch(result)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Render the flattened result set as a text table.
pub fn pretty(result: &MatchResultSet) -> Result<String> {
    let batch = to_record_batch(result)?;
    Ok(pretty_format_batches(&[batch])
        .context("formatting table")?
        .to_string())
}

/// Write to `path`, picking the format from its extension.
pub fn write_results(result: &MatchResultSet, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let create = || {
        std::fs::File::create(path)
            .map(std::io::BufWriter::new)
            .with_context(|| format!("creating {}", path.display()))
    };

    match ext.as_str() {
        "csv" => write_csv(result, create()?),
        "json" => write_json(result, create()?),
        "parquet" | "pq" => write_parquet(result, path),
        other => bail!("Unsupported output extension: .{other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{MatchMode, MatchRecord, MatchTable};

    fn result() -> MatchResultSet {
        MatchResultSet {
            mode: MatchMode::Monoisotopic,
            experimental_mass_column: "Neutral mass (Da)".into(),
            tables: vec![MatchTable {
                theoretical_mass: 100.0,
                records: vec![MatchRecord {
                    name: "A".into(),
                    formula: CellValue::Null,
                    theoretical_mass: 100.0,
                    experimental_mass: 100.0004,
                    compound: "F0".into(),
                    error_ppm: 4.0,
                    adduct: None,
                    structure: None,
                }],
            }],
        }
    }

    #[test]
    fn csv_has_group_and_two_decimal_error() {
        let mut out = Vec::new();
        write_csv(&result(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "group,Name,Formula,Monoisotopic_mass,Neutral mass (Da),Compound,error_ppm"
        );
        assert_eq!(lines[1], "0,A,,100,100.0004,F0,4.00");
    }

    #[test]
    fn json_lists_tables() {
        let mut out = Vec::new();
        write_json(&result(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["theoretical_mass"], 100.0);
        assert_eq!(value[0]["columns"][5], "error_ppm");
        assert_eq!(value[0]["rows"][0][1], serde_json::Value::Null);
    }

    #[test]
    fn batch_has_one_row_per_record() {
        let batch = to_record_batch(&result()).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 7);
        assert_eq!(batch.schema().field(3).data_type(), &DataType::Float64);
        assert!(pretty(&result()).unwrap().contains("100.0004"));
    }

    #[test]
    fn unknown_output_extension() {
        assert!(write_results(&result(), Path::new("out.xlsx")).is_err());
    }
}
