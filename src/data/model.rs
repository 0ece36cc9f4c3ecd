use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
/// `Null` stands for an empty cell (`NaN` / `None` in the exporting tool).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so cells can be sorted and kept in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl CellValue {
    /// Interpret the value as an `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Empty cells and float `NaN`s both count as missing.
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Column / Table – column-oriented storage
// ---------------------------------------------------------------------------

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// A column-oriented table: rows are addressed by position, columns by name.
///
/// Every column holds the same number of rows and names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from `(name, values)` pairs, validating lengths and names.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<CellValue>)>,
        S: Into<String>,
    {
        let mut table = Table::default();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Append a column. The first column fixes the row count.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<CellValue>) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::DuplicateColumn(name));
        }
        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(Error::ColumnLength {
                column: name,
                expected: self.n_rows,
                found: values.len(),
            });
        }
        self.columns.push(Column { name, values });
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Look a column up by name. `table` names the table in the error.
    pub fn column(&self, name: &str, table: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::MissingColumn {
                table: table.to_string(),
                column: name.to_string(),
            })
    }

    /// Read a column as optional floats: nulls become `None`, any other
    /// non-numeric cell is an error.
    pub fn f64_column(&self, name: &str, table: &str) -> Result<Vec<Option<f64>>> {
        let column = self.column(name, table)?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                if value.is_null() {
                    return Ok(None);
                }
                value.as_f64().map(Some).ok_or_else(|| Error::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Read every column as numbers and return the table row by row.
    /// Null cells are rejected as well.
    pub fn to_f64_rows(&self, table: &str) -> Result<Vec<Vec<f64>>> {
        let mut rows = vec![Vec::with_capacity(self.columns.len()); self.n_rows];
        for column in &self.columns {
            for (row, value) in self.f64_column(&column.name, table)?.into_iter().enumerate() {
                let v = value.ok_or_else(|| Error::NonNumeric {
                    column: column.name.clone(),
                    row,
                    value: String::new(),
                })?;
                rows[row].push(v);
            }
        }
        Ok(rows)
    }

    /// Cell at `row` of column `name`, if both exist.
    pub fn cell(&self, name: &str, row: usize) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.values.get(row))
    }

    /// Rename all columns positionally.
    pub fn rename_columns(&mut self, names: &[String]) -> Result<()> {
        if names.len() != self.columns.len() {
            return Err(Error::Shape(format!(
                "{} column names given for {} columns",
                names.len(),
                self.columns.len()
            )));
        }
        let unique: BTreeSet<&String> = names.iter().collect();
        if unique.len() != names.len() {
            let dup = names
                .iter()
                .enumerate()
                .find(|(i, n)| names[..*i].contains(n))
                .map(|(_, n)| n.clone())
                .unwrap_or_default();
            return Err(Error::DuplicateColumn(dup));
        }
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name.clone();
        }
        Ok(())
    }

    /// A new table holding only `names`, in that order.
    pub fn select(&self, names: &[String], table: &str) -> Result<Table> {
        let mut out = Table::default();
        for name in names {
            let column = self.column(name, table)?;
            out.push_column(name.clone(), column.values.clone())?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            ("Name", vec!["glucose".into(), "alanine".into()]),
            ("mass", vec![CellValue::Float(180.0634), CellValue::Integer(89)]),
            ("flag", vec![CellValue::Null, CellValue::Bool(true)]),
        ])
        .unwrap()
    }

    #[test]
    fn from_columns_rejects_ragged_input() {
        let err = Table::from_columns(vec![
            ("a", vec![CellValue::Null]),
            ("b", vec![CellValue::Null, CellValue::Null]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::ColumnLength {
                column: "b".into(),
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn f64_column_widens_integers_and_keeps_nulls() {
        let table = sample();
        assert_eq!(
            table.f64_column("mass", "t").unwrap(),
            vec![Some(180.0634), Some(89.0)]
        );
        assert_eq!(table.f64_column("flag", "t").unwrap_err().to_string(),
            "column 'flag', row 1: 'true' is not numeric");
    }

    #[test]
    fn missing_column_is_reported() {
        let err = sample().column("Formula", "theoretical").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "Formula"));
    }

    #[test]
    fn nan_counts_as_null() {
        assert!(CellValue::Float(f64::NAN).is_null());
        assert!(!CellValue::String(String::new()).is_null());
    }

    #[test]
    fn rename_and_select() {
        let mut table = sample();
        table
            .rename_columns(&["n".into(), "m".into(), "f".into()])
            .unwrap();
        let sub = table.select(&["m".into(), "n".into()], "t").unwrap();
        assert_eq!(sub.column_names().collect::<Vec<_>>(), vec!["m", "n"]);
        assert!(table.rename_columns(&["x".into()]).is_err());
        assert_eq!(
            table.rename_columns(&["x".into(), "y".into(), "x".into()]),
            Err(Error::DuplicateColumn("x".into()))
        );
    }

    #[test]
    fn cell_ordering_groups_by_type() {
        let mut cells = vec![
            CellValue::String("b".into()),
            CellValue::Float(2.0),
            CellValue::Null,
            CellValue::Float(1.0),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                CellValue::Null,
                CellValue::Float(1.0),
                CellValue::Float(2.0),
                CellValue::String("b".into())
            ]
        );
    }
}
