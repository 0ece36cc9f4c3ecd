use serde::Serialize;

use super::mode::{MatchMode, OutputColumn};
use crate::data::model::CellValue;

/// One theoretical row paired with one experimental hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub name: CellValue,
    pub formula: CellValue,
    pub theoretical_mass: f64,
    pub experimental_mass: f64,
    pub compound: CellValue,
    /// Rounded to two decimals.
    pub error_ppm: f64,
    /// Adduct mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adduct: Option<CellValue>,
    /// Adduct mode only (SMILES).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<CellValue>,
}

impl MatchRecord {
    pub fn cell(&self, column: OutputColumn) -> CellValue {
        match column {
            OutputColumn::Name => self.name.clone(),
            OutputColumn::Formula => self.formula.clone(),
            OutputColumn::TheoreticalMass => CellValue::Float(self.theoretical_mass),
            OutputColumn::ExperimentalMass => CellValue::Float(self.experimental_mass),
            OutputColumn::Adduct => self.adduct.clone().unwrap_or(CellValue::Null),
            OutputColumn::Compound => self.compound.clone(),
            OutputColumn::Structure => self.structure.clone().unwrap_or(CellValue::Null),
            OutputColumn::ErrorPpm => CellValue::Float(self.error_ppm),
        }
    }
}

/// All hits for one theoretical mass.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTable {
    pub theoretical_mass: f64,
    /// Grouped by theoretical row, each group ordered by experimental mass.
    pub records: Vec<MatchRecord>,
}

impl MatchTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Output of a matching pass: one table per theoretical mass with at
/// least one hit, in theoretical row order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResultSet {
    pub mode: MatchMode,
    pub experimental_mass_column: String,
    pub tables: Vec<MatchTable>,
}

impl MatchResultSet {
    /// Column headers shared by every table.
    pub fn headers(&self) -> Vec<&str> {
        self.mode
            .output_columns()
            .iter()
            .map(|c| c.header(self.mode, &self.experimental_mass_column))
            .collect()
    }

    /// One row of cells per record, in header order.
    pub fn rows<'a>(&'a self, table: &'a MatchTable) -> impl Iterator<Item = Vec<CellValue>> + 'a {
        let columns = self.mode.output_columns();
        table
            .records
            .iter()
            .map(move |r| columns.iter().map(|c| r.cell(*c)).collect())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchTable> {
        self.tables.iter()
    }

    /// All records of all tables, in order.
    pub fn records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.tables.iter().flat_map(|t| t.records.iter())
    }
}

impl<'a> IntoIterator for &'a MatchResultSet {
    type Item = &'a MatchTable;
    type IntoIter = std::slice::Iter<'a, MatchTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
