use thiserror::Error;

/// Errors raised by the table model, the mass matcher and the
/// classification helpers.
///
/// File-level failures (opening, parsing) are reported through `anyhow`
/// by the loader and report layers; this enum covers the in-memory
/// operations that callers may want to match on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A column required by the operation is absent from the table.
    #[error("{table} table has no column named '{column}'")]
    MissingColumn { table: String, column: String },

    /// A mass column holds a value that cannot be read as a number.
    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Columns of one table disagree on their number of rows.
    #[error("column '{column}' has {found} rows, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// The theoretical mass column selects no known match mode.
    #[error("unsupported theoretical mass column '{0}' (expected 'Monoisotopic_mass' or 'adduct mass')")]
    UnsupportedMassColumn(String),

    #[error("tolerance must be a finite, non-negative ppm value, got {0}")]
    InvalidTolerance(f64),

    /// Matrix or vector dimensions do not line up.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// ROC is undefined without both positive and negative samples.
    #[error("ROC curve undefined: {0}")]
    DegenerateRoc(String),
}

/// Result alias for the in-memory operations of this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_names_table_and_column() {
        let err = Error::MissingColumn {
            table: "experimental".into(),
            column: "Accepted ID".into(),
        };
        assert_eq!(
            err.to_string(),
            "experimental table has no column named 'Accepted ID'"
        );
    }

    #[test]
    fn non_numeric_reports_position() {
        let err = Error::NonNumeric {
            column: "m/z".into(),
            row: 3,
            value: "n.d.".into(),
        };
        assert!(err.to_string().contains("row 3"));
        assert!(err.to_string().contains("n.d."));
    }
}
