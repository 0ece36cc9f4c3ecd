use super::model::Table;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Row predicates on cell presence
// ---------------------------------------------------------------------------

/// A per-row condition on one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowPredicate {
    /// The cell is empty (or a float `NaN`).
    IsNull(String),
    /// The cell holds a value.
    NotNull(String),
}

impl RowPredicate {
    pub fn column(&self) -> &str {
        match self {
            RowPredicate::IsNull(c) | RowPredicate::NotNull(c) => c,
        }
    }
}

/// Return indices of rows that pass all predicates.
///
/// Every referenced column must exist; a missing column is an error rather
/// than an empty selection. `table` names the table in that error.
pub fn filtered_indices(table: &Table, predicates: &[RowPredicate], name: &str) -> Result<Vec<usize>> {
    let columns = predicates
        .iter()
        .map(|p| table.column(p.column(), name).map(|c| (p, c)))
        .collect::<Result<Vec<_>>>()?;

    Ok((0..table.len())
        .filter(|&row| {
            columns.iter().all(|(predicate, column)| {
                let null = column.values[row].is_null();
                match predicate {
                    RowPredicate::IsNull(_) => null,
                    RowPredicate::NotNull(_) => !null,
                }
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::error::Error;

    fn features() -> Table {
        Table::from_columns(vec![
            (
                "Accepted ID",
                vec![CellValue::Null, "HMDB0000122".into(), CellValue::Null, CellValue::Null],
            ),
            (
                "MSMS info available",
                vec!["Yes".into(), "Yes".into(), CellValue::Null, "Yes".into()],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn all_predicates_must_hold() {
        let idx = filtered_indices(
            &features(),
            &[
                RowPredicate::IsNull("Accepted ID".into()),
                RowPredicate::NotNull("MSMS info available".into()),
            ],
            "experimental",
        )
        .unwrap();
        assert_eq!(idx, vec![0, 3]);
    }

    #[test]
    fn no_predicates_keep_everything() {
        assert_eq!(filtered_indices(&features(), &[], "x").unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn unknown_column_fails() {
        let err = filtered_indices(&features(), &[RowPredicate::IsNull("Adduct".into())], "experimental")
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }
}
