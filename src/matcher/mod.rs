//! Mass-accuracy matching of theoretical compound masses against
//! experimentally observed features.
//!
//! For every theoretical mass the matcher collects all eligible
//! experimental masses within a ppm tolerance and reports them as one
//! small table. Theoretical masses without a hit are left out.
//!
//! ```text
//!  theoretical Table ──┐
//!                      ├──► MassMatcher::run ──► MatchResultSet
//!  experimental Table ─┘        │
//!                               └─ eligible pool (filter) + ppm window
//! ```

pub mod mode;
pub mod ppm;
pub mod result;

use log::{debug, info, trace, warn};

use crate::config::MatchConfig;
use crate::data::filter::{filtered_indices, RowPredicate};
use crate::data::model::{CellValue, Table};
use crate::error::{Error, Result};

pub use mode::{MatchMode, OutputColumn};
pub use result::{MatchRecord, MatchResultSet, MatchTable};

use mode::{ACCEPTED_ID, ADDUCT, COMPOUND, FORMULA, MSMS_INFO, NAME, NEUTRAL_MASS, SMILES};

const THEORETICAL: &str = "theoretical";
const EXPERIMENTAL: &str = "experimental";

/// An experimental row allowed to take part in matching.
#[derive(Debug, Clone, Copy)]
struct PoolEntry {
    row: usize,
    mass: f64,
}

/// Matches theoretical masses against experimental ones within a ppm window.
#[derive(Debug, Clone, PartialEq)]
pub struct MassMatcher {
    mode: MatchMode,
    experimental_mass_column: String,
    tolerance_ppm: f64,
}

impl MassMatcher {
    pub fn new(
        mode: MatchMode,
        experimental_mass_column: impl Into<String>,
        tolerance_ppm: f64,
    ) -> Result<Self> {
        if !tolerance_ppm.is_finite() || tolerance_ppm < 0.0 {
            return Err(Error::InvalidTolerance(tolerance_ppm));
        }
        Ok(Self {
            mode,
            experimental_mass_column: experimental_mass_column.into(),
            tolerance_ppm,
        })
    }

    pub fn from_config(config: &MatchConfig) -> Result<Self> {
        Self::new(
            MatchMode::from_column(&config.theoretical_mass_column)?,
            config.experimental_mass_column.clone(),
            config.tolerance_ppm,
        )
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn tolerance_ppm(&self) -> f64 {
        self.tolerance_ppm
    }

    /// Whether the annotation / fragmentation filter applies. Only the
    /// neutral mass column restricts the pool to unannotated features
    /// that have MS/MS data.
    pub fn filters_pool(&self) -> bool {
        self.experimental_mass_column == NEUTRAL_MASS
    }

    /// Run one matching pass.
    ///
    /// Every theoretical row is visited in order, duplicates included.
    /// Each hit pairs every theoretical row carrying that mass value with
    /// every experimental row inside the window.
    pub fn run(&self, theoretical: &Table, experimental: &Table) -> Result<MatchResultSet> {
        for column in self.mode.required_theoretical_columns() {
            theoretical.column(column, THEORETICAL)?;
        }
        experimental.column(COMPOUND, EXPERIMENTAL)?;

        let theoretical_masses = theoretical.f64_column(self.mode.mass_column(), THEORETICAL)?;
        let pool = self.eligible_pool(experimental)?;
        debug!(
            "{} theoretical rows against {} eligible experimental rows at {} ppm",
            theoretical_masses.len(),
            pool.len(),
            self.tolerance_ppm
        );

        let mut tables = Vec::new();
        for &mass in &theoretical_masses {
            let Some(t) = mass else { continue };

            let hits: Vec<(PoolEntry, f64)> = pool
                .iter()
                .filter(|entry| ppm::within_tolerance(entry.mass, t, self.tolerance_ppm))
                .filter_map(|entry| {
                    ppm::ppm_error(entry.mass, t).map(|err| (*entry, ppm::round2(err)))
                })
                .collect();

            if hits.is_empty() {
                trace!("no hit for {t}");
                continue;
            }

            let theoretical_rows = theoretical_masses
                .iter()
                .enumerate()
                .filter(|(_, m)| **m == Some(t))
                .map(|(row, _)| row);

            let mut records = Vec::new();
            for row in theoretical_rows {
                for (entry, error_ppm) in &hits {
                    records.push(self.record(theoretical, experimental, row, t, entry, *error_ppm));
                }
            }
            debug!("{t}: {} hit(s), {} row(s)", hits.len(), records.len());
            tables.push(MatchTable {
                theoretical_mass: t,
                records,
            });
        }

        info!(
            "{} of {} theoretical masses matched",
            tables.len(),
            theoretical_masses.len()
        );
        Ok(MatchResultSet {
            mode: self.mode,
            experimental_mass_column: self.experimental_mass_column.clone(),
            tables,
        })
    }

    /// Experimental rows with a usable mass, ordered by mass ascending
    /// (ties keep table order).
    fn eligible_pool(&self, experimental: &Table) -> Result<Vec<PoolEntry>> {
        let masses = experimental.f64_column(&self.experimental_mass_column, EXPERIMENTAL)?;
        let rows: Vec<usize> = if self.filters_pool() {
            filtered_indices(
                experimental,
                &[
                    RowPredicate::IsNull(ACCEPTED_ID.to_string()),
                    RowPredicate::NotNull(MSMS_INFO.to_string()),
                ],
                EXPERIMENTAL,
            )?
        } else {
            (0..experimental.len()).collect()
        };

        let mut pool = Vec::with_capacity(rows.len());
        for row in rows {
            match masses[row] {
                Some(mass) if mass == 0.0 => {
                    warn!(
                        "experimental row {row} has a zero '{}', skipped",
                        self.experimental_mass_column
                    );
                }
                Some(mass) => pool.push(PoolEntry { row, mass }),
                None => {}
            }
        }
        pool.sort_by(|a, b| a.mass.total_cmp(&b.mass));
        Ok(pool)
    }

    fn record(
        &self,
        theoretical: &Table,
        experimental: &Table,
        theoretical_row: usize,
        theoretical_mass: f64,
        hit: &PoolEntry,
        error_ppm: f64,
    ) -> MatchRecord {
        let theo = |name: &str| {
            theoretical
                .cell(name, theoretical_row)
                .cloned()
                .unwrap_or(CellValue::Null)
        };
        let (adduct, structure) = match self.mode {
            MatchMode::Monoisotopic => (None, None),
            MatchMode::Adduct => (Some(theo(ADDUCT)), Some(theo(SMILES))),
        };
        MatchRecord {
            name: theo(NAME),
            formula: theo(FORMULA),
            theoretical_mass,
            experimental_mass: hit.mass,
            compound: experimental
                .cell(COMPOUND, hit.row)
                .cloned()
                .unwrap_or(CellValue::Null),
            error_ppm,
            adduct,
            structure,
        }
    }
}

/// One-call form: mode from `theoretical_mass_column`, then [`MassMatcher::run`].
pub fn calculate_mass_accuracy(
    theoretical: &Table,
    experimental: &Table,
    theoretical_mass_column: &str,
    experimental_mass_column: &str,
    tolerance_ppm: f64,
) -> Result<MatchResultSet> {
    MassMatcher::new(
        MatchMode::from_column(theoretical_mass_column)?,
        experimental_mass_column,
        tolerance_ppm,
    )?
    .run(theoretical, experimental)
}
