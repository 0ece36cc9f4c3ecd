use crate::error::{Error, Result};

// Theoretical table.
pub const NAME: &str = "Name";
pub const FORMULA: &str = "Formula";
pub const MONOISOTOPIC_MASS: &str = "Monoisotopic_mass";
pub const ADDUCT: &str = "adduct";
pub const ADDUCT_MASS: &str = "adduct mass";
pub const SMILES: &str = "smiles";

// Experimental table.
pub const COMPOUND: &str = "Compound";
pub const NEUTRAL_MASS: &str = "Neutral mass (Da)";
pub const MZ: &str = "m/z";
pub const ACCEPTED_ID: &str = "Accepted ID";
pub const MSMS_INFO: &str = "MSMS info available";

// Output.
pub const ERROR_PPM: &str = "error_ppm";

/// One column of a match table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    Name,
    Formula,
    TheoreticalMass,
    ExperimentalMass,
    Adduct,
    Compound,
    Structure,
    ErrorPpm,
}

const MONOISOTOPIC_COLUMNS: &[OutputColumn] = &[
    OutputColumn::Name,
    OutputColumn::Formula,
    OutputColumn::TheoreticalMass,
    OutputColumn::ExperimentalMass,
    OutputColumn::Compound,
    OutputColumn::ErrorPpm,
];

const ADDUCT_COLUMNS: &[OutputColumn] = &[
    OutputColumn::Name,
    OutputColumn::Formula,
    OutputColumn::TheoreticalMass,
    OutputColumn::ExperimentalMass,
    OutputColumn::Adduct,
    OutputColumn::Compound,
    OutputColumn::Structure,
    OutputColumn::ErrorPpm,
];

/// Which theoretical mass is matched, selected by the theoretical mass
/// column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Neutral monoisotopic mass (`Monoisotopic_mass`).
    Monoisotopic,
    /// Adduct-adjusted mass (`adduct mass`), reported with adduct and SMILES.
    Adduct,
}

impl MatchMode {
    pub fn from_column(name: &str) -> Result<Self> {
        match name {
            MONOISOTOPIC_MASS => Ok(MatchMode::Monoisotopic),
            ADDUCT_MASS => Ok(MatchMode::Adduct),
            other => Err(Error::UnsupportedMassColumn(other.to_string())),
        }
    }

    /// Theoretical column holding the mass to match.
    pub fn mass_column(self) -> &'static str {
        match self {
            MatchMode::Monoisotopic => MONOISOTOPIC_MASS,
            MatchMode::Adduct => ADDUCT_MASS,
        }
    }

    pub fn output_columns(self) -> &'static [OutputColumn] {
        match self {
            MatchMode::Monoisotopic => MONOISOTOPIC_COLUMNS,
            MatchMode::Adduct => ADDUCT_COLUMNS,
        }
    }

    /// Theoretical columns that must be present.
    pub fn required_theoretical_columns(self) -> &'static [&'static str] {
        match self {
            MatchMode::Monoisotopic => &[NAME, FORMULA, MONOISOTOPIC_MASS],
            MatchMode::Adduct => &[NAME, FORMULA, ADDUCT_MASS, ADDUCT, SMILES],
        }
    }
}

impl OutputColumn {
    /// Header label; the experimental mass column keeps the name it had in
    /// the experimental table.
    pub fn header<'a>(self, mode: MatchMode, experimental_mass_column: &'a str) -> &'a str {
        match self {
            OutputColumn::Name => NAME,
            OutputColumn::Formula => FORMULA,
            OutputColumn::TheoreticalMass => mode.mass_column(),
            OutputColumn::ExperimentalMass => experimental_mass_column,
            OutputColumn::Adduct => ADDUCT,
            OutputColumn::Compound => COMPOUND,
            OutputColumn::Structure => SMILES,
            OutputColumn::ErrorPpm => ERROR_PPM,
        }
    }
}
