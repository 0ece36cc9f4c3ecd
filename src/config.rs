use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::matcher::mode::{MONOISOTOPIC_MASS, NEUTRAL_MASS};

/// Parameters of a matching pass.
///
/// Missing keys fall back to [`MatchConfig::default`]:
///
/// ```toml
/// theoretical_mass_column = "adduct mass"
/// experimental_mass_column = "m/z"
/// tolerance_ppm = 3.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchConfig {
    /// `Monoisotopic_mass` or `adduct mass`; selects the match mode.
    pub theoretical_mass_column: String,
    pub experimental_mass_column: String,
    pub tolerance_ppm: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            theoretical_mass_column: MONOISOTOPIC_MASS.to_string(),
            experimental_mass_column: NEUTRAL_MASS.to_string(),
            tolerance_ppm: 5.0,
        }
    }
}

impl MatchConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing match config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = MatchConfig::from_toml_str("tolerance_ppm = 2.5").unwrap();
        assert_eq!(config.tolerance_ppm, 2.5);
        assert_eq!(config.theoretical_mass_column, "Monoisotopic_mass");
        assert_eq!(config.experimental_mass_column, "Neutral mass (Da)");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(MatchConfig::from_toml_str("tolerance = 2.5").is_err());
    }

    #[test]
    fn adduct_config() {
        let config = MatchConfig::from_toml_str(
            "theoretical_mass_column = \"adduct mass\"\nexperimental_mass_column = \"m/z\"",
        )
        .unwrap();
        assert_eq!(config.experimental_mass_column, "m/z");
        assert_eq!(config.tolerance_ppm, 5.0);
    }
}
