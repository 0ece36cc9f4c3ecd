//! Metabolomics helpers.
//!
//! * [`matcher`] – ppm mass-accuracy matching of theoretical compound
//!   masses against experimental features
//! * [`classification`] – confusion matrix and ROC/AUC numbers
//! * [`data`] – table model and file loaders
//! * [`report`] – CSV / JSON / Parquet output of match results

pub mod classification;
pub mod config;
pub mod data;
pub mod error;
pub mod matcher;
pub mod report;

pub use config::MatchConfig;
pub use data::model::{CellValue, Table};
pub use error::{Error, Result};
pub use matcher::{calculate_mass_accuracy, MassMatcher, MatchMode, MatchResultSet};
