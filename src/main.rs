//! # chemometrics
//!
//! Command-line front end.
//!
//! ```bash
//! # Match theoretical monoisotopic masses against unannotated MS/MS features
//! chemometrics match -t compounds.csv -e features.csv -o matches.csv
//!
//! # Adduct masses against m/z, 3 ppm
//! chemometrics match -t adducts.tsv -e features.parquet \
//!     --theoretical-mass-column "adduct mass" --experimental-mass-column "m/z" --tolerance-ppm 3
//!
//! # Rank table on the second sheet of a MetaboRank workbook
//! chemometrics match -t MR_noChemBackg.xls --sheet 1 -e features.csv
//!
//! # Confusion matrix and ROC/AUC of a classifier (JSON for plotting)
//! chemometrics confusion --truth y.csv --predicted y_hat.csv
//! chemometrics roc --truth y.csv --scores y_hat.csv -o roc.json
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;

use chemometrics::classification::{confusion_matrix, roc_per_class};
use chemometrics::data::loader::{load_file, load_file_with, LoadOptions};
use chemometrics::{report, MassMatcher, MatchConfig, Table};

/// Metabolomics helpers: mass accuracy, confusion matrix, ROC/AUC
#[derive(Parser)]
#[command(name = "chemometrics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match theoretical masses against experimental features within a ppm window
    Match {
        /// Theoretical compound table
        #[arg(short, long)]
        theoretical: PathBuf,

        /// Experimental feature table
        #[arg(short, long)]
        experimental: PathBuf,

        /// TOML file with matching parameters (flags below take precedence)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// `Monoisotopic_mass` or `adduct mass`
        #[arg(long)]
        theoretical_mass_column: Option<String>,

        /// Experimental mass column (default `Neutral mass (Da)`)
        #[arg(long)]
        experimental_mass_column: Option<String>,

        #[arg(long)]
        tolerance_ppm: Option<f64>,

        /// Rename the theoretical table's columns, comma-separated, in order
        #[arg(long, value_delimiter = ',')]
        theoretical_columns: Option<Vec<String>>,

        /// Zero-based worksheet of a theoretical .xls/.xlsx workbook (default 1)
        #[arg(long)]
        sheet: Option<usize>,

        /// Output file (.csv, .json, .parquet); prints a table when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Confusion matrix of one-hot truth against predicted scores
    Confusion {
        /// One-hot truth matrix; its header names the classes
        #[arg(long)]
        truth: PathBuf,

        /// Predicted score matrix, same shape
        #[arg(long)]
        predicted: PathBuf,

        /// JSON output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-class ROC curves and AUC
    Roc {
        /// One-hot truth matrix; its header names the classes
        #[arg(long)]
        truth: PathBuf,

        /// Score matrix with one column per class, or a single column
        #[arg(long)]
        scores: PathBuf,

        /// JSON output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Match {
            theoretical,
            experimental,
            config,
            theoretical_mass_column,
            experimental_mass_column,
            tolerance_ppm,
            theoretical_columns,
            sheet,
            output,
        } => {
            let mut config = match config {
                Some(path) => MatchConfig::from_file(&path)?,
                None => MatchConfig::default(),
            };
            if let Some(column) = theoretical_mass_column {
                config.theoretical_mass_column = column;
            }
            if let Some(column) = experimental_mass_column {
                config.experimental_mass_column = column;
            }
            if let Some(tolerance) = tolerance_ppm {
                config.tolerance_ppm = tolerance;
            }
            let options = LoadOptions {
                column_names: theoretical_columns,
                keep: None,
                sheet,
            };
            run_match(&theoretical, &experimental, &config, &options, output.as_deref())
        }
        Commands::Confusion {
            truth,
            predicted,
            output,
        } => {
            let (names, y) = load_matrix(&truth)?;
            let (_, y_hat) = load_matrix(&predicted)?;
            let cm = confusion_matrix(&y, &y_hat)?;
            let labels = cm.labels.iter().map(|&l| names.get(l).cloned().unwrap_or_else(|| l.to_string())).collect();
            let cm = cm.with_class_names(labels)?;
            info!("accuracy {:.4} over {} samples", cm.accuracy(), cm.total());
            emit_json(&cm, output.as_deref())
        }
        Commands::Roc {
            truth,
            scores,
            output,
        } => {
            let (names, y) = load_matrix(&truth)?;
            let (_, y_hat) = load_matrix(&scores)?;
            let rocs = roc_per_class(&names, &y, &y_hat)?;
            for roc in &rocs {
                info!("{}", roc.legend);
            }
            emit_json(&rocs, output.as_deref())
        }
    }
}

fn run_match(
    theoretical: &Path,
    experimental: &Path,
    config: &MatchConfig,
    options: &LoadOptions,
    output: Option<&Path>,
) -> Result<()> {
    let matcher = MassMatcher::from_config(config)?;
    let theoretical = load_file_with(theoretical, options)?;
    let experimental = load_file(experimental)?;

    let result = matcher
        .run(&theoretical, &experimental)
        .context("matching masses")?;
    info!(
        "{} match table(s), {} row(s)",
        result.len(),
        result.records().count()
    );

    match output {
        Some(path) => {
            report::write_results(&result, path)?;
            info!("wrote {}", path.display());
        }
        None => println!("{}", report::pretty(&result)?),
    }
    Ok(())
}

/// Load a numeric matrix and its column names.
fn load_matrix(path: &Path) -> Result<(Vec<String>, Vec<Vec<f64>>)> {
    let table: Table = load_file(path)?;
    let names = table.column_names().map(str::to_string).collect();
    let rows = table
        .to_f64_rows(&path.display().to_string())
        .with_context(|| format!("reading matrix {}", path.display()))?;
    Ok((names, rows))
}

fn emit_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)
                .context("writing JSON")?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value).context("writing JSON")?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
