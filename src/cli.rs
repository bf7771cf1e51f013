// src/cli.rs

//! Command-line arguments of `burst-analysis`.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::AnalysisConfig;
use crate::error::{BurstError, Result};
use crate::measure_names::Measure;

/// Which measures `--print-measure` dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSelection {
    All,
    One(Measure),
}

impl FromStr for MeasureSelection {
    type Err = BurstError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            Ok(MeasureSelection::All)
        } else {
            s.parse().map(MeasureSelection::One)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "burst-analysis")]
#[command(about = "Compare burst timing statistics of two groups of recordings")]
#[command(version)]
pub struct Args {
    /// CSV file with one EKI trial per row
    #[arg(long, value_name = "CSV")]
    pub eki: PathBuf,

    /// CSV file with one WT trial per row
    #[arg(long, value_name = "CSV")]
    pub wt: PathBuf,

    /// TOML configuration (built-in defaults otherwise)
    #[arg(short, long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Header rows to skip in each CSV
    #[arg(long)]
    pub header_lines: Option<usize>,

    /// Print every trial's raw timestamps
    #[arg(long)]
    pub print_data: bool,

    /// Print per-trial values of one measure (burstDur, cycleDur, dutyCycle, qI) or `all`
    #[arg(long, value_name = "MEASURE")]
    pub print_measure: Option<MeasureSelection>,

    /// Render the CDF and relative-frequency comparison figures
    #[arg(long)]
    pub plots: bool,

    /// Directory for figures
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Write a JSON summary of every result and failure
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Upper y limit of the relative-frequency panels
    #[arg(long)]
    pub max_rel_freq: Option<f64>,

    /// Write the effective configuration as TOML and continue
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,
}

impl Args {
    /// Loads `--config` (or the defaults) and applies command-line overrides.
    pub fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(n) = self.header_lines {
            config.header_lines = n;
        }
        if let Some(max) = self.max_rel_freq {
            if !(max.is_finite() && max > 0.0) {
                return Err(BurstError::config(format!(
                    "--max-rel-freq must be positive, got {max}"
                )));
            }
            config.plot.max_rel_freq = max;
        }
        config.validate()?;
        Ok(config)
    }

    /// Stem shared by the output figures, e.g. `eki_vs_wt`.
    pub fn root_name(&self) -> String {
        let stem = |p: &PathBuf| {
            p.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        format!("{}_vs_{}", stem(&self.eki), stem(&self.wt))
    }
}
