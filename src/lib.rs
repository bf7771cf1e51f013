// src/lib.rs - Library interface for the burst analysis pipeline

pub mod cli;
pub mod comparison;
pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod measure_names;
pub mod plot_framework;
pub mod plot_functions;
pub mod report;
pub mod types;

pub use comparison::{ComparisonReport, GroupComparison};
pub use config::AnalysisConfig;
pub use error::{BurstError, ErrorKind, Result};
pub use measure_names::{Group, Measure};

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
