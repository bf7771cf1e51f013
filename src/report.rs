// src/report.rs

//! Textual and machine-readable summaries of a `ComparisonReport`.

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::comparison::{ComparisonReport, QuantileComparison, Stage, StageFailure};
use crate::data_analysis::quantile::QuantileSummary;
use crate::error::{BurstError, ErrorKind, Result};
use crate::measure_names::{Group, Measure};

pub const QUANTILE_TABLE_FIELDS: &str = "min & q1 & q2 & q3 & max \\\\";

/// `[a, b, c]` with three decimals.
pub fn format_values(values: &[f64]) -> String {
    let joined = values
        .iter()
        .map(|v| format!("{v:.3}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

/// One LaTeX table row: `min & q1 & q2 & q3 & max \\`. Missing statistics print as `--`.
pub fn format_quantile_row(summary: &QuantileSummary) -> String {
    let cells = summary
        .as_array()
        .iter()
        .map(|v| match v {
            Some(v) => format!("{v:.2}"),
            None => "--".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" & ");
    format!("{cells} \\\\")
}

/// Raw timestamps of every trial, per group.
pub fn format_data(report: &ComparisonReport) -> String {
    let mut out = String::new();
    for group in Group::ALL {
        out.push_str(&format!("\n{group} data:\n"));
        match report.group(group) {
            Some(analysis) => {
                for trial in &analysis.recordings.trials {
                    out.push_str(&format!("{}\n\n", format_values(trial.timestamps())));
                }
            }
            None => out.push_str("(unavailable)\n\n"),
        }
    }
    out
}

/// Per-trial values of one measure, per group.
pub fn format_specific(report: &ComparisonReport, measure: Measure) -> String {
    let mut out = String::new();
    for group in Group::ALL {
        out.push_str(&format!("\n{group} {}:\n", measure.full_name()));
        match report.group(group) {
            Some(analysis) => {
                for values in analysis.measures.get(measure) {
                    out.push_str(&format!("{}\n\n", format_values(values)));
                }
            }
            None => out.push_str("(unavailable)\n\n"),
        }
    }
    out
}

pub fn format_all_measures(report: &ComparisonReport) -> String {
    Measure::ALL
        .into_iter()
        .map(|m| format_specific(report, m))
        .collect()
}

/// Quantile table for every measure, one block per group.
pub fn format_quantile_table(report: &ComparisonReport) -> String {
    let mut out = String::new();
    for measure in Measure::ALL {
        out.push_str(&format!("--- {} ---\n", measure.full_name()));
        for group in Group::ALL {
            out.push_str(&format!("{group}\n"));
            match report.summary(group, measure) {
                Some(summary) => out.push_str(&format!(
                    "{QUANTILE_TABLE_FIELDS}\n{}\n\n",
                    format_quantile_row(summary)
                )),
                None => out.push_str("(no summary)\n\n"),
            }
        }
    }
    out
}

pub fn format_comparisons(comparisons: &[QuantileComparison]) -> String {
    comparisons
        .iter()
        .map(|c| {
            format!(
                "{} ({} - {}):\n{QUANTILE_TABLE_FIELDS}\n{}\n\n",
                c.measure.full_name(),
                c.second,
                c.first,
                format_quantile_row(&c.difference)
            )
        })
        .collect()
}

pub fn print_data(report: &ComparisonReport) {
    print!("{}", format_data(report));
}

pub fn print_specific(report: &ComparisonReport, measure: Measure) {
    print!("{}", format_specific(report, measure));
}

pub fn print_all_measures(report: &ComparisonReport) {
    print!("{}", format_all_measures(report));
}

pub fn print_quantile_table(report: &ComparisonReport) {
    println!("\n--- Quantile Summary ---");
    print!("{}", format_quantile_table(report));
}

pub fn print_comparisons(report: &ComparisonReport) {
    let comparisons = report.comparisons();
    if comparisons.is_empty() {
        println!("\nNo measure has a summary for both groups; skipping group comparison.");
        return;
    }
    println!("\n--- Group Comparison ---");
    print!("{}", format_comparisons(&comparisons));
}

/// Every recorded failure, one line each, to stderr.
pub fn print_failures(report: &ComparisonReport) {
    for failure in &report.failures {
        eprintln!("{failure}");
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryExport {
    pub groups: Vec<GroupExport>,
    pub comparisons: Vec<QuantileComparison>,
    pub failures: Vec<FailureExport>,
}

#[derive(Debug, Serialize)]
pub struct GroupExport {
    pub group: Group,
    pub trials: usize,
    pub dropped_trailing_starts: Vec<usize>,
    pub measures: Vec<MeasureExport>,
}

#[derive(Debug, Serialize)]
pub struct MeasureExport {
    pub measure: Measure,
    pub bin_edges: Vec<f64>,
    pub average_cdf: Vec<f64>,
    pub average_relative_frequency: Option<Vec<f64>>,
    pub non_monotonic_trials: Vec<usize>,
    pub summary: Option<QuantileSummary>,
}

#[derive(Debug, Serialize)]
pub struct FailureExport {
    pub group: Group,
    pub measure: Option<Measure>,
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&StageFailure> for FailureExport {
    fn from(failure: &StageFailure) -> Self {
        FailureExport {
            group: failure.group,
            measure: failure.measure,
            stage: failure.stage,
            kind: failure.error.kind(),
            message: failure.error.to_string(),
        }
    }
}

impl SummaryExport {
    pub fn from_report(report: &ComparisonReport) -> Self {
        let groups = Group::ALL
            .into_iter()
            .filter_map(|g| report.group(g))
            .map(|analysis| GroupExport {
                group: analysis.group,
                trials: analysis.measures.trial_count(),
                dropped_trailing_starts: analysis.measures.dropped_trailing_starts().to_vec(),
                measures: analysis
                    .per_measure
                    .iter()
                    .flatten()
                    .map(|m| MeasureExport {
                        measure: m.measure,
                        bin_edges: m.average.edges.as_slice().to_vec(),
                        average_cdf: m.average.values.to_vec(),
                        average_relative_frequency: m
                            .relative_frequency
                            .as_ref()
                            .map(|rf| rf.average.to_vec()),
                        non_monotonic_trials: m.non_monotonic_trials.clone(),
                        summary: m.summary,
                    })
                    .collect(),
            })
            .collect();
        SummaryExport {
            groups,
            comparisons: report.comparisons(),
            failures: report.failures.iter().map(FailureExport::from).collect(),
        }
    }
}

/// Writes the report as pretty-printed JSON.
pub fn write_json_summary(report: &ComparisonReport, path: &Path) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &SummaryExport::from_report(report))
        .map_err(|e| BurstError::Io(e.into()))?;
    println!("JSON summary written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_row_format() {
        let mut s = QuantileSummary {
            min: Some(0.5),
            q1: Some(1.0),
            q2: Some(1.25),
            q3: Some(2.0),
            max: Some(3.0),
        };
        assert_eq!(format_quantile_row(&s), "0.50 & 1.00 & 1.25 & 2.00 & 3.00 \\\\");
        s.max = None;
        assert_eq!(format_quantile_row(&s), "0.50 & 1.00 & 1.25 & 2.00 & -- \\\\");
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_values(&[0.0, 2.5]), "[0.000, 2.500]");
        assert_eq!(format_values(&[]), "[]");
    }

    #[test]
    fn test_empty_report_tables() {
        let report = ComparisonReport::default();
        let table = format_quantile_table(&report);
        assert!(table.contains("--- Burst Duration ---"));
        assert_eq!(table.matches("(no summary)").count(), 8);
        assert!(format_data(&report).contains("EKI data:"));
    }
}

// src/report.rs
