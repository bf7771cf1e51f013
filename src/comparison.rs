// src/comparison.rs

//! Orchestration: load both groups, extract measures, then bin, build CDFs, average and
//! invert them for every group and measure.
//!
//! A failure is recorded against the group (and measure, when known) that produced it and
//! excluded from the results; the remaining groups and measures are still analysed.

use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;

use crate::config::AnalysisConfig;
use crate::data_analysis::aggregate::{average_cdf, average_relative_frequency, AveragedCdf, RelativeFrequency};
use crate::data_analysis::bins::{bins_for, quantile_grid_for};
use crate::data_analysis::burst_measures::MeasureSet;
use crate::data_analysis::cdf::{calculate_cdfs, CdfMatrix};
use crate::data_analysis::quantile::{QuantileFunction, QuantileSummary};
use crate::data_input::recording::GroupRecordings;
use crate::data_input::recording_loader::RecordingLoader;
use crate::error::{BurstError, Result};
use crate::measure_names::{Group, Measure};
use crate::types::{PerGroup, PerMeasure};

/// Pipeline step at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Load,
    Extract,
    Bins,
    Cdf,
    RelativeFrequency,
    Quantile,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::Extract => "measure extraction",
            Stage::Bins => "binning",
            Stage::Cdf => "CDF",
            Stage::RelativeFrequency => "relative frequency",
            Stage::Quantile => "quantiles",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct StageFailure {
    pub group: Group,
    pub measure: Option<Measure>,
    pub stage: Stage,
    pub error: BurstError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error.kind(), self.group)?;
        if let Some(measure) = self.measure {
            write!(f, " {measure}")?;
        }
        write!(f, " ({}): {}", self.stage, self.error)
    }
}

/// Results for one group and measure.
#[derive(Debug, Clone)]
pub struct MeasureAnalysis {
    pub measure: Measure,
    /// Per-trial CDFs on the measure's bins.
    pub cdfs: CdfMatrix,
    pub average: AveragedCdf,
    pub relative_frequency: Option<RelativeFrequency>,
    pub non_monotonic_trials: Vec<usize>,
    pub quantiles: Option<QuantileFunction>,
    /// `None` only when the quantile function could not be built.
    pub summary: Option<QuantileSummary>,
}

#[derive(Debug, Clone)]
pub struct GroupAnalysis {
    pub group: Group,
    pub recordings: GroupRecordings,
    pub measures: MeasureSet,
    pub per_measure: PerMeasure<Option<MeasureAnalysis>>,
}

impl GroupAnalysis {
    pub fn measure(&self, measure: Measure) -> Option<&MeasureAnalysis> {
        self.per_measure[measure.index()].as_ref()
    }
}

/// Summary statistics of both groups for one measure; `difference` is second minus first.
#[derive(Debug, Clone, Serialize)]
pub struct QuantileComparison {
    pub measure: Measure,
    pub first: Group,
    pub second: Group,
    pub first_summary: QuantileSummary,
    pub second_summary: QuantileSummary,
    pub difference: QuantileSummary,
}

#[derive(Debug, Default)]
pub struct ComparisonReport {
    pub groups: PerGroup<Option<GroupAnalysis>>,
    pub failures: Vec<StageFailure>,
}

impl ComparisonReport {
    pub fn group(&self, group: Group) -> Option<&GroupAnalysis> {
        self.groups[group.index()].as_ref()
    }

    pub fn measure(&self, group: Group, measure: Measure) -> Option<&MeasureAnalysis> {
        self.group(group).and_then(|g| g.measure(measure))
    }

    pub fn summary(&self, group: Group, measure: Measure) -> Option<&QuantileSummary> {
        self.measure(group, measure).and_then(|m| m.summary.as_ref())
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn has_load_failures(&self) -> bool {
        self.failures.iter().any(|f| f.stage == Stage::Load)
    }

    /// One entry per measure for which both groups produced a summary.
    pub fn comparisons(&self) -> Vec<QuantileComparison> {
        let [first, second] = Group::ALL;
        Measure::ALL
            .into_iter()
            .filter_map(|measure| {
                let a = self.summary(first, measure)?;
                let b = self.summary(second, measure)?;
                Some(QuantileComparison {
                    measure,
                    first,
                    second,
                    first_summary: *a,
                    second_summary: *b,
                    difference: a.difference_to(b),
                })
            })
            .collect()
    }
}

/// Runs the full pipeline for both groups.
pub struct GroupComparison<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> GroupComparison<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, loader: &dyn RecordingLoader) -> ComparisonReport {
        let mut report = ComparisonReport::default();
        for group in Group::ALL {
            match loader.load_group(group) {
                Ok(raw) => {
                    report.groups[group.index()] = self.analyze_group(group, raw, &mut report.failures);
                }
                Err(error) => {
                    warn!("Failed to load {group}: {error}");
                    report.failures.push(StageFailure {
                        group,
                        measure: None,
                        stage: Stage::Load,
                        error,
                    });
                }
            }
        }
        report
    }

    /// Analyses one group's raw trials, appending any failures.
    pub fn analyze_group(
        &self,
        group: Group,
        raw_trials: Vec<Vec<f64>>,
        failures: &mut Vec<StageFailure>,
    ) -> Option<GroupAnalysis> {
        let extracted = GroupRecordings::from_raw(group, raw_trials).and_then(|recordings| {
            let measures = MeasureSet::from_recordings(&recordings.trials)?;
            Ok((recordings, measures))
        });
        let (recordings, measures) = match extracted {
            Ok(ok) => ok,
            Err(error) => {
                warn!("Excluding {group}: {error}");
                failures.push(StageFailure {
                    group,
                    measure: None,
                    stage: Stage::Extract,
                    error,
                });
                return None;
            }
        };
        info!("{group}: extracted measures from {} trials.", measures.trial_count());

        let mut per_measure: PerMeasure<Option<MeasureAnalysis>> = Default::default();
        for measure in Measure::ALL {
            per_measure[measure.index()] =
                self.analyze_measure(group, measure, &measures, failures);
        }

        Some(GroupAnalysis {
            group,
            recordings,
            measures,
            per_measure,
        })
    }

    fn analyze_measure(
        &self,
        group: Group,
        measure: Measure,
        measures: &MeasureSet,
        failures: &mut Vec<StageFailure>,
    ) -> Option<MeasureAnalysis> {
        let mut fail = |stage: Stage, error: BurstError| {
            warn!("{group} {measure}: {stage} failed: {error}");
            failures.push(StageFailure {
                group,
                measure: Some(measure),
                stage,
                error,
            });
        };
        let samples = measures.get(measure);

        let edges = match bins_for(self.config, measure) {
            Ok(edges) => edges,
            Err(e) => {
                fail(Stage::Bins, e);
                return None;
            }
        };
        let cdfs = match calculate_cdfs(samples, &edges) {
            Ok(cdfs) => cdfs,
            Err(e) => {
                fail(Stage::Cdf, e);
                return None;
            }
        };
        let average = match average_cdf(&cdfs) {
            Ok(avg) => avg,
            Err(e) => {
                fail(Stage::Cdf, e);
                return None;
            }
        };
        let non_monotonic_trials = cdfs.non_monotonic_trials();
        if !non_monotonic_trials.is_empty() {
            debug!("{group} {measure}: non-monotonic CDF rows {:?}", non_monotonic_trials);
        }

        let relative_frequency = match average_relative_frequency(samples, &edges) {
            Ok(rf) => Some(rf),
            Err(e) => {
                fail(Stage::RelativeFrequency, e);
                None
            }
        };

        let (quantiles, summary) = match self.quantiles_for(measure, samples) {
            Ok(quantiles) => {
                let (summary, errors) = quantiles.summary();
                for e in errors {
                    fail(Stage::Quantile, e);
                }
                (Some(quantiles), Some(summary))
            }
            Err(e) => {
                fail(Stage::Quantile, e);
                (None, None)
            }
        };

        Some(MeasureAnalysis {
            measure,
            cdfs,
            average,
            relative_frequency,
            non_monotonic_trials,
            quantiles,
            summary,
        })
    }

    /// Inverts the averaged CDF on the quantile grid.
    fn quantiles_for(&self, measure: Measure, samples: &[Vec<f64>]) -> Result<QuantileFunction> {
        let grid = quantile_grid_for(self.config, measure)?;
        let avg = average_cdf(&calculate_cdfs(samples, &grid)?)?;
        QuantileFunction::from_averaged_cdf(&avg, self.config.flat_regions, self.config.domain_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use approx::assert_relative_eq;

    fn regular_trial(burst: f64, cycle: f64, n: usize) -> Vec<f64> {
        (0..n)
            .flat_map(|i| {
                let start = i as f64 * cycle;
                [start, start + burst]
            })
            .collect()
    }

    #[test]
    fn regular_bursts_summarise_to_their_duration() {
        let cfg = AnalysisConfig::default();
        let mut failures = Vec::new();
        let analysis = GroupComparison::new(&cfg)
            .analyze_group(Group::Eki, vec![regular_trial(2.0, 5.0, 6); 3], &mut failures)
            .unwrap();
        assert!(failures.is_empty(), "{failures:?}");
        let burst = analysis.measure(Measure::BurstDur).unwrap();
        assert_eq!(burst.cdfs.trial_count(), 3);
        let s = burst.summary.unwrap();
        assert!(s.is_complete());
        assert_relative_eq!(s.q2.unwrap(), 2.0, epsilon = 2e-3);
        let duty = analysis.measure(Measure::DutyCycle).unwrap().summary.unwrap();
        assert_relative_eq!(duty.q2.unwrap(), 0.4, epsilon = 2e-3);
    }

    #[test]
    fn single_burst_trials_fail_only_interval_measures() {
        let cfg = AnalysisConfig::default();
        let mut failures = Vec::new();
        let analysis = GroupComparison::new(&cfg)
            .analyze_group(Group::Wt, vec![vec![0.0, 1.5], vec![3.0, 5.0]], &mut failures)
            .unwrap();
        assert!(analysis.measure(Measure::BurstDur).is_some());
        for m in [Measure::CycleDur, Measure::DutyCycle, Measure::Qi] {
            assert!(analysis.measure(m).is_none());
        }
        assert_eq!(failures.len(), 3);
        assert!(failures.iter().all(|f| f.stage == Stage::Cdf && f.group == Group::Wt));
    }

    #[test]
    fn malformed_trial_excludes_group() {
        let cfg = AnalysisConfig::default();
        let mut failures = Vec::new();
        let analysis = GroupComparison::new(&cfg).analyze_group(
            Group::Eki,
            vec![regular_trial(1.0, 3.0, 4), vec![5.0, 4.0]],
            &mut failures,
        );
        assert!(analysis.is_none());
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].stage, Stage::Extract);
        assert!(failures[0].to_string().starts_with("MalformedRecordingError: EKI"));
    }

    #[test]
    fn long_cycles_keep_the_computable_statistics() {
        // Cycles of 40 s and 5 s: the averaged CDF on the 30 s grid stops at 0.5.
        let cfg = AnalysisConfig::default();
        let mut failures = Vec::new();
        let analysis = GroupComparison::new(&cfg)
            .analyze_group(Group::Wt, vec![vec![0.0, 1.0, 40.0, 41.0, 45.0, 46.0]], &mut failures)
            .unwrap();

        let cycle = analysis.measure(Measure::CycleDur).unwrap().summary.unwrap();
        assert!(cycle.min.is_some() && cycle.q1.is_some());
        assert_relative_eq!(cycle.q2.unwrap(), 5.0, epsilon = 2e-3);
        assert!(cycle.q3.is_none() && cycle.max.is_none());
        assert!(analysis.measure(Measure::BurstDur).unwrap().summary.unwrap().is_complete());

        // q3 and max fail for both cycle duration and quiescence interval.
        assert_eq!(failures.len(), 4);
        assert!(failures
            .iter()
            .all(|f| f.stage == Stage::Quantile && f.error.kind() == ErrorKind::OutOfDomain));
        assert!(failures.iter().any(|f| f.measure == Some(Measure::CycleDur)));
        assert!(failures.iter().any(|f| f.measure == Some(Measure::Qi)));
    }
}
