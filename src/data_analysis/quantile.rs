// src/data_analysis/quantile.rs

//! Quantiles by inverting an averaged empirical CDF.
//!
//! The averaged CDF is a table of `(probability, edge)` points. Flat regions repeat a
//! probability over several edges; they are collapsed according to `FlatRegionPolicy`
//! before the table is used for piecewise-linear interpolation. Queries outside the
//! observed probability range fail instead of extrapolating.

use log::debug;
use ndarray::ArrayView1;
use ndarray_stats::QuantileExt;
use serde::Serialize;

use crate::config::FlatRegionPolicy;
use crate::constants::{MAX_QUANTILE_P, MIN_QUANTILE_P, QUARTILE_PROBABILITIES};
use crate::data_analysis::aggregate::AveragedCdf;
use crate::error::{BurstError, Result};

/// Representative statistics of one group and measure. A statistic whose probability
/// falls outside the quantile domain is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QuantileSummary {
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub q2: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

impl QuantileSummary {
    pub fn as_array(&self) -> [Option<f64>; 5] {
        [self.min, self.q1, self.q2, self.q3, self.max]
    }

    pub fn is_complete(&self) -> bool {
        self.as_array().iter().all(Option::is_some)
    }

    /// Element-wise `other - self`; `None` wherever either side is missing.
    pub fn difference_to(&self, other: &QuantileSummary) -> QuantileSummary {
        let diff = |a: Option<f64>, b: Option<f64>| Some(b? - a?);
        QuantileSummary {
            min: diff(self.min, other.min),
            q1: diff(self.q1, other.q1),
            q2: diff(self.q2, other.q2),
            q3: diff(self.q3, other.q3),
            max: diff(self.max, other.max),
        }
    }
}

/// Monotonic map from cumulative probability to edge value.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileFunction {
    probabilities: Vec<f64>,
    values: Vec<f64>,
    tolerance: f64,
}

impl QuantileFunction {
    pub fn from_averaged_cdf(
        avg: &AveragedCdf,
        policy: FlatRegionPolicy,
        tolerance: f64,
    ) -> Result<Self> {
        Self::from_points(avg.values.view(), avg.edges.as_slice(), policy, tolerance)
    }

    /// `probabilities[j]` is the CDF at `values[j]`; `values` must be strictly increasing.
    pub fn from_points(
        probabilities: ArrayView1<'_, f64>,
        values: &[f64],
        policy: FlatRegionPolicy,
        tolerance: f64,
    ) -> Result<Self> {
        if probabilities.len() != values.len() {
            return Err(BurstError::InvalidBins(format!(
                "{} probabilities for {} edges",
                probabilities.len(),
                values.len()
            )));
        }
        if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
            return Err(BurstError::NonMonotonicDomain {
                index,
                reason: "non-finite cumulative probability".to_string(),
            });
        }
        let (lo, hi) = match (probabilities.min(), probabilities.max()) {
            (Ok(lo), Ok(hi)) => (*lo, *hi),
            _ => return Err(BurstError::EmptySample { trial: None }),
        };

        let mut knot_p: Vec<f64> = Vec::with_capacity(values.len());
        let mut knot_v: Vec<f64> = Vec::with_capacity(values.len());
        let mut flat_points = 0usize;
        for (index, (&p, &v)) in probabilities.iter().zip(values).enumerate() {
            if let (Some(&last_p), Some(&last_v)) = (knot_p.last(), knot_v.last()) {
                if v <= last_v {
                    return Err(BurstError::NonMonotonicDomain {
                        index,
                        reason: format!("edge {v} does not follow {last_v}"),
                    });
                }
                if p < last_p {
                    return Err(BurstError::NonMonotonicDomain {
                        index,
                        reason: format!("probability drops from {last_p} to {p}"),
                    });
                }
                if p == last_p {
                    flat_points += 1;
                    match policy {
                        FlatRegionPolicy::KeepEnds => {
                            let n = knot_p.len();
                            if n >= 2 && knot_p[n - 2] == p {
                                knot_v[n - 1] = v;
                                continue;
                            }
                        }
                        FlatRegionPolicy::KeepFirst => continue,
                        FlatRegionPolicy::KeepLast => {
                            if let Some(slot) = knot_v.last_mut() {
                                *slot = v;
                            }
                            continue;
                        }
                        FlatRegionPolicy::Reject => {
                            return Err(BurstError::NonMonotonicDomain {
                                index,
                                reason: format!("probability {p} repeats"),
                            });
                        }
                    }
                }
            }
            knot_p.push(p);
            knot_v.push(v);
        }
        debug!(
            "Quantile function over [{lo}, {hi}]: {} knots, {} flat points collapsed",
            knot_p.len(),
            flat_points
        );

        Ok(Self {
            probabilities: knot_p,
            values: knot_v,
            tolerance,
        })
    }

    /// Smallest and largest cumulative probability that can be queried.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.probabilities[0],
            self.probabilities[self.probabilities.len() - 1],
        )
    }

    pub fn quantile(&self, p: f64) -> Result<f64> {
        let (lo, hi) = self.domain();
        if !p.is_finite() || p < lo - self.tolerance || p > hi + self.tolerance {
            return Err(BurstError::OutOfDomain { p, min: lo, max: hi });
        }
        let p = p.clamp(lo, hi);

        // First knot at or above p; equal probabilities resolve to the earliest edge.
        let k = self.probabilities.partition_point(|&q| q < p);
        if k == 0 {
            return Ok(self.values[0]);
        }
        if k == self.probabilities.len() {
            return Ok(self.values[k - 1]);
        }
        let (p0, p1) = (self.probabilities[k - 1], self.probabilities[k]);
        let (v0, v1) = (self.values[k - 1], self.values[k]);
        if p == p1 {
            return Ok(v1);
        }
        Ok(v0 + (p - p0) / (p1 - p0) * (v1 - v0))
    }

    pub fn quartiles(&self) -> Result<[f64; 3]> {
        Ok([
            self.quantile(QUARTILE_PROBABILITIES[0])?,
            self.quantile(QUARTILE_PROBABILITIES[1])?,
            self.quantile(QUARTILE_PROBABILITIES[2])?,
        ])
    }

    /// Value at p = 0.01; a representative minimum, not the raw-data minimum.
    pub fn min_quantile(&self) -> Result<f64> {
        self.quantile(MIN_QUANTILE_P)
    }

    /// Value at p = 1.0.
    pub fn max_quantile(&self) -> Result<f64> {
        self.quantile(MAX_QUANTILE_P)
    }

    /// Evaluates every statistic independently. Statistics that fail are left `None`
    /// and their errors returned alongside.
    pub fn summary(&self) -> (QuantileSummary, Vec<BurstError>) {
        let mut errors = Vec::new();
        let mut eval = |p: f64| match self.quantile(p) {
            Ok(v) => Some(v),
            Err(e) => {
                errors.push(e);
                None
            }
        };
        let summary = QuantileSummary {
            min: eval(MIN_QUANTILE_P),
            q1: eval(QUARTILE_PROBABILITIES[0]),
            q2: eval(QUARTILE_PROBABILITIES[1]),
            q3: eval(QUARTILE_PROBABILITIES[2]),
            max: eval(MAX_QUANTILE_P),
        };
        (summary, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::aggregate::average_cdf;
    use crate::data_analysis::bins::BinEdges;
    use crate::data_analysis::cdf::calculate_cdfs;
    use approx::assert_relative_eq;
    use ndarray::array;

    const EDGES: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];

    fn flat_cdf(policy: FlatRegionPolicy) -> Result<QuantileFunction> {
        let p = array![0.0, 0.25, 0.5, 0.5, 0.75, 1.0];
        QuantileFunction::from_points(p.view(), &EDGES, policy, 1e-9)
    }

    #[test]
    fn interpolates_between_knots() {
        let q = flat_cdf(FlatRegionPolicy::KeepFirst).unwrap();
        assert_relative_eq!(q.quantile(0.125).unwrap(), 0.5);
        assert_relative_eq!(q.quantile(0.25).unwrap(), 1.0);
        assert_relative_eq!(q.quartiles().unwrap()[2], 4.0);
    }

    #[test]
    fn keep_first_uses_earliest_edge() {
        let q = flat_cdf(FlatRegionPolicy::KeepFirst).unwrap();
        assert_relative_eq!(q.quantile(0.5).unwrap(), 2.0);
        assert_relative_eq!(q.quantile(0.6).unwrap(), 2.8);
    }

    #[test]
    fn keep_last_uses_latest_edge() {
        let q = flat_cdf(FlatRegionPolicy::KeepLast).unwrap();
        assert_relative_eq!(q.quantile(0.5).unwrap(), 3.0);
        assert_relative_eq!(q.quantile(0.6).unwrap(), 3.4);
    }

    #[test]
    fn keep_ends_bridges_plateaus() {
        let q = flat_cdf(FlatRegionPolicy::KeepEnds).unwrap();
        assert_relative_eq!(q.quantile(0.5).unwrap(), 2.0);
        assert_relative_eq!(q.quantile(0.6).unwrap(), 3.4);
        assert_relative_eq!(q.quantile(0.4).unwrap(), 1.6);
    }

    #[test]
    fn keep_ends_collapses_long_plateaus() {
        let p = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0];
        let q = QuantileFunction::from_points(p.view(), &EDGES, FlatRegionPolicy::KeepEnds, 0.0).unwrap();
        assert_relative_eq!(q.quantile(0.0).unwrap(), 0.0);
        assert_relative_eq!(q.quantile(0.5).unwrap(), 3.5);
        assert_relative_eq!(q.quantile(1.0).unwrap(), 4.0);
    }

    #[test]
    fn reject_fails_on_flat_region() {
        let err = flat_cdf(FlatRegionPolicy::Reject).unwrap_err();
        assert!(matches!(err, BurstError::NonMonotonicDomain { index: 3, .. }));
    }

    #[test]
    fn decreasing_probabilities_fail() {
        let p = array![0.0, 0.6, 0.4];
        let err = QuantileFunction::from_points(p.view(), &[1.0, 2.0, 3.0], FlatRegionPolicy::KeepFirst, 0.0)
            .unwrap_err();
        assert!(matches!(err, BurstError::NonMonotonicDomain { index: 2, .. }));
    }

    #[test]
    fn out_of_domain_fails() {
        let p = array![0.2, 0.5, 0.9];
        let q = QuantileFunction::from_points(p.view(), &[1.0, 2.0, 3.0], FlatRegionPolicy::KeepFirst, 1e-9)
            .unwrap();
        assert_eq!(q.domain(), (0.2, 0.9));
        assert!(matches!(q.min_quantile(), Err(BurstError::OutOfDomain { .. })));
        assert!(matches!(q.max_quantile(), Err(BurstError::OutOfDomain { .. })));
        assert!(matches!(q.quantile(f64::NAN), Err(BurstError::OutOfDomain { .. })));
        assert!(q.quantile(0.2).is_ok());
        assert!(q.quantile(0.9 + 1e-12).is_ok());
    }

    #[test]
    fn quantile_is_monotonic() {
        for policy in [FlatRegionPolicy::KeepEnds, FlatRegionPolicy::KeepFirst, FlatRegionPolicy::KeepLast] {
            let q = flat_cdf(policy).unwrap();
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=1000 {
                let v = q.quantile(i as f64 / 1000.0).unwrap();
                assert!(v >= prev, "{policy:?} decreases at p = {}", i as f64 / 1000.0);
                prev = v;
            }
        }
    }

    #[test]
    fn summary_from_sample_on_fine_grid() {
        // Four trials of identical bursts of 2 s: every statistic lands near 2 s.
        let samples = vec![vec![2.0, 2.0, 2.0]; 4];
        let grid = BinEdges::from_range((0.0, 30.0, 1e-3).into()).unwrap();
        let avg = average_cdf(&calculate_cdfs(&samples, &grid).unwrap()).unwrap();
        let q = QuantileFunction::from_averaged_cdf(&avg, FlatRegionPolicy::KeepEnds, 1e-9).unwrap();
        let (s, errors) = q.summary();
        assert!(errors.is_empty());
        assert!(s.is_complete());
        for v in s.as_array() {
            assert_relative_eq!(v.unwrap(), 2.0, epsilon = 2e-3);
        }
    }

    #[test]
    fn value_beyond_grid_only_loses_max() {
        // 45 s lies past the 30 s grid, so the averaged CDF tops out at 0.75.
        let grid = BinEdges::from_range((0.0, 30.0, 1e-3).into()).unwrap();
        let avg = average_cdf(&calculate_cdfs(&[vec![2.0, 3.0, 4.0, 45.0]], &grid).unwrap()).unwrap();
        let q = QuantileFunction::from_averaged_cdf(&avg, FlatRegionPolicy::KeepEnds, 1e-9).unwrap();
        assert_relative_eq!(q.domain().1, 0.75);

        let (s, errors) = q.summary();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], BurstError::OutOfDomain { p, .. } if p == 1.0));
        assert!(s.max.is_none());
        assert!(!s.is_complete());
        assert_relative_eq!(s.min.unwrap(), 2.0, epsilon = 2e-3);
        assert_relative_eq!(s.q1.unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(s.q2.unwrap(), 3.0, epsilon = 1e-9);
        assert_relative_eq!(s.q3.unwrap(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn summary_difference() {
        let a = QuantileSummary { min: Some(1.0), q1: Some(2.0), q2: Some(3.0), q3: Some(4.0), max: None };
        let b = QuantileSummary { min: Some(1.5), q1: Some(2.0), q2: Some(2.0), q3: Some(5.0), max: Some(9.0) };
        assert_eq!(
            a.difference_to(&b).as_array(),
            [Some(0.5), Some(0.0), Some(-1.0), Some(1.0), None]
        );
    }
}
