// src/data_analysis/cdf.rs

use log::debug;
use ndarray::{Array2, ArrayView1, Axis};

use crate::data_analysis::bins::BinEdges;
use crate::error::{BurstError, Result};

/// Empirical CDFs of several trials evaluated at shared bin edges (trials x edges).
#[derive(Debug, Clone, PartialEq)]
pub struct CdfMatrix {
    values: Array2<f64>,
    edges: BinEdges,
}

impl CdfMatrix {
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    pub fn trial_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn row(&self, trial: usize) -> ArrayView1<'_, f64> {
        self.values.row(trial)
    }

    /// Trials whose CDF decreases somewhere along the bin axis. Always empty for
    /// well-formed input; a non-empty result points at a data or bin-ordering defect.
    pub fn non_monotonic_trials(&self) -> Vec<usize> {
        self.values
            .axis_iter(Axis(0))
            .enumerate()
            .filter(|(_, row)| !is_non_decreasing(row))
            .map(|(trial, _)| trial)
            .collect()
    }
}

pub fn is_non_decreasing(values: &ArrayView1<'_, f64>) -> bool {
    values
        .iter()
        .zip(values.iter().skip(1))
        .all(|(prev, next)| next >= prev)
}

/// Builds `CDF[i][j] = count(sample_i <= edge_j) / len(sample_i)`.
///
/// Fails with `EmptySample` if there are no trials or any trial has no values.
pub fn calculate_cdfs(samples: &[Vec<f64>], edges: &BinEdges) -> Result<CdfMatrix> {
    if samples.is_empty() {
        return Err(BurstError::EmptySample { trial: None });
    }
    let mut values = Array2::<f64>::zeros((samples.len(), edges.len()));

    for (i, sample) in samples.iter().enumerate() {
        if sample.is_empty() {
            return Err(BurstError::EmptySample { trial: Some(i) });
        }
        let n_pts = sample.len() as f64;

        // Sort once, then count by binary search per edge.
        let mut sorted = sample.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        for (j, &edge) in edges.as_slice().iter().enumerate() {
            let count = sorted.partition_point(|&x| x <= edge);
            values[[i, j]] = count as f64 / n_pts;
        }
    }

    let cdfs = CdfMatrix {
        values,
        edges: edges.clone(),
    };
    if cfg!(debug_assertions) {
        let bad = cdfs.non_monotonic_trials();
        if bad.is_empty() {
            debug!("All {} CDF rows are non-decreasing.", cdfs.trial_count());
        } else {
            debug!("CDF rows NOT monotonic for trials {:?}", bad);
        }
    }
    Ok(cdfs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn edges(v: &[f64]) -> BinEdges {
        BinEdges::from_vec(v.to_vec()).unwrap()
    }

    #[test]
    fn worked_example() {
        let cdfs = calculate_cdfs(&[vec![1.5, 2.5, 4.5]], &edges(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap();
        // 1.5 and 2.5 are both <= 3.
        let expected = [0.0, 1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0, 1.0];
        for (got, want) in cdfs.row(0).iter().zip(expected) {
            assert_relative_eq!(*got, want);
        }
    }

    #[test]
    fn value_on_edge_is_counted() {
        let cdfs = calculate_cdfs(&[vec![2.0, 2.0, 3.0, 1.0]], &edges(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(cdfs.row(0).to_vec(), vec![0.25, 0.75, 1.0]);
    }

    #[test]
    fn rows_are_bounded_and_non_decreasing() {
        let samples = vec![
            vec![0.3, 7.1, 2.2, 2.2, 15.0, 0.01],
            vec![49.5, 100.0],
            vec![-3.0, 1.0],
        ];
        let cdfs = calculate_cdfs(&samples, &edges(&[0.0, 1.0, 2.5, 10.0, 50.0])).unwrap();
        assert_eq!(cdfs.values().dim(), (3, 5));
        assert!(cdfs.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(cdfs.non_monotonic_trials().is_empty());
        assert_eq!(cdfs.row(1).to_vec(), vec![0.0, 0.0, 0.0, 0.0, 0.5]);
        assert_eq!(cdfs.row(2)[0], 0.5);
    }

    #[test]
    fn empty_sample_fails() {
        let err = calculate_cdfs(&[vec![1.0], vec![]], &edges(&[1.0, 2.0])).unwrap_err();
        assert!(matches!(err, BurstError::EmptySample { trial: Some(1) }));
    }

    #[test]
    fn no_trials_fails() {
        let err = calculate_cdfs(&[], &edges(&[1.0])).unwrap_err();
        assert!(matches!(err, BurstError::EmptySample { trial: None }));
    }

    #[test]
    fn monotonic_check_flags_decreasing_rows() {
        let cdfs = CdfMatrix {
            values: ndarray::array![[0.0, 0.5, 1.0], [0.0, 0.7, 0.6]],
            edges: edges(&[1.0, 2.0, 3.0]),
        };
        assert_eq!(cdfs.non_monotonic_trials(), vec![1]);
    }
}
