// src/data_analysis/aggregate.rs

use ndarray::{Array1, Array2, Axis};

use crate::data_analysis::bins::BinEdges;
use crate::data_analysis::cdf::CdfMatrix;
use crate::error::{BurstError, Result};

/// Column-wise mean of a `CdfMatrix`.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedCdf {
    pub values: Array1<f64>,
    pub edges: BinEdges,
}

pub fn average_cdf(cdfs: &CdfMatrix) -> Result<AveragedCdf> {
    let values = cdfs
        .values()
        .mean_axis(Axis(0))
        .ok_or(BurstError::EmptySample { trial: None })?;
    Ok(AveragedCdf {
        values,
        edges: cdfs.edges().clone(),
    })
}

/// Per-trial relative frequencies (trials x bins) and their mean across trials.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativeFrequency {
    pub per_trial: Array2<f64>,
    pub average: Array1<f64>,
    pub edges: BinEdges,
}

/// Counts per half-open bin `[e_k, e_k+1)`; the last bin also includes its right edge.
/// Values outside `[first, last]` are not counted.
pub fn histogram(sample: &[f64], edges: &BinEdges) -> Vec<usize> {
    let e = edges.as_slice();
    let mut counts = vec![0usize; edges.bin_count()];
    if counts.is_empty() {
        return counts;
    }
    let (lo, hi) = (edges.first(), edges.last());
    for &x in sample {
        if !(lo..=hi).contains(&x) {
            continue;
        }
        // Index of the last edge <= x, capped to the last bin.
        let bin = (e.partition_point(|&edge| edge <= x) - 1).min(counts.len() - 1);
        counts[bin] += 1;
    }
    counts
}

/// `histogram(sample) / len(sample)` for every trial, then averaged across trials.
///
/// Relative frequencies are normalised by the whole sample, so out-of-range values make a
/// row sum to less than one.
pub fn average_relative_frequency(samples: &[Vec<f64>], edges: &BinEdges) -> Result<RelativeFrequency> {
    if edges.bin_count() == 0 {
        return Err(BurstError::InvalidBins(
            "a histogram needs at least two edges".to_string(),
        ));
    }
    if samples.is_empty() {
        return Err(BurstError::EmptySample { trial: None });
    }
    let mut per_trial = Array2::<f64>::zeros((samples.len(), edges.bin_count()));
    for (n, sample) in samples.iter().enumerate() {
        if sample.is_empty() {
            return Err(BurstError::EmptySample { trial: Some(n) });
        }
        let len = sample.len() as f64;
        for (k, count) in histogram(sample, edges).into_iter().enumerate() {
            per_trial[[n, k]] = count as f64 / len;
        }
    }
    let average = per_trial
        .mean_axis(Axis(0))
        .ok_or(BurstError::EmptySample { trial: None })?;
    Ok(RelativeFrequency {
        per_trial,
        average,
        edges: edges.clone(),
    })
}
