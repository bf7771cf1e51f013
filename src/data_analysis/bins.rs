// src/data_analysis/bins.rs

use crate::config::{AnalysisConfig, BinRange};
use crate::error::{BurstError, Result};
use crate::measure_names::Measure;

/// Strictly increasing evaluation points.
#[derive(Debug, Clone, PartialEq)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Samples `[start, stop)` every `step`, with `ceil((stop - start) / step)` points.
    pub fn from_range(range: BinRange) -> Result<Self> {
        range.validate()?;
        let count = ((range.stop - range.start) / range.step).ceil() as usize;
        let edges = (0..count)
            .map(|i| range.start + i as f64 * range.step)
            .collect();
        Ok(Self { edges })
    }

    pub fn from_vec(edges: Vec<f64>) -> Result<Self> {
        if edges.is_empty() {
            return Err(BurstError::InvalidBins("no bin edges".to_string()));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(BurstError::InvalidBins("non-finite bin edge".to_string()));
        }
        if let Some(idx) = edges.windows(2).position(|w| w[1] <= w[0]) {
            return Err(BurstError::InvalidBins(format!(
                "edges not strictly increasing at index {}",
                idx + 1
            )));
        }
        Ok(Self { edges })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.edges[0]
    }

    pub fn last(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// Number of histogram bins the edges delimit.
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }
}

/// Configured bin edges for a measure.
pub fn bins_for(config: &AnalysisConfig, measure: Measure) -> Result<BinEdges> {
    BinEdges::from_range(config.measure(measure).bin_range())
}

/// Configured bin edges for a measure given by its key, e.g. `"dutyCycle"`.
pub fn bins_for_name(config: &AnalysisConfig, name: &str) -> Result<BinEdges> {
    bins_for(config, name.parse::<Measure>()?)
}

/// Evaluation grid used before inverting a measure's averaged CDF.
pub fn quantile_grid_for(config: &AnalysisConfig, measure: Measure) -> Result<BinEdges> {
    BinEdges::from_range(config.quantile_range(measure))
}
