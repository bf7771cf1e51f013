// src/types.rs
// Type aliases to reduce complexity warnings

use crate::measure_names::{GROUP_COUNT, MEASURE_COUNT};

/// One numeric sequence per trial.
pub type TrialSamples = Vec<Vec<f64>>;

/// Table indexed by `Measure::index()`.
pub type PerMeasure<T> = [T; MEASURE_COUNT];

/// Table indexed by `Group::index()`.
pub type PerGroup<T> = [T; GROUP_COUNT];
