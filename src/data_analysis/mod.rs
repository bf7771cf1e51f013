// src/data_analysis/mod.rs

pub mod aggregate;
pub mod bins;
pub mod burst_measures;
pub mod cdf;
pub mod quantile;

// src/data_analysis/mod.rs
