// src/plot_functions/mod.rs

pub mod plot_cdf_comparison;
pub mod plot_relative_frequency;

// src/plot_functions/mod.rs
