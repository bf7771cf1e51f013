// src/constants.rs

use plotters::style::colors::{BLACK, BLUE, RED, WHITE};
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1500;
pub const PLOT_HEIGHT: u32 = 1500;

// Default bin triplets (start, stop, step). Stop is exclusive.
pub const DEFAULT_TIME_BINS: (f64, f64, f64) = (1.0, 50.0, 1.0);
pub const DEFAULT_DUTY_CYCLE_BINS: (f64, f64, f64) = (0.0, 1.0, 0.04);

// Fine evaluation grid for quantile inversion.
pub const DEFAULT_QUANTILE_GRID: (f64, f64, f64) = (0.0, 30.0, 1e-3);
// Upper bound on the edges any bin range may generate.
pub const MAX_BIN_EDGES: usize = 10_000_000;

// Plot x-axis maxima.
pub const DEFAULT_TIME_PLOT_MAX_S: f64 = 30.0;
pub const DEFAULT_DUTY_CYCLE_PLOT_MAX: f64 = 1.0;

// Cumulative probabilities used for the summary statistics.
pub const QUARTILE_PROBABILITIES: [f64; 3] = [0.25, 0.50, 0.75];
pub const MIN_QUANTILE_P: f64 = 0.01;
pub const MAX_QUANTILE_P: f64 = 1.0;

// Slack admitted at the ends of the quantile domain.
pub const DEFAULT_DOMAIN_TOLERANCE: f64 = 1e-9;

pub const DEFAULT_HEADER_LINES: usize = 1;

// Relative-frequency bar plot appearance.
pub const DEFAULT_MAX_REL_FREQ: f64 = 0.33;
pub const DEFAULT_SKIN_FACTOR: f64 = 0.3;

// --- Plot Color Assignments ---
pub const COLOR_GROUP_EKI: &RGBColor = &RED;
pub const COLOR_GROUP_WT: &RGBColor = &BLUE;
pub const COLOR_BAR_FIRST: &RGBColor = &WHITE;
pub const COLOR_BAR_SECOND: &RGBColor = &BLACK;
pub const COLOR_BAR_OUTLINE: &RGBColor = &BLACK;

// Opacity of the per-trial CDF lines behind the group average.
pub const TRIAL_CDF_OPACITY: f64 = 0.35;
pub const AVERAGE_CDF_OPACITY: f64 = 0.6;

// Stroke widths for lines
pub const LINE_WIDTH_TRIAL: u32 = 1;
pub const LINE_WIDTH_AVERAGE: u32 = 3;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 16;
pub const FONT_SIZE_MESSAGE: i32 = 18;
pub const FONT_SIZE_PANEL_LETTER: i32 = 28;

// src/constants.rs
