// src/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_DOMAIN_TOLERANCE, DEFAULT_DUTY_CYCLE_BINS, DEFAULT_DUTY_CYCLE_PLOT_MAX,
    DEFAULT_HEADER_LINES, DEFAULT_MAX_REL_FREQ, DEFAULT_QUANTILE_GRID, DEFAULT_SKIN_FACTOR,
    DEFAULT_TIME_BINS, DEFAULT_TIME_PLOT_MAX_S, MAX_BIN_EDGES, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::error::{BurstError, Result};
use crate::measure_names::Measure;

/// A `[start, stop)` range sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinRange {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl BinRange {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.start.is_finite() && self.stop.is_finite() && self.step.is_finite()) {
            return Err(BurstError::InvalidBins(format!(
                "non-finite range {}..{} step {}",
                self.start, self.stop, self.step
            )));
        }
        if self.step <= 0.0 {
            return Err(BurstError::InvalidBins(format!(
                "step must be positive, got {}",
                self.step
            )));
        }
        if self.stop <= self.start {
            return Err(BurstError::InvalidBins(format!(
                "stop {} must exceed start {}",
                self.stop, self.start
            )));
        }
        let count = ((self.stop - self.start) / self.step).ceil();
        if count > MAX_BIN_EDGES as f64 {
            return Err(BurstError::InvalidBins(format!(
                "{count} edges exceed the limit of {MAX_BIN_EDGES}"
            )));
        }
        Ok(())
    }
}

impl From<(f64, f64, f64)> for BinRange {
    fn from((start, stop, step): (f64, f64, f64)) -> Self {
        Self { start, stop, step }
    }
}

/// Binning and plotting metadata for one measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureConfig {
    pub bin_start: f64,
    pub bin_stop: f64,
    pub bin_step: f64,
    pub label: String,
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    /// Upper x limit in plots.
    pub plot_max: f64,
}

impl MeasureConfig {
    pub fn default_for(measure: Measure) -> Self {
        let (bins, plot_max) = match measure {
            Measure::DutyCycle => (DEFAULT_DUTY_CYCLE_BINS, DEFAULT_DUTY_CYCLE_PLOT_MAX),
            _ => (DEFAULT_TIME_BINS, DEFAULT_TIME_PLOT_MAX_S),
        };
        let x_label = if measure.is_time() {
            format!("{} (secs)", measure.full_name())
        } else {
            measure.full_name().to_string()
        };
        // Only the left column of the 2x2 figure carries a y label.
        let y_label = match measure {
            Measure::BurstDur | Measure::DutyCycle => "Relative Frequency".to_string(),
            Measure::CycleDur | Measure::Qi => String::new(),
        };
        Self {
            bin_start: bins.0,
            bin_stop: bins.1,
            bin_step: bins.2,
            label: measure.full_name().to_string(),
            x_label,
            y_label,
            plot_max,
        }
    }

    pub fn bin_range(&self) -> BinRange {
        BinRange::new(self.bin_start, self.bin_stop, self.bin_step)
    }
}

/// Per-measure table, one entry per `Measure` variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureTable {
    #[serde(default = "MeasureTable::default_burst_dur")]
    pub burst_dur: MeasureConfig,
    #[serde(default = "MeasureTable::default_cycle_dur")]
    pub cycle_dur: MeasureConfig,
    #[serde(default = "MeasureTable::default_duty_cycle")]
    pub duty_cycle: MeasureConfig,
    #[serde(default = "MeasureTable::default_qi")]
    pub qi: MeasureConfig,
}

impl MeasureTable {
    fn default_burst_dur() -> MeasureConfig {
        MeasureConfig::default_for(Measure::BurstDur)
    }
    fn default_cycle_dur() -> MeasureConfig {
        MeasureConfig::default_for(Measure::CycleDur)
    }
    fn default_duty_cycle() -> MeasureConfig {
        MeasureConfig::default_for(Measure::DutyCycle)
    }
    fn default_qi() -> MeasureConfig {
        MeasureConfig::default_for(Measure::Qi)
    }

    pub fn get(&self, measure: Measure) -> &MeasureConfig {
        match measure {
            Measure::BurstDur => &self.burst_dur,
            Measure::CycleDur => &self.cycle_dur,
            Measure::DutyCycle => &self.duty_cycle,
            Measure::Qi => &self.qi,
        }
    }
}

impl Default for MeasureTable {
    fn default() -> Self {
        Self {
            burst_dur: Self::default_burst_dur(),
            cycle_dur: Self::default_cycle_dur(),
            duty_cycle: Self::default_duty_cycle(),
            qi: Self::default_qi(),
        }
    }
}

/// How repeated probabilities (flat CDF regions) are treated when inverting a CDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FlatRegionPolicy {
    /// Keep both ends of each flat region. A query at the flat level returns its first
    /// edge; a query between levels interpolates from the end of the lower region to the
    /// start of the upper one.
    #[default]
    KeepEnds,
    /// Keep the smallest edge reaching each probability.
    KeepFirst,
    /// Keep the largest edge at each probability.
    KeepLast,
    /// Fail with `NonMonotonicDomain`.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSettings {
    #[serde(default = "PlotSettings::default_width")]
    pub width: u32,
    #[serde(default = "PlotSettings::default_height")]
    pub height: u32,
    #[serde(default = "PlotSettings::default_max_rel_freq")]
    pub max_rel_freq: f64,
    #[serde(default = "PlotSettings::default_skin_factor")]
    pub skin_factor: f64,
}

impl PlotSettings {
    fn default_width() -> u32 {
        PLOT_WIDTH
    }
    fn default_height() -> u32 {
        PLOT_HEIGHT
    }
    fn default_max_rel_freq() -> f64 {
        DEFAULT_MAX_REL_FREQ
    }
    fn default_skin_factor() -> f64 {
        DEFAULT_SKIN_FACTOR
    }
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            max_rel_freq: Self::default_max_rel_freq(),
            skin_factor: Self::default_skin_factor(),
        }
    }
}

/// Immutable analysis configuration handed to every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub flat_regions: FlatRegionPolicy,
    #[serde(default = "AnalysisConfig::default_domain_tolerance")]
    pub domain_tolerance: f64,
    #[serde(default = "AnalysisConfig::default_header_lines")]
    pub header_lines: usize,
    /// Invert each measure's own bins instead of `quantile_grid`.
    #[serde(default)]
    pub quantiles_on_measure_bins: bool,
    /// Evaluation grid for quantiles.
    #[serde(default = "AnalysisConfig::default_quantile_grid")]
    pub quantile_grid: BinRange,
    #[serde(default)]
    pub measures: MeasureTable,
    #[serde(default)]
    pub plot: PlotSettings,
}

impl AnalysisConfig {
    fn default_quantile_grid() -> BinRange {
        DEFAULT_QUANTILE_GRID.into()
    }
    fn default_domain_tolerance() -> f64 {
        DEFAULT_DOMAIN_TOLERANCE
    }
    fn default_header_lines() -> usize {
        DEFAULT_HEADER_LINES
    }

    /// Reads and validates a TOML configuration file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|err| {
            BurstError::config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&contents)
            .map_err(|err| BurstError::config(format!("{}: {err}", path.display())))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let cfg: AnalysisConfig =
            toml::from_str(contents).map_err(|err| BurstError::config(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| BurstError::config(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        for measure in Measure::ALL {
            self.measures
                .get(measure)
                .bin_range()
                .validate()
                .map_err(|err| BurstError::config(format!("measures.{measure}: {err}")))?;
        }
        self.quantile_grid
            .validate()
            .map_err(|err| BurstError::config(format!("quantile_grid: {err}")))?;
        if !(self.domain_tolerance.is_finite() && self.domain_tolerance >= 0.0) {
            return Err(BurstError::config(format!(
                "domain_tolerance must be a non-negative number, got {}",
                self.domain_tolerance
            )));
        }
        if !(0.0..=1.0).contains(&self.plot.skin_factor) {
            return Err(BurstError::config(format!(
                "plot.skin_factor must lie in [0, 1], got {}",
                self.plot.skin_factor
            )));
        }
        Ok(())
    }

    pub fn measure(&self, measure: Measure) -> &MeasureConfig {
        self.measures.get(measure)
    }

    /// Grid the averaged CDF is evaluated on before inversion.
    pub fn quantile_range(&self, measure: Measure) -> BinRange {
        if self.quantiles_on_measure_bins {
            self.measure(measure).bin_range()
        } else {
            self.quantile_grid
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            flat_regions: FlatRegionPolicy::default(),
            domain_tolerance: Self::default_domain_tolerance(),
            header_lines: Self::default_header_lines(),
            quantiles_on_measure_bins: false,
            quantile_grid: Self::default_quantile_grid(),
            measures: MeasureTable::default(),
            plot: PlotSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_ranges() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.measure(Measure::BurstDur).bin_range(), BinRange::new(1.0, 50.0, 1.0));
        assert_eq!(cfg.measure(Measure::Qi).bin_range(), BinRange::new(1.0, 50.0, 1.0));
        assert_eq!(cfg.measure(Measure::DutyCycle).bin_range(), BinRange::new(0.0, 1.0, 0.04));
        assert_eq!(cfg.measure(Measure::CycleDur).label, "Cycle Duration");
        assert_eq!(cfg.measure(Measure::Qi).x_label, "Quiescence Interval (secs)");
        assert_eq!(cfg.quantile_range(Measure::DutyCycle), BinRange::new(0.0, 30.0, 1e-3));
        assert_eq!(cfg.flat_regions, FlatRegionPolicy::KeepEnds);
        assert_eq!(cfg.header_lines, 1);
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AnalysisConfig::from_toml_str(
            r#"
            flat_regions = "reject"
            header_lines = 2
            quantiles_on_measure_bins = true

            [measures.duty_cycle]
            bin_start = 0.0
            bin_stop = 1.0
            bin_step = 0.1
            label = "Duty"
            x_label = "Duty"
            plot_max = 1.0

            [plot]
            max_rel_freq = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.flat_regions, FlatRegionPolicy::Reject);
        assert_eq!(cfg.header_lines, 2);
        assert_eq!(cfg.measure(Measure::DutyCycle).bin_step, 0.1);
        assert_eq!(cfg.measure(Measure::DutyCycle).y_label, "");
        assert_eq!(cfg.measure(Measure::BurstDur).bin_stop, 50.0);
        assert_eq!(cfg.plot.max_rel_freq, 0.5);
        assert_eq!(cfg.plot.skin_factor, DEFAULT_SKIN_FACTOR);
        assert_eq!(cfg.quantile_range(Measure::DutyCycle), BinRange::new(0.0, 1.0, 0.1));
    }

    #[test]
    fn toml_round_trip_of_defaults() {
        let cfg = AnalysisConfig::default();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(AnalysisConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn rejects_bad_bins() {
        let err = AnalysisConfig::from_toml_str(
            r#"
            [quantile_grid]
            start = 0.0
            stop = 30.0
            step = 0.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BurstError::Config(ref msg) if msg.contains("quantile_grid")));
    }

    #[test]
    fn oversized_grid_is_rejected() {
        let err = BinRange::new(0.0, 30.0, 1e-12).validate().unwrap_err();
        assert!(matches!(err, BurstError::InvalidBins(ref msg) if msg.contains("limit")));
        assert!(BinRange::new(0.0, 1.0, 1e-6).validate().is_ok());

        let err = AnalysisConfig::from_toml_str(
            r#"
            [quantile_grid]
            start = 0.0
            stop = 30.0
            step = 1e-12
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BurstError::Config(ref msg) if msg.contains("quantile_grid")));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = AnalysisConfig::load(Path::new("/nonexistent/burst_analysis.toml")).unwrap_err();
        assert!(matches!(err, BurstError::Config(_)));
    }
}
