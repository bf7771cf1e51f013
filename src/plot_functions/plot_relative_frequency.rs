// src/plot_functions/plot_relative_frequency.rs

use std::error::Error;
use std::path::Path;

use crate::comparison::ComparisonReport;
use crate::config::AnalysisConfig;
use crate::constants::{COLOR_BAR_FIRST, COLOR_BAR_OUTLINE, COLOR_BAR_SECOND};
use crate::data_analysis::aggregate::RelativeFrequency;
use crate::measure_names::Group;
use crate::plot_framework::{draw_measure_grid, BarSeries, PanelConfig};

/// One bar per bin, `width` wide, centred on the bin's left edge plus `shift`.
fn bar_rects(rf: &RelativeFrequency, width: f64, shift: f64) -> Vec<(f64, f64, f64)> {
    rf.edges
        .as_slice()
        .iter()
        .zip(rf.average.iter())
        .map(|(&left_edge, &height)| {
            let centre = left_edge + shift;
            (centre - width / 2.0, centre + width / 2.0, height)
        })
        .collect()
}

/// Widths and centre offsets `(wide_width, narrow_width, narrow_shift)` of the two bar groups.
pub fn bar_layout(bin_width: f64, skin_factor: f64) -> (f64, f64, f64) {
    (
        bin_width,
        bin_width * skin_factor,
        bin_width * (1.0 - skin_factor) / 2.0,
    )
}

/// Generates the 2x2 relative-frequency comparison (WT wide white bars, EKI narrow black bars).
pub fn plot_relative_frequency(
    report: &ComparisonReport,
    config: &AnalysisConfig,
    output_dir: &Path,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = output_dir
        .join(format!("{root_name}_RelFreq_comparison.png"))
        .to_string_lossy()
        .into_owned();
    let size = (config.plot.width, config.plot.height);
    let (wide_group, narrow_group) = (Group::Wt, Group::Eki);

    draw_measure_grid(&output_file, root_name, "Relative Frequency", size, |measure| {
        let measure_cfg = config.measure(measure);
        let rf_of = |group| {
            report
                .measure(group, measure)
                .and_then(|m| m.relative_frequency.as_ref())
        };
        let empty = |group: Group, fill| BarSeries {
            bars: vec![],
            label: group.label().to_string(),
            fill,
            outline: *COLOR_BAR_OUTLINE,
        };
        let mut wide = empty(wide_group, *COLOR_BAR_FIRST);
        let mut narrow = empty(narrow_group, *COLOR_BAR_SECOND);

        let (wide_rf, narrow_rf) = (rf_of(wide_group), rf_of(narrow_group));
        if wide_rf.is_none() && narrow_rf.is_none() {
            return None;
        }
        let (wide_width, narrow_width, shift) =
            bar_layout(measure_cfg.bin_step, config.plot.skin_factor);
        if let Some(rf) = wide_rf {
            wide.bars = bar_rects(rf, wide_width, 0.0);
        }
        if let Some(rf) = narrow_rf {
            narrow.bars = bar_rects(rf, narrow_width, shift);
        }

        Some(PanelConfig {
            title: measure_cfg.label.clone(),
            x_range: 0.0..measure_cfg.plot_max,
            y_range: 0.0..config.plot.max_rel_freq,
            x_label: measure_cfg.x_label.clone(),
            y_label: measure_cfg.y_label.clone(),
            bars: vec![wide, narrow],
            lines: vec![],
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_analysis::bins::BinEdges;
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn rf(average: ndarray::Array1<f64>) -> RelativeFrequency {
        RelativeFrequency {
            per_trial: Array2::zeros((1, average.len())),
            average,
            edges: BinEdges::from_vec(vec![1.0, 2.0, 3.0]).unwrap(),
        }
    }

    #[test]
    fn test_narrow_bars_shifted_by_skin() {
        let (wide_width, narrow_width, shift) = bar_layout(1.0, 0.3);
        let wide = bar_rects(&rf(array![0.5, 0.5]), wide_width, 0.0);
        let narrow = bar_rects(&rf(array![0.25, 0.75]), narrow_width, shift);
        assert_eq!(wide.len(), 2);
        assert_relative_eq!(wide[0].0, 0.5);
        assert_relative_eq!(wide[0].1, 1.5);
        // Centre at 1 + 0.35, width 0.3.
        assert_relative_eq!(narrow[0].0, 1.2, epsilon = 1e-12);
        assert_relative_eq!(narrow[0].1, 1.5, epsilon = 1e-12);
        assert_relative_eq!(narrow[1].2, 0.75);
    }
}

// src/plot_functions/plot_relative_frequency.rs
