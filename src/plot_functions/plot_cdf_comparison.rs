// src/plot_functions/plot_cdf_comparison.rs

use plotters::style::RGBColor;
use std::error::Error;
use std::path::Path;

use crate::comparison::ComparisonReport;
use crate::config::AnalysisConfig;
use crate::constants::{
    AVERAGE_CDF_OPACITY, COLOR_GROUP_EKI, COLOR_GROUP_WT, LINE_WIDTH_AVERAGE, LINE_WIDTH_TRIAL,
    TRIAL_CDF_OPACITY,
};
use crate::measure_names::Group;
use crate::plot_framework::{draw_measure_grid, PanelConfig, PlotSeries};

pub fn group_color(group: Group) -> RGBColor {
    match group {
        Group::Eki => *COLOR_GROUP_EKI,
        Group::Wt => *COLOR_GROUP_WT,
    }
}

/// Generates the 2x2 CDF comparison: every trial thin, each group's average thick (Red EKI, Blue WT).
pub fn plot_cdf_comparison(
    report: &ComparisonReport,
    config: &AnalysisConfig,
    output_dir: &Path,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = output_dir
        .join(format!("{root_name}_CDF_comparison.png"))
        .to_string_lossy()
        .into_owned();
    let size = (config.plot.width, config.plot.height);

    draw_measure_grid(&output_file, root_name, "CDF", size, |measure| {
        let measure_cfg = config.measure(measure);
        let mut lines = Vec::new();
        for group in Group::ALL {
            let Some(analysis) = report.measure(group, measure) else {
                continue;
            };
            let color = group_color(group);
            let edges = analysis.cdfs.edges().as_slice();
            for trial in 0..analysis.cdfs.trial_count() {
                lines.push(PlotSeries {
                    data: edges.iter().copied().zip(analysis.cdfs.row(trial).iter().copied()).collect(),
                    label: String::new(),
                    color,
                    stroke_width: LINE_WIDTH_TRIAL,
                    opacity: TRIAL_CDF_OPACITY,
                });
            }
            lines.push(PlotSeries {
                data: edges.iter().copied().zip(analysis.average.values.iter().copied()).collect(),
                label: group.label().to_string(),
                color,
                stroke_width: LINE_WIDTH_AVERAGE,
                opacity: AVERAGE_CDF_OPACITY,
            });
        }
        if lines.is_empty() {
            return None;
        }
        Some(PanelConfig {
            title: measure_cfg.label.clone(),
            x_range: 0.0..measure_cfg.plot_max,
            y_range: 0.0..1.05,
            x_label: measure_cfg.x_label.clone(),
            y_label: "Cumulative Probability".to_string(),
            bars: vec![],
            lines,
        })
    })
}

// src/plot_functions/plot_cdf_comparison.rs
