// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, FONT_SIZE_PANEL_LETTER, LINE_WIDTH_LEGEND,
};
use crate::measure_names::Measure;

/// Panel letters in `Measure::ALL` order.
pub const PANEL_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Draw a "Data Unavailable" message on a panel.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    measure: Measure,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{} {plot_type} Data Unavailable:\n{reason}", measure.full_name());

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

/// A polyline. An empty label keeps the series out of the legend.
#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub opacity: f64,
}

/// Rectangles `(left, right, height)` standing on y = 0.
#[derive(Clone)]
pub struct BarSeries {
    pub bars: Vec<(f64, f64, f64)>,
    pub label: String,
    pub fill: RGBColor,
    pub outline: RGBColor,
}

#[derive(Clone)]
pub struct PanelConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<BarSeries>,
    pub lines: Vec<PlotSeries>,
}

impl PanelConfig {
    pub fn has_data(&self) -> bool {
        self.bars.iter().any(|b| !b.bars.is_empty()) || self.lines.iter().any(|s| !s.data.is_empty())
    }
}

/// Draws one panel: bars first, then lines, then the legend.
fn draw_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    panel: &PanelConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(panel.x_range.clone(), panel.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&panel.x_label)
        .y_desc(&panel.y_label)
        .x_labels(10)
        .y_labels(10)
        .y_label_formatter(&|y| format!("{y:.2}"))
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_series_count = 0;

    for b in &panel.bars {
        if b.bars.is_empty() {
            continue;
        }
        let (fill, outline) = (b.fill, b.outline);
        chart.draw_series(
            b.bars
                .iter()
                .map(|&(left, right, height)| Rectangle::new([(left, 0.0), (right, height)], fill.filled())),
        )?;
        let series = chart.draw_series(
            b.bars
                .iter()
                .map(|&(left, right, height)| Rectangle::new([(left, 0.0), (right, height)], outline.stroke_width(1))),
        )?;
        if !b.label.is_empty() {
            // A white swatch would vanish on the legend background.
            let swatch = if fill.rgb() == WHITE.rgb() {
                outline.stroke_width(LINE_WIDTH_LEGEND)
            } else {
                fill.filled()
            };
            series
                .label(&b.label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], swatch));
            legend_series_count += 1;
        }
    }

    for s in &panel.lines {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        let series = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            color.mix(s.opacity).stroke_width(s.stroke_width),
        ))?;
        if !s.label.is_empty() {
            series.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
            legend_series_count += 1;
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }
    Ok(())
}

/// Draws a 2x2 figure with one lettered panel per measure.
///
/// `get_panel` returns `None` when a measure has nothing to show; that panel gets an
/// unavailable message instead.
pub fn draw_measure_grid<'a, F>(
    output_filename: &'a str,
    figure_title: &str,
    plot_type_name: &str,
    size: (u32, u32),
    mut get_panel: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(Measure) -> Option<PanelConfig>,
    <BitMapBackend<'a> as DrawingBackend>::ErrorType: 'static,
{
    let root_area = BitMapBackend::new(output_filename, size).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        figure_title,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let panel_areas = margined_root_area.split_evenly((2, 2));
    let mut any_panel_plotted = false;

    for measure in Measure::ALL {
        let area = &panel_areas[measure.index()];
        match get_panel(measure) {
            Some(panel) => {
                let valid_ranges =
                    panel.x_range.end > panel.x_range.start && panel.y_range.end > panel.y_range.start;
                if panel.has_data() && valid_ranges {
                    draw_panel(area, &panel)?;
                    any_panel_plotted = true;
                } else {
                    let reason = if !panel.has_data() {
                        "No data points"
                    } else {
                        "Invalid ranges"
                    };
                    draw_unavailable_message(area, measure, plot_type_name, reason)?;
                }
            }
            None => {
                draw_unavailable_message(area, measure, plot_type_name, "Calculation Failed")?;
            }
        }
        area.draw(&Text::new(
            PANEL_LETTERS[measure.index()].to_string(),
            (5, 5),
            ("sans-serif", FONT_SIZE_PANEL_LETTER)
                .into_font()
                .color(&BLACK),
        ))?;
    }

    root_area.present()?;
    if any_panel_plotted {
        println!("  Plot saved as '{output_filename}'.");
    } else {
        println!("  '{output_filename}' saved with placeholder messages only: no measure had data to plot.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_has_data() {
        let mut panel = PanelConfig {
            title: String::new(),
            x_range: 0.0..1.0,
            y_range: 0.0..1.0,
            x_label: String::new(),
            y_label: String::new(),
            bars: vec![],
            lines: vec![],
        };
        assert!(!panel.has_data());
        panel.bars.push(BarSeries {
            bars: vec![(0.0, 0.5, 0.2)],
            label: "EKI".to_string(),
            fill: WHITE,
            outline: BLACK,
        });
        assert!(panel.has_data());
    }
}

// src/plot_framework.rs
