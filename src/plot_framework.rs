// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{ErrorBar, PathElement, Pie, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::ops::Range;

use crate::constants::{LINE_WIDTH_LEGEND, PLOT_HEIGHT, PLOT_WIDTH, RANGE_GROWTH_FACTOR};
use crate::font_config::{
    FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_LEGEND, FONT_TUPLE_MAIN_TITLE,
    FONT_TUPLE_MESSAGE,
};
use crate::types::{PlotResult, TimeSeries};

type PlotArea<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Starts from a panel's default range and grows it so every point fits.
///
/// The maximum becomes 1.2 × the data maximum when it exceeds the default
/// maximum; the minimum moves below the data minimum by the same factor when
/// it falls under the default minimum.
pub fn grow_range(default: (f64, f64), series: &[&TimeSeries]) -> Range<f64> {
    let values: Vec<f64> = series
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .filter(|y| y.is_finite())
        .collect();
    let (mut min, mut max) = default;
    let data_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let data_min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if data_max > max {
        max = data_max * RANGE_GROWTH_FACTOR;
    }
    if data_min < min {
        min = data_min - (RANGE_GROWTH_FACTOR - 1.0) * data_min.abs();
    }
    min..max
}

/// X range from zero-based default, grown to 1.2 × `data_max` when needed.
pub fn grow_x_range(default: (f64, f64), data_max: f64) -> Range<f64> {
    if data_max > default.1 {
        default.0..data_max * RANGE_GROWTH_FACTOR
    } else {
        default.0..default.1
    }
}

/// Axis tick label: k/M notation for large values, one decimal for small
/// fractional ones. dB scales stay integer.
pub fn format_axis_value(y: f64, axis_label: &str) -> String {
    if axis_label.contains("dB") {
        format!("{:.0}", y)
    } else if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1000.0 {
        format!("{:.0}k", y / 1000.0)
    } else if y.abs() < 10.0 && y.fract() != 0.0 {
        format!("{:.1}", y)
    } else {
        format!("{:.0}", y)
    }
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(area: &PlotArea<'_>, panel_title: &str, reason: &str) -> PlotResult {
    // Constants for text rendering
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{panel_title} Data Unavailable:\n{reason}");

    let font_size = FONT_TUPLE_MESSAGE.1;
    let estimated_char_width = (font_size as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = font_size + LINE_HEIGHT_SPACING;
    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width / 2 - estimated_text_width / 2;
    let center_y = height / 2 - estimated_text_height / 2;

    let text_style = FONT_TUPLE_MESSAGE.into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: TimeSeries,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// A time-series panel.
#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
}

/// One vertical bar; `error` draws a symmetric error bar around `top`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub width: f64,
    pub bottom: f64,
    pub top: f64,
    pub error: Option<f64>,
}

#[derive(Clone)]
pub struct BarSeries {
    pub bars: Vec<Bar>,
    pub label: String,
    pub color: RGBColor,
}

/// A vertical bar panel. With `categories`, x ticks at 1..=n carry those
/// names instead of numbers.
#[derive(Clone)]
pub struct BarChartConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<BarSeries>,
    pub x_label: String,
    pub y_label: String,
    pub categories: Option<Vec<String>>,
}

/// Horizontal bars, one per category from top to bottom.
#[derive(Clone)]
pub struct HorizontalBarConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub color: RGBColor,
    pub x_label: String,
    pub y_label: String,
}

#[derive(Clone)]
pub struct PieConfig {
    pub title: String,
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub colors: Vec<RGBColor>,
}

#[derive(Clone)]
pub enum Panel {
    Lines(PlotConfig),
    Bars(BarChartConfig),
    HorizontalBars(HorizontalBarConfig),
    Pie(PieConfig),
}

impl Panel {
    pub fn title(&self) -> &str {
        match self {
            Panel::Lines(config) => &config.title,
            Panel::Bars(config) => &config.title,
            Panel::HorizontalBars(config) => &config.title,
            Panel::Pie(config) => &config.title,
        }
    }

    /// Why the panel cannot be drawn, if it cannot.
    pub fn unavailable_reason(&self) -> Option<&'static str> {
        let (has_data, valid_ranges) = match self {
            Panel::Lines(c) => (
                c.series.iter().any(|s| !s.data.is_empty()),
                c.x_range.end > c.x_range.start && c.y_range.end > c.y_range.start,
            ),
            Panel::Bars(c) => (
                c.series.iter().any(|s| !s.bars.is_empty()),
                c.x_range.end > c.x_range.start && c.y_range.end > c.y_range.start,
            ),
            Panel::HorizontalBars(c) => (!c.values.is_empty(), c.x_range.end > c.x_range.start),
            Panel::Pie(c) => (
                c.values.iter().any(|&v| v > 0.0),
                c.values.iter().all(|v| v.is_finite() && *v >= 0.0),
            ),
        };
        if !has_data {
            Some("No data points")
        } else if !valid_ranges {
            Some("Invalid ranges")
        } else {
            None
        }
    }
}

fn draw_line_chart(area: &PlotArea<'_>, plot_config: &PlotConfig) -> PlotResult {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, FONT_TUPLE_CHART_TITLE)
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(10)
        .y_labels(8)
        .y_label_formatter(&|y| format_axis_value(*y, &plot_config.y_label))
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    let mut legend_series_count = 0;
    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let series = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            s.color.stroke_width(s.stroke_width),
        ))?;
        if !s.label.is_empty() {
            series.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], s.color.stroke_width(LINE_WIDTH_LEGEND))
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
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }
    Ok(())
}

fn draw_bar_chart(area: &PlotArea<'_>, config: &BarChartConfig) -> PlotResult {
    let mut chart = ChartBuilder::on(area)
        .caption(&config.title, FONT_TUPLE_CHART_TITLE)
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(config.x_range.clone(), config.y_range.clone())?;

    let category_label = |x: &f64| -> String {
        match &config.categories {
            Some(names) => {
                let rounded = x.round();
                if (x - rounded).abs() < 1e-6 && rounded >= 1.0 {
                    names.get(rounded as usize - 1).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            }
            None => format!("{:.0}", x),
        }
    };
    let x_label_count = match &config.categories {
        Some(names) => names.len() + 2,
        None => 10,
    };

    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .x_labels(x_label_count)
        .y_labels(8)
        .x_label_formatter(&category_label)
        .y_label_formatter(&|y| format_axis_value(*y, &config.y_label))
        .disable_x_mesh()
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    let mut legend_series_count = 0;
    for s in &config.series {
        let color = s.color;
        let drawn = chart.draw_series(s.bars.iter().map(|bar| {
            Rectangle::new(
                [(bar.x - bar.width / 2.0, bar.bottom), (bar.x + bar.width / 2.0, bar.top)],
                color.filled(),
            )
        }))?;
        if !s.label.is_empty() {
            drawn.label(&s.label).legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled())
            });
            legend_series_count += 1;
        }
        chart.draw_series(s.bars.iter().filter_map(|bar| {
            bar.error.map(|error| {
                ErrorBar::new_vertical(
                    bar.x,
                    bar.top - error,
                    bar.top,
                    bar.top + error,
                    BLACK.stroke_width(1),
                    8,
                )
            })
        }))?;
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }
    Ok(())
}

fn draw_horizontal_bar_chart(area: &PlotArea<'_>, config: &HorizontalBarConfig) -> PlotResult {
    let count = config.categories.len();
    let mut chart = ChartBuilder::on(area)
        .caption(&config.title, FONT_TUPLE_CHART_TITLE)
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(config.x_range.clone(), -0.5..count as f64 - 0.5)?;

    // Row 0 is drawn at the top.
    let row_label = |y: &f64| -> String {
        let rounded = y.round();
        if (y - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        let row = count.checked_sub(1 + rounded as usize);
        row.and_then(|row| config.categories.get(row))
            .cloned()
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_desc(&config.x_label)
        .y_desc(&config.y_label)
        .y_labels(count + 1)
        .y_label_formatter(&row_label)
        .disable_y_mesh()
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    let color = config.color.mix(0.8);
    chart.draw_series(config.values.iter().enumerate().map(|(row, &value)| {
        let y = (count - 1 - row) as f64;
        Rectangle::new([(0.0, y - 0.4), (value, y + 0.4)], color.filled())
    }))?;
    Ok(())
}

fn draw_pie_chart(area: &PlotArea<'_>, config: &PieConfig) -> PlotResult {
    let titled = area.titled(&config.title, FONT_TUPLE_CHART_TITLE)?;
    let (x_range, y_range) = titled.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let center = (width / 2, height / 2);
    let radius = f64::from(width.min(height)) * 0.3;

    let mut pie = Pie::new(&center, &radius, &config.values, &config.colors, &config.labels);
    pie.start_angle(90.0);
    pie.label_style(FONT_TUPLE_LEGEND.into_font().color(&BLACK));
    pie.percentages(FONT_TUPLE_AXIS_LABEL.into_font().color(&BLACK));
    titled.draw(&pie)?;
    Ok(())
}

fn draw_panel(area: &PlotArea<'_>, panel: &Panel) -> PlotResult {
    match panel {
        Panel::Lines(config) => draw_line_chart(area, config),
        Panel::Bars(config) => draw_bar_chart(area, config),
        Panel::HorizontalBars(config) => draw_horizontal_bar_chart(area, config),
        Panel::Pie(config) => draw_pie_chart(area, config),
    }
}

/// Renders `panels` row by row into a `grid` of subplots and saves the image.
/// `None` leaves a cell blank.
pub fn draw_panel_grid(
    output_filename: &str,
    main_title: &str,
    grid: (usize, usize),
    panels: &[Option<Panel>],
) -> PlotResult {
    let root_area =
        BitMapBackend::new(output_filename, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        main_title,
        (10, 10),
        FONT_TUPLE_MAIN_TITLE.into_font().color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly(grid);
    let mut any_panel_plotted = false;

    for (area, panel) in sub_plot_areas.iter().zip(panels.iter()) {
        let Some(panel) = panel else {
            continue;
        };
        match panel.unavailable_reason() {
            None => {
                draw_panel(area, panel)?;
                any_panel_plotted = true;
            }
            Some(reason) => draw_unavailable_message(area, panel.title(), reason)?,
        }
    }
    if panels.len() > sub_plot_areas.len() {
        log::warn!(
            "'{}': {} panels do not fit a {}x{} grid",
            output_filename,
            panels.len() - sub_plot_areas.len(),
            grid.0,
            grid.1
        );
    }

    root_area.present()?;
    if any_panel_plotted {
        println!("  Plot saved as '{output_filename}'.");
    } else {
        println!("  Saved '{output_filename}' with placeholder messages only: no data available for any panel.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_kept_when_data_fits() {
        let data = vec![(0.0, 10.0), (1.0, 90.0)];
        assert_eq!(grow_range((0.0, 100.0), &[&data]), 0.0..100.0);
    }

    #[test]
    fn test_range_grows_past_data_maximum() {
        let a = vec![(0.0, 50.0)];
        let b = vec![(0.0, 250.0)];
        let range = grow_range((0.0, 200.0), &[&a, &b]);
        assert_eq!(range.start, 0.0);
        assert!((range.end - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_range_grows_below_negative_minimum() {
        let data = vec![(0.0, -20.0), (1.0, 3.0)];
        let range = grow_range((-15.0, 15.0), &[&data]);
        assert!((range.start + 24.0).abs() < 1e-9);
        assert_eq!(range.end, 15.0);
    }

    #[test]
    fn test_empty_series_keep_default_range() {
        let empty: TimeSeries = Vec::new();
        assert_eq!(grow_range((-3.2, 3.2), &[&empty]), -3.2..3.2);
    }

    #[test]
    fn test_x_range_grows_with_duration() {
        assert_eq!(grow_x_range((0.0, 10.0), 4.0), 0.0..10.0);
        let range = grow_x_range((0.0, 10.0), 50.0);
        assert!((range.end - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_pie_without_counts_is_unavailable() {
        let panel = Panel::Pie(PieConfig {
            title: "Overall frames".to_string(),
            values: vec![0.0, 0.0],
            labels: vec!["a".to_string(), "b".to_string()],
            colors: vec![BLACK, RED],
        });
        assert_eq!(panel.unavailable_reason(), Some("No data points"));
    }

    #[test]
    fn test_line_panel_with_data_is_available() {
        let panel = Panel::Lines(PlotConfig {
            title: "Speeds".to_string(),
            x_range: 0.0..10.0,
            y_range: -15.0..15.0,
            series: vec![PlotSeries {
                data: vec![(0.0, 1.0)],
                label: String::new(),
                color: BLACK,
                stroke_width: 1,
            }],
            x_label: "Time (s)".to_string(),
            y_label: "(m/s)".to_string(),
        });
        assert_eq!(panel.unavailable_reason(), None);
    }
}

// src/plot_framework.rs
