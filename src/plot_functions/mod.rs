// src/plot_functions/mod.rs

use std::ops::Range;

use plotters::style::RGBColor;

use crate::constants::LINE_WIDTH_PLOT;
use crate::plot_framework::{grow_range, Panel, PlotConfig, PlotSeries};
use crate::types::TimeSeries;

pub mod plot_frame_info;
pub mod plot_pcmd;
pub mod plot_rtp_reader;
pub mod plot_rtp_sender;
pub mod plot_sender_reader;
pub mod plot_video_stats;

pub(crate) fn series(data: TimeSeries, label: &str, color: &RGBColor) -> PlotSeries {
    PlotSeries {
        data,
        label: label.to_string(),
        color: *color,
        stroke_width: LINE_WIDTH_PLOT,
    }
}

/// Line panel whose y range starts at `default_y` and grows to fit the data.
pub(crate) fn lines_panel(
    title: &str,
    x_range: Range<f64>,
    default_y: (f64, f64),
    series: Vec<PlotSeries>,
    x_label: &str,
    y_label: &str,
) -> Panel {
    let data: Vec<&TimeSeries> = series.iter().map(|s| &s.data).collect();
    let y_range = grow_range(default_y, &data);
    Panel::Lines(PlotConfig {
        title: title.to_string(),
        x_range,
        y_range,
        series,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
    })
}

/// Largest x over all series, 0 when there is none.
pub(crate) fn x_max(series: &[&TimeSeries]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.iter().map(|&(x, _)| x))
        .fold(0.0, f64::max)
}

// src/plot_functions/mod.rs
