// src/plot_functions/plot_video_stats.rs

use ndarray::Array1;
use plotters::style::RGBColor;

use crate::constants::{
    BAR_WIDTH_STACKED, BAR_WIDTH_TIMINGS, COLOR_CADET_BLUE, COLOR_FIREBRICK, COLOR_LIGHT_GREEN,
    COLOR_MEDIUM_SEA_GREEN, COLOR_SALMON, COLOR_SHARE_BAR, COLOR_UNKNOWN_MACROBLOCK, RANGE_PERCENT,
};
use crate::data_analysis::video_stats::{
    BinnedTiming, MacroblockStatus, MeanStd, RssiBins, VideoStatsReport,
};
use crate::plot_framework::{
    draw_panel_grid, Bar, BarChartConfig, BarSeries, HorizontalBarConfig, Panel, PieConfig,
};
use crate::types::PlotResult;

const RSSI_LABEL: &str = "RSSI (dBm)";

fn macroblock_color(status: MacroblockStatus) -> RGBColor {
    match status {
        MacroblockStatus::Unknown => COLOR_UNKNOWN_MACROBLOCK,
        MacroblockStatus::ValidI => COLOR_MEDIUM_SEA_GREEN,
        MacroblockStatus::ValidP => COLOR_LIGHT_GREEN,
        MacroblockStatus::MissingConcealed => COLOR_SALMON,
        MacroblockStatus::Missing => COLOR_FIREBRICK,
        MacroblockStatus::ErrorPropagation => COLOR_CADET_BLUE,
    }
}

/// X range one bin wider than the populated bins on each side.
fn rssi_x_range(bins: &RssiBins, weights: &Array1<f64>) -> std::ops::Range<f64> {
    let (min, max) = bins.populated_range(weights).unwrap_or((bins.min, bins.max));
    (min - 1) as f64..(max + 1) as f64
}

/// Stacks per-bin shares (0..1) as percentage bars left of each RSSI value,
/// bottom layer first.
fn stacked_share_bars(
    bins: &RssiBins,
    layers: &[(&Array1<f64>, &str, RGBColor)],
) -> Vec<BarSeries> {
    let mut bottoms = Array1::<f64>::zeros(bins.len());
    layers
        .iter()
        .map(|&(shares, label, color)| {
            let bars = bins
                .rssi_values()
                .into_iter()
                .zip(shares.iter().zip(bottoms.iter()))
                .map(|(rssi, (&share, &bottom))| Bar {
                    x: rssi as f64 - BAR_WIDTH_STACKED / 2.0,
                    width: BAR_WIDTH_STACKED,
                    bottom: bottom * 100.0,
                    top: (bottom + share) * 100.0,
                    error: None,
                })
                .collect();
            bottoms = &bottoms + shares;
            BarSeries {
                bars,
                label: label.to_string(),
                color,
            }
        })
        .collect()
}

/// Bars right of each RSSI value, `share × scale` high.
fn share_bars(bins: &RssiBins, shares: &Array1<f64>, scale: f64, label: &str) -> BarSeries {
    BarSeries {
        bars: bins
            .rssi_values()
            .into_iter()
            .zip(shares.iter())
            .map(|(rssi, &share)| Bar {
                x: rssi as f64 + BAR_WIDTH_STACKED / 2.0,
                width: BAR_WIDTH_STACKED,
                bottom: 0.0,
                top: share * scale,
                error: None,
            })
            .collect(),
        label: label.to_string(),
        color: *COLOR_SHARE_BAR,
    }
}

fn overall_frames_pie(report: &VideoStatsReport) -> Panel {
    let frames = &report.overall_frames;
    Panel::Pie(PieConfig {
        title: "Overall frames".to_string(),
        values: vec![
            frames.output_no_error,
            frames.output_errored,
            frames.discarded,
            frames.missed,
        ],
        labels: ["Output (no errors)", "Output (with errors)", "Discarded", "Missed"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        colors: vec![COLOR_LIGHT_GREEN, COLOR_CADET_BLUE, COLOR_SALMON, COLOR_FIREBRICK],
    })
}

fn zone_esr_bars(report: &VideoStatsReport) -> Panel {
    let zone_count = report.zone_esr.len();
    Panel::HorizontalBars(HorizontalBarConfig {
        title: "ESR by zone".to_string(),
        x_range: RANGE_PERCENT.0..RANGE_PERCENT.1,
        categories: (1..=zone_count).rev().map(|zone| zone.to_string()).collect(),
        values: report.zone_esr.to_vec(),
        color: COLOR_CADET_BLUE,
        x_label: "ESR (%)".to_string(),
        y_label: "Zone".to_string(),
    })
}

fn frames_by_rssi_bars(report: &VideoStatsReport) -> Panel {
    let frames = &report.frames_by_rssi;
    let mut series = stacked_share_bars(
        &report.bins,
        &[
            (&frames.missed, "Missed", COLOR_FIREBRICK),
            (&frames.discarded, "Discarded", COLOR_SALMON),
            (&frames.output_errored, "Output (with errors)", COLOR_CADET_BLUE),
            (&frames.output_no_error, "Output (no errors)", COLOR_LIGHT_GREEN),
        ],
    );
    series.push(share_bars(&report.bins, &frames.total_share, 100.0, "Share of all frames"));
    Panel::Bars(BarChartConfig {
        title: "Frames by RSSI".to_string(),
        x_range: rssi_x_range(&report.bins, &frames.total_share),
        y_range: RANGE_PERCENT.0..RANGE_PERCENT.1,
        series,
        x_label: RSSI_LABEL.to_string(),
        y_label: "(%)".to_string(),
        categories: None,
    })
}

fn timing_bars(bins: &RssiBins, timing: &BinnedTiming, offset: f64, label: &str, color: RGBColor) -> BarSeries {
    BarSeries {
        bars: bins
            .rssi_values()
            .into_iter()
            .zip(timing.mean.iter().zip(timing.std.iter()))
            .map(|(rssi, (&mean, &std))| Bar {
                x: rssi as f64 + offset,
                width: BAR_WIDTH_TIMINGS,
                bottom: 0.0,
                top: mean,
                error: Some(std),
            })
            .collect(),
        label: label.to_string(),
        color,
    }
}

/// Highest bar top including its error bar, never below 1 ms.
fn timing_axis_max<'a>(tops: impl Iterator<Item = (&'a f64, &'a f64)>) -> f64 {
    tops.map(|(mean, std)| mean + std).fold(1.0, f64::max) * 1.2
}

fn timings_by_rssi_bars(report: &VideoStatsReport) -> Panel {
    let timings = &report.timings_by_rssi;
    let y_max = [&timings.timestamp_delta, &timings.timing_error, &timings.estimated_latency]
        .iter()
        .map(|t| timing_axis_max(t.mean.iter().zip(t.std.iter())))
        .fold(1.0, f64::max);
    let bins = &report.bins;
    // The output share is scaled so that the full axis height stands for 100%.
    let series = vec![
        timing_bars(bins, &timings.timestamp_delta, -1.5 * BAR_WIDTH_TIMINGS, "Time delta", COLOR_MEDIUM_SEA_GREEN),
        timing_bars(bins, &timings.timing_error, -0.5 * BAR_WIDTH_TIMINGS, "Output error", COLOR_FIREBRICK),
        timing_bars(bins, &timings.estimated_latency, 0.5 * BAR_WIDTH_TIMINGS, "Est. latency", COLOR_CADET_BLUE),
        BarSeries {
            bars: bins
                .rssi_values()
                .into_iter()
                .zip(timings.output_share.iter())
                .map(|(rssi, &share)| Bar {
                    x: rssi as f64 + 1.5 * BAR_WIDTH_TIMINGS,
                    width: BAR_WIDTH_TIMINGS,
                    bottom: 0.0,
                    top: share * y_max,
                    error: None,
                })
                .collect(),
            label: "Output frames (% of axis)".to_string(),
            color: *COLOR_SHARE_BAR,
        },
    ];
    Panel::Bars(BarChartConfig {
        title: "Timings by RSSI".to_string(),
        x_range: rssi_x_range(bins, &timings.output_frames),
        y_range: 0.0..y_max,
        series,
        x_label: RSSI_LABEL.to_string(),
        y_label: "(ms)".to_string(),
        categories: None,
    })
}

fn overall_timing_bars(report: &VideoStatsReport) -> Panel {
    let timings = &report.overall_timings;
    let entries: [(MeanStd, &str, RGBColor); 3] = [
        (timings.timestamp_delta, "Time delta", COLOR_MEDIUM_SEA_GREEN),
        (timings.timing_error, "Output error", COLOR_FIREBRICK),
        (timings.estimated_latency, "Est. latency", COLOR_CADET_BLUE),
    ];
    let y_max = timing_axis_max(entries.iter().map(|(stats, _, _)| (&stats.mean, &stats.std)));
    let series = entries
        .iter()
        .enumerate()
        .map(|(i, (stats, _, color))| BarSeries {
            bars: vec![Bar {
                x: (i + 1) as f64,
                width: BAR_WIDTH_STACKED,
                bottom: 0.0,
                top: stats.mean,
                error: Some(stats.std),
            }],
            label: String::new(),
            color: *color,
        })
        .collect();
    Panel::Bars(BarChartConfig {
        title: "Overall timings".to_string(),
        x_range: 0.5..entries.len() as f64 + 0.5,
        y_range: 0.0..y_max,
        series,
        x_label: String::new(),
        y_label: "(ms)".to_string(),
        categories: Some(entries.iter().map(|(_, label, _)| label.to_string()).collect()),
    })
}

/// Pie of final macroblock counts; `errors_only` keeps the non-valid statuses.
fn macroblock_pie(report: &VideoStatsReport, errors_only: bool) -> Panel {
    // Valid statuses first, unknown last.
    let order = [
        MacroblockStatus::ValidI,
        MacroblockStatus::ValidP,
        MacroblockStatus::MissingConcealed,
        MacroblockStatus::Missing,
        MacroblockStatus::ErrorPropagation,
        MacroblockStatus::Unknown,
    ];
    let statuses: Vec<MacroblockStatus> = order
        .into_iter()
        .filter(|status| !errors_only || status.is_error())
        .collect();
    Panel::Pie(PieConfig {
        title: if errors_only {
            "Overall error macroblocks".to_string()
        } else {
            "Overall macroblocks".to_string()
        },
        values: statuses
            .iter()
            .map(|status| report.overall_macroblocks[status.index()])
            .collect(),
        labels: statuses.iter().map(|status| status.label().to_string()).collect(),
        colors: statuses.iter().map(|&status| macroblock_color(status)).collect(),
    })
}

fn macroblocks_by_rssi_bars(report: &VideoStatsReport) -> Panel {
    let by_rssi = &report.macroblocks_by_rssi;
    let stack_order = [
        MacroblockStatus::Unknown,
        MacroblockStatus::Missing,
        MacroblockStatus::MissingConcealed,
        MacroblockStatus::ErrorPropagation,
        MacroblockStatus::ValidP,
        MacroblockStatus::ValidI,
    ];
    let layers: Vec<(&Array1<f64>, &str, RGBColor)> = stack_order
        .iter()
        .map(|&status| {
            (
                &by_rssi.status_share[status.index()],
                status.label(),
                macroblock_color(status),
            )
        })
        .collect();
    let mut series = stacked_share_bars(&report.bins, &layers);
    series.push(share_bars(
        &report.bins,
        &by_rssi.total_share,
        100.0,
        "Share of all macroblocks",
    ));
    Panel::Bars(BarChartConfig {
        title: "Macroblocks by RSSI".to_string(),
        x_range: rssi_x_range(&report.bins, &by_rssi.total_share),
        y_range: RANGE_PERCENT.0..RANGE_PERCENT.1,
        series,
        x_label: RSSI_LABEL.to_string(),
        y_label: "(%)".to_string(),
        categories: None,
    })
}

/// Panels of the video-stats view: 2x4 in full mode, 2x2 in simple mode.
pub fn video_stats_panels(report: &VideoStatsReport, simple: bool) -> Vec<Option<Panel>> {
    if simple {
        return vec![
            Some(overall_frames_pie(report)),
            Some(zone_esr_bars(report)),
            Some(macroblock_pie(report, false)),
            Some(macroblock_pie(report, true)),
        ];
    }
    vec![
        Some(overall_frames_pie(report)),
        Some(zone_esr_bars(report)),
        Some(frames_by_rssi_bars(report)),
        Some(timings_by_rssi_bars(report)),
        Some(overall_timing_bars(report)),
        Some(macroblock_pie(report, false)),
        Some(macroblock_pie(report, true)),
        Some(macroblocks_by_rssi_bars(report)),
    ]
}

/// Generates the video-stats dashboard.
pub fn plot_video_stats(report: &VideoStatsReport, simple: bool, output_file: &str) -> PlotResult {
    let grid = if simple { (2, 2) } else { (2, 4) };
    let title = format!("Video stats ({})", report.title);
    draw_panel_grid(output_file, &title, grid, &video_stats_panels(report, simple))
}


// src/plot_functions/plot_video_stats.rs
