// src/plot_functions/plot_frame_info.rs

use crate::constants::{
    COLOR_LINE_PRIMARY, COLOR_LINE_QUATERNARY, COLOR_LINE_SECONDARY, COLOR_LINE_TERTIARY,
    RANGE_ANGLES_RAD, RANGE_COMMANDS_MS, RANGE_DISTANCES_M, RANGE_FRAMES_MISSED,
    RANGE_FRAME_SIZE, RANGE_FRAME_TIME_DELTA_MS, RANGE_FRAME_TIME_S, RANGE_LATENCY_MS,
    RANGE_MCS_RATE_MBPS, RANGE_PACKET_RATE, RANGE_PSNR_DB, RANGE_RSSI_DBM, RANGE_SPEEDS_MS,
    RANGE_STREAMING_BITRATE_MBPS, RANGE_TARGET_BITRATE_MBPS, RANGE_WIFI_ERRORS,
};
use crate::data_analysis::frame_metrics::FrameMetrics;
use crate::data_input::frame_info::FrameInfoLog;
use crate::data_input::log_reader::IndexedLog;
use crate::plot_framework::{draw_panel_grid, grow_x_range, Panel};
use crate::plot_functions::{lines_panel, series};
use crate::types::PlotResult;

const TIME_LABEL: &str = "Time (s)";

/// Builds the 4x4 frame-info panel grid; the third cell of the second row
/// stays blank.
pub fn frame_info_panels(metrics: &FrameMetrics) -> Vec<Option<Panel>> {
    let x = || grow_x_range(RANGE_FRAME_TIME_S, metrics.frame_time_max);

    let distances = lines_panel(
        "Distance and altitude (m)",
        x(),
        RANGE_DISTANCES_M,
        vec![
            series(metrics.distance_from_home.clone(), "Distance from home", COLOR_LINE_PRIMARY),
            series(metrics.relative_height.clone(), "Relative height", COLOR_LINE_SECONDARY),
        ],
        TIME_LABEL,
        "(m)",
    );
    let rssi = lines_panel(
        "Controller RSSI (dBm)",
        x(),
        RANGE_RSSI_DBM,
        vec![series(metrics.wifi_rssi.clone(), "", COLOR_LINE_PRIMARY)],
        TIME_LABEL,
        "(dBm)",
    );
    let psnr = lines_panel(
        "Video frame PSNR(Y) (dB)",
        x(),
        RANGE_PSNR_DB,
        vec![series(metrics.frame_psnr_y.clone(), "", COLOR_LINE_PRIMARY)],
        TIME_LABEL,
        "(dB)",
    );
    let frame_size = lines_panel(
        "Video frame size (bytes)",
        x(),
        RANGE_FRAME_SIZE,
        vec![series(metrics.frame_size.clone(), "", COLOR_LINE_PRIMARY)],
        TIME_LABEL,
        "(bytes)",
    );
    let angles = lines_panel(
        "Drone angles (rad)",
        x(),
        RANGE_ANGLES_RAD,
        vec![
            series(metrics.yaw.clone(), "Yaw", COLOR_LINE_TERTIARY),
            series(metrics.pitch.clone(), "Pitch", COLOR_LINE_SECONDARY),
            series(metrics.roll.clone(), "Roll", COLOR_LINE_QUATERNARY),
        ],
        TIME_LABEL,
        "(rad)",
    );
    let mcs_rate = lines_panel(
        "Wifi MCS rate (Mbit/s)",
        x(),
        RANGE_MCS_RATE_MBPS,
        vec![series(metrics.wifi_mcs_rate.clone(), "", COLOR_LINE_PRIMARY)],
        TIME_LABEL,
        "(Mbit/s)",
    );
    let time_deltas = lines_panel(
        "Video frame time deltas (ms)",
        x(),
        RANGE_FRAME_TIME_DELTA_MS,
        vec![
            series(metrics.acquisition_time_delta.clone(), "Acquisition", COLOR_LINE_PRIMARY),
            series(metrics.output_time_delta.clone(), "Output", COLOR_LINE_SECONDARY),
        ],
        TIME_LABEL,
        "(ms)",
    );
    let speeds = lines_panel(
        "Speeds (m/s)",
        x(),
        RANGE_SPEEDS_MS,
        vec![
            series(metrics.x_speed.clone(), "X", COLOR_LINE_QUATERNARY),
            series(metrics.y_speed.clone(), "Y", COLOR_LINE_TERTIARY),
            series(metrics.z_speed.clone(), "Z", COLOR_LINE_SECONDARY),
        ],
        TIME_LABEL,
        "(m/s)",
    );
    let target_bitrate = lines_panel(
        "Video target bitrate (Mbit/s)",
        x(),
        RANGE_TARGET_BITRATE_MBPS,
        vec![series(metrics.target_bitrate.clone(), "", COLOR_LINE_TERTIARY)],
        TIME_LABEL,
        "(Mbit/s)",
    );
    let streaming_bitrates = lines_panel(
        "Streaming sent/dropped bitrates (Mbit/s)",
        x(),
        RANGE_STREAMING_BITRATE_MBPS,
        vec![
            series(metrics.sent_bitrate.clone(), "Sent", COLOR_LINE_PRIMARY),
            series(metrics.dropped_bitrate.clone(), "Dropped", COLOR_LINE_SECONDARY),
        ],
        TIME_LABEL,
        "(Mbit/s)",
    );
    let latency = lines_panel(
        "Video frame latency (ms)",
        x(),
        RANGE_LATENCY_MS,
        vec![
            series(metrics.first_nalu_input_latency.clone(), "First NALU input", COLOR_LINE_QUATERNARY),
            series(metrics.au_output_latency.clone(), "AU output", COLOR_LINE_PRIMARY),
        ],
        TIME_LABEL,
        "(ms)",
    );
    let commands = lines_panel(
        "Piloting commands time delta (ms)",
        x(),
        RANGE_COMMANDS_MS,
        vec![
            series(metrics.last_command_time_delta.clone(), "Last command", COLOR_LINE_PRIMARY),
            series(metrics.commands_max_time_delta.clone(), "Max on last second", COLOR_LINE_SECONDARY),
        ],
        TIME_LABEL,
        "(ms)",
    );
    let wifi_errors = lines_panel(
        "Wifi error rate (#/s)",
        x(),
        RANGE_WIFI_ERRORS,
        vec![series(metrics.wifi_tx_fail_events.clone(), "", COLOR_LINE_SECONDARY)],
        TIME_LABEL,
        "(#/s)",
    );
    let packet_rates = lines_panel(
        "Streaming packets sent / NALU dropped (#/s)",
        x(),
        RANGE_PACKET_RATE,
        vec![
            series(metrics.packets_sent.clone(), "Packets sent", COLOR_LINE_PRIMARY),
            series(metrics.nalu_dropped.clone(), "NALU dropped", COLOR_LINE_SECONDARY),
        ],
        TIME_LABEL,
        "(#/s)",
    );
    let frames_missed = lines_panel(
        "Video frames missed",
        x(),
        RANGE_FRAMES_MISSED,
        vec![series(metrics.estimated_lost_frames.clone(), "", COLOR_LINE_SECONDARY)],
        TIME_LABEL,
        "(frames)",
    );

    vec![
        Some(distances),
        Some(rssi),
        Some(psnr),
        Some(frame_size),
        Some(angles),
        Some(mcs_rate),
        None,
        Some(time_deltas),
        Some(speeds),
        Some(target_bitrate),
        Some(streaming_bitrates),
        Some(latency),
        Some(commands),
        Some(wifi_errors),
        Some(packet_rates),
        Some(frames_missed),
    ]
}

/// Generates the frame-info dashboard.
pub fn plot_frame_info(log: &IndexedLog<FrameInfoLog>, output_file: &str) -> PlotResult {
    if log.data().ignored_lines() > 0 {
        log::warn!(
            "{} frame info lines ignored for non-increasing timestamps",
            log.data().ignored_lines()
        );
    }
    let metrics = FrameMetrics::from_log(log.data());
    let title = format!("Frame info ({})", log.title());
    draw_panel_grid(output_file, &title, (4, 4), &frame_info_panels(&metrics))
}


// src/plot_functions/plot_frame_info.rs
