// src/plot_functions/plot_rtp_reader.rs

use crate::constants::{
    COLOR_LINE_PRIMARY, COLOR_LINE_SECONDARY, RANGE_FRAME_TIME_S, RANGE_MISSING_PACKETS,
    RANGE_PACKET_SIZE_BYTES, RANGE_PACKET_TIME_MS,
};
use crate::data_analysis::frame_metrics::time_series;
use crate::data_input::log_reader::IndexedLog;
use crate::data_input::rtp_reader::RtpReaderLog;
use crate::plot_framework::{draw_panel_grid, grow_x_range, Panel};
use crate::plot_functions::{lines_panel, series};
use crate::types::PlotResult;

const TIME_LABEL: &str = "Time (s)";

/// Network receive time, packet size and missing packets, stacked vertically.
pub fn rtp_reader_panels(log: &RtpReaderLog) -> Vec<Option<Panel>> {
    let times = log.column(|r| r.packet_time_s);
    let time_max = times.last().copied().unwrap_or(0.0);
    let x = || grow_x_range(RANGE_FRAME_TIME_S, time_max);

    let network_time = lines_panel(
        "Packet network time (ms)",
        x(),
        RANGE_PACKET_TIME_MS,
        vec![series(
            time_series(&times, &log.column(|r| r.network_recv_ms)),
            "",
            COLOR_LINE_PRIMARY,
        )],
        TIME_LABEL,
        "(ms)",
    );
    let size = lines_panel(
        "Packet size (bytes)",
        x(),
        RANGE_PACKET_SIZE_BYTES,
        vec![series(
            time_series(&times, &log.column(|r| r.bytes as f64)),
            "",
            COLOR_LINE_PRIMARY,
        )],
        TIME_LABEL,
        "(bytes)",
    );
    let missing = lines_panel(
        "Missing packets",
        x(),
        RANGE_MISSING_PACKETS,
        vec![series(
            time_series(&times, &log.column(|r| r.missing_before as f64)),
            "",
            COLOR_LINE_SECONDARY,
        )],
        TIME_LABEL,
        "(packets)",
    );

    vec![Some(network_time), Some(size), Some(missing)]
}

/// Generates the RTP reader dashboard.
pub fn plot_rtp_reader(log: &IndexedLog<RtpReaderLog>, output_file: &str) -> PlotResult {
    log::info!("{} packets missing", log.data().missing_count());
    let title = format!("RTP reader ({})", log.title());
    draw_panel_grid(output_file, &title, (3, 1), &rtp_reader_panels(log.data()))
}

// src/plot_functions/plot_rtp_reader.rs
