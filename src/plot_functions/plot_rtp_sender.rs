// src/plot_functions/plot_rtp_sender.rs

use crate::constants::{
    COLOR_LINE_PRIMARY, COLOR_LINE_QUATERNARY, COLOR_LINE_SECONDARY, RANGE_FRAME_TIME_S,
    RANGE_PACKET_SIZE_BYTES, RANGE_PACKET_TIME_MS,
};
use crate::data_input::log_reader::IndexedLog;
use crate::data_input::rtp_sender::{RtpSenderLog, RtpSenderRecord};
use crate::plot_framework::{draw_panel_grid, grow_x_range, Panel};
use crate::plot_functions::{lines_panel, series};
use crate::types::{PlotResult, TimeSeries};

const TIME_LABEL: &str = "Time (s)";

fn packets_where(
    log: &RtpSenderLog,
    dropped: bool,
    metric: impl Fn(&RtpSenderRecord) -> f64,
) -> TimeSeries {
    log.records()
        .iter()
        .filter(|r| r.is_dropped() == dropped)
        .map(|r| (r.packet_time_s, metric(r)))
        .collect()
}

/// Sent and dropped packet timings and sizes, in a 2x2 grid.
pub fn rtp_sender_panels(log: &RtpSenderLog) -> Vec<Option<Panel>> {
    let time_max = log.records().last().map_or(0.0, |r| r.packet_time_s);
    let x = || grow_x_range(RANGE_FRAME_TIME_S, time_max);

    let sent_time = lines_panel(
        "Packet sent time (ms)",
        x(),
        RANGE_PACKET_TIME_MS,
        vec![
            series(
                packets_where(log, false, |r| r.acq_to_network_send_ms),
                "Acquisition to network",
                COLOR_LINE_PRIMARY,
            ),
            series(
                packets_where(log, false, |r| r.acq_to_network_input_ms()),
                "Acquisition to network input",
                COLOR_LINE_QUATERNARY,
            ),
            series(
                packets_where(log, false, |r| r.network_send_ms),
                "Network",
                COLOR_LINE_SECONDARY,
            ),
        ],
        TIME_LABEL,
        "(ms)",
    );
    let dropped_time = lines_panel(
        "Packet dropped time (ms)",
        x(),
        RANGE_PACKET_TIME_MS,
        vec![
            series(
                packets_where(log, true, |r| r.acq_to_network_drop_ms),
                "Acquisition to network",
                COLOR_LINE_PRIMARY,
            ),
            series(
                packets_where(log, true, |r| r.network_drop_ms),
                "Network",
                COLOR_LINE_SECONDARY,
            ),
        ],
        TIME_LABEL,
        "(ms)",
    );
    let sent_size = lines_panel(
        "Packet sent size (bytes)",
        x(),
        RANGE_PACKET_SIZE_BYTES,
        vec![series(
            packets_where(log, false, |r| r.bytes_sent as f64),
            "",
            COLOR_LINE_PRIMARY,
        )],
        TIME_LABEL,
        "(bytes)",
    );
    let dropped_size = lines_panel(
        "Packet dropped size (bytes)",
        x(),
        RANGE_PACKET_SIZE_BYTES,
        vec![series(
            packets_where(log, true, |r| r.bytes_dropped as f64),
            "",
            COLOR_LINE_SECONDARY,
        )],
        TIME_LABEL,
        "(bytes)",
    );

    vec![
        Some(sent_time),
        Some(dropped_time),
        Some(sent_size),
        Some(dropped_size),
    ]
}

/// Generates the RTP sender dashboard.
pub fn plot_rtp_sender(log: &IndexedLog<RtpSenderLog>, output_file: &str) -> PlotResult {
    log::info!(
        "{} of {} packets dropped",
        log.data().dropped_count(),
        log.data().records().len()
    );
    let title = format!("RTP sender ({})", log.title());
    draw_panel_grid(output_file, &title, (2, 2), &rtp_sender_panels(log.data()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sender_log_gives_four_placeholder_panels() {
        let panels = rtp_sender_panels(&RtpSenderLog::default());
        assert_eq!(panels.len(), 4);
        for panel in panels.iter().flatten() {
            assert_eq!(panel.unavailable_reason(), Some("No data points"));
        }
    }
}

// src/plot_functions/plot_rtp_sender.rs
