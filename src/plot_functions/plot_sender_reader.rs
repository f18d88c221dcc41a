// src/plot_functions/plot_sender_reader.rs

use crate::constants::{
    COLOR_LINE_PRIMARY, COLOR_LINE_QUATERNARY, COLOR_LINE_SECONDARY, COLOR_LINE_TERTIARY,
    RANGE_JITTER_MS, RANGE_LINK_MISSING_PACKETS, RANGE_PACKET_TIME_MS,
};
use crate::data_analysis::link_summary::LinkSummary;
use crate::data_input::log_reader::IndexedLog;
use crate::data_input::rtp_reader::RtpReaderLog;
use crate::data_input::rtp_sender::RtpSenderLog;
use crate::plot_framework::{draw_panel_grid, grow_x_range, Panel};
use crate::plot_functions::{lines_panel, series, x_max};
use crate::types::PlotResult;

const INDEX_LABEL: &str = "Packet index";

/// Both ends of the link against the logical packet index.
pub fn sender_reader_panels(summary: &LinkSummary) -> Vec<Option<Panel>> {
    let index_max = x_max(&[&summary.sender_network, &summary.reader_network_recv]);
    let x = || grow_x_range((0.0, 1.0), index_max);

    let times = lines_panel(
        "Packet times (ms)",
        x(),
        RANGE_PACKET_TIME_MS,
        vec![
            series(summary.sender_acq_to_network.clone(), "Sender acquisition to network", COLOR_LINE_PRIMARY),
            series(summary.sender_acq_to_network_input.clone(), "Sender acquisition to network input", COLOR_LINE_QUATERNARY),
            series(summary.sender_network.clone(), "Sender network", COLOR_LINE_SECONDARY),
            series(summary.reader_network_recv.clone(), "Reader network", COLOR_LINE_TERTIARY),
        ],
        INDEX_LABEL,
        "(ms)",
    );
    let jitter = lines_panel(
        "Packet jitter (ms)",
        x(),
        RANGE_JITTER_MS,
        vec![
            series(summary.sender_jitter.clone(), "Sender", COLOR_LINE_PRIMARY),
            series(summary.reader_jitter.clone(), "Reader", COLOR_LINE_TERTIARY),
        ],
        INDEX_LABEL,
        "(ms)",
    );
    let missing = lines_panel(
        "Dropped / missing packets",
        x(),
        RANGE_LINK_MISSING_PACKETS,
        vec![
            series(summary.sender_dropped_before.clone(), "Sender dropped", COLOR_LINE_PRIMARY),
            series(summary.reader_missing_before.clone(), "Reader missing", COLOR_LINE_SECONDARY),
        ],
        INDEX_LABEL,
        "(packets)",
    );

    vec![Some(times), Some(jitter), Some(missing)]
}

/// Prints the link summary and generates the combined sender/reader dashboard.
pub fn plot_sender_reader(
    sender: &IndexedLog<RtpSenderLog>,
    reader: &IndexedLog<RtpReaderLog>,
    output_file: &str,
) -> PlotResult {
    let summary = LinkSummary::new(sender.data(), reader.data());
    println!("{summary}");
    let title = format!("RTP sender/reader ({} / {})", sender.title(), reader.title());
    draw_panel_grid(output_file, &title, (3, 1), &sender_reader_panels(&summary))
}

// src/plot_functions/plot_sender_reader.rs
