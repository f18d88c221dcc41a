// src/plot_functions/plot_pcmd.rs

use crate::constants::{
    COLOR_LINE_PRIMARY, COLOR_LINE_SECONDARY, RANGE_COMMANDS_MS, RANGE_MISSING_PACKETS,
};
use crate::data_analysis::frame_metrics::time_series;
use crate::data_input::log_reader::IndexedLog;
use crate::data_input::pcmd_monitor::PcmdMonitorLog;
use crate::plot_framework::{draw_panel_grid, grow_x_range, Panel};
use crate::plot_functions::{lines_panel, series};
use crate::types::PlotResult;

const INDEX_LABEL: &str = "Command index";

pub fn pcmd_panels(log: &PcmdMonitorLog) -> Vec<Option<Panel>> {
    let indices = log.column(|r| r.pcmd_index as f64);
    let index_max = indices.last().copied().unwrap_or(0.0);
    let x = || grow_x_range((0.0, 1.0), index_max);

    let delays = lines_panel(
        "Piloting command delays (ms)",
        x(),
        RANGE_COMMANDS_MS,
        vec![
            series(
                time_series(&indices, &log.column(|r| r.creation_to_reception_ms())),
                "Creation to reception",
                COLOR_LINE_PRIMARY,
            ),
            series(
                time_series(&indices, &log.column(|r| r.reception_to_use_ms())),
                "Reception to use",
                COLOR_LINE_SECONDARY,
            ),
        ],
        INDEX_LABEL,
        "(ms)",
    );
    let missing = lines_panel(
        "Missing piloting commands",
        x(),
        RANGE_MISSING_PACKETS,
        vec![series(
            time_series(&indices, &log.column(|r| r.missing_before as f64)),
            "",
            COLOR_LINE_SECONDARY,
        )],
        INDEX_LABEL,
        "(commands)",
    );

    vec![Some(delays), Some(missing)]
}

/// Generates the piloting-command dashboard.
pub fn plot_pcmd(log: &IndexedLog<PcmdMonitorLog>, output_file: &str) -> PlotResult {
    log::info!("{} piloting commands missing", log.data().missing_count());
    let title = format!("Piloting commands ({})", log.title());
    draw_panel_grid(output_file, &title, (2, 1), &pcmd_panels(log.data()))
}

// src/plot_functions/plot_pcmd.rs
