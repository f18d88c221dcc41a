// src/constants.rs

use plotters::style::colors::full_palette::{BLUE, GREEN, GREY_700, RED};
use plotters::style::colors::BLACK;
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Font sizes.
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 16;
pub const FONT_SIZE_AXIS_LABEL: i32 = 12;
pub const FONT_SIZE_LEGEND: i32 = 12;
pub const FONT_SIZE_MESSAGE: i32 = 20;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 1;
pub const LINE_WIDTH_LEGEND: u32 = 2;

// Unit conversions.
pub const US_PER_MS: f64 = 1_000.0;
pub const US_PER_S: f64 = 1_000_000.0;
pub const US2_PER_MS2: f64 = 1_000_000.0;
pub const BYTES_PER_MBIT: f64 = 1_000_000.0 / 8.0;

// Y ranges only ever grow past the data maximum by this factor.
pub const RANGE_GROWTH_FACTOR: f64 = 1.2;

// --- Default axis ranges (min, max) ---
pub const RANGE_FRAME_TIME_S: (f64, f64) = (0.0, 10.0);
pub const RANGE_FRAME_SIZE: (f64, f64) = (0.0, 1000.0);
pub const RANGE_PSNR_DB: (f64, f64) = (10.0, 48.0);
pub const RANGE_DISTANCES_M: (f64, f64) = (0.0, 100.0);
pub const RANGE_SPEEDS_MS: (f64, f64) = (-15.0, 15.0);
pub const RANGE_ANGLES_RAD: (f64, f64) = (-3.2, 3.2);
pub const RANGE_MCS_RATE_MBPS: (f64, f64) = (0.0, 80.0);
pub const RANGE_RSSI_DBM: (f64, f64) = (-100.0, 0.0);
pub const RANGE_TARGET_BITRATE_MBPS: (f64, f64) = (0.0, 1.0);
pub const RANGE_STREAMING_BITRATE_MBPS: (f64, f64) = (0.0, 1.0);
pub const RANGE_PACKET_RATE: (f64, f64) = (0.0, 10.0);
pub const RANGE_WIFI_ERRORS: (f64, f64) = (0.0, 2.0);
pub const RANGE_LATENCY_MS: (f64, f64) = (0.0, 200.0);
pub const RANGE_FRAME_TIME_DELTA_MS: (f64, f64) = (0.0, 0.02);
pub const RANGE_FRAMES_MISSED: (f64, f64) = (0.0, 30.0);
pub const RANGE_COMMANDS_MS: (f64, f64) = (0.0, 50.0);
pub const RANGE_PACKET_TIME_MS: (f64, f64) = (0.0, 100.0);
pub const RANGE_PACKET_SIZE_BYTES: (f64, f64) = (0.0, 1500.0);
pub const RANGE_MISSING_PACKETS: (f64, f64) = (0.0, 10.0);
pub const RANGE_LINK_MISSING_PACKETS: (f64, f64) = (0.0, 100.0);
pub const RANGE_JITTER_MS: (f64, f64) = (-10.0, 10.0);
pub const RANGE_PERCENT: (f64, f64) = (0.0, 100.0);

// --- Plot Color Assignments ---
// Time series
pub const COLOR_LINE_PRIMARY: &RGBColor = &BLACK;
pub const COLOR_LINE_SECONDARY: &RGBColor = &RED;
pub const COLOR_LINE_TERTIARY: &RGBColor = &GREEN;
pub const COLOR_LINE_QUATERNARY: &RGBColor = &BLUE;

// Video stats categories
pub const COLOR_LIGHT_GREEN: RGBColor = RGBColor(144, 238, 144);
pub const COLOR_CADET_BLUE: RGBColor = RGBColor(95, 158, 160);
pub const COLOR_SALMON: RGBColor = RGBColor(250, 128, 114);
pub const COLOR_FIREBRICK: RGBColor = RGBColor(178, 34, 34);
pub const COLOR_MEDIUM_SEA_GREEN: RGBColor = RGBColor(60, 179, 113);
pub const COLOR_SHARE_BAR: &RGBColor = &GREY_700;
pub const COLOR_UNKNOWN_MACROBLOCK: RGBColor = RGBColor(77, 77, 77);

// Bar chart layout, as a fraction of one RSSI step.
pub const BAR_WIDTH_STACKED: f64 = 0.4;
pub const BAR_WIDTH_TIMINGS: f64 = 0.2;

// src/constants.rs
