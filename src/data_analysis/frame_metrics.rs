// src/data_analysis/frame_metrics.rs

use crate::constants::{BYTES_PER_MBIT, US_PER_MS};
use crate::data_input::frame_info::FrameInfoLog;
use crate::types::TimeSeries;

/// Pairs each time with its value.
pub fn time_series(times: &[f64], values: &[f64]) -> TimeSeries {
    times.iter().copied().zip(values.iter().copied()).collect()
}

/// Consecutive differences of `values` divided by `divisor`, plotted at the
/// later time. One point shorter than the input.
pub fn delta_series(times: &[f64], values: &[f64], divisor: f64) -> TimeSeries {
    times
        .iter()
        .skip(1)
        .zip(values.windows(2))
        .map(|(&time, pair)| (time, (pair[1] - pair[0]) / divisor))
        .collect()
}

/// Values describing the previous frame, moved to the time they were reported
/// for.
pub fn lagged_series(times: &[f64], values: &[f64]) -> TimeSeries {
    times
        .iter()
        .skip(1)
        .zip(values.iter())
        .map(|(&time, &value)| (time, value))
        .collect()
}

/// Every frame-info curve, ready to be drawn against frame time (s).
#[derive(Debug, Default, Clone)]
pub struct FrameMetrics {
    pub frame_time_max: f64,
    pub distance_from_home: TimeSeries,
    pub relative_height: TimeSeries,
    pub wifi_rssi: TimeSeries,
    pub frame_psnr_y: TimeSeries,
    pub frame_size: TimeSeries,
    pub yaw: TimeSeries,
    pub pitch: TimeSeries,
    pub roll: TimeSeries,
    pub wifi_mcs_rate: TimeSeries,
    pub acquisition_time_delta: TimeSeries,
    pub output_time_delta: TimeSeries,
    pub x_speed: TimeSeries,
    pub y_speed: TimeSeries,
    pub z_speed: TimeSeries,
    pub target_bitrate: TimeSeries,
    pub sent_bitrate: TimeSeries,
    pub dropped_bitrate: TimeSeries,
    pub first_nalu_input_latency: TimeSeries,
    pub au_output_latency: TimeSeries,
    pub last_command_time_delta: TimeSeries,
    pub commands_max_time_delta: TimeSeries,
    pub wifi_tx_fail_events: TimeSeries,
    pub packets_sent: TimeSeries,
    pub nalu_dropped: TimeSeries,
    pub estimated_lost_frames: TimeSeries,
}

impl FrameMetrics {
    pub fn from_log(log: &FrameInfoLog) -> Self {
        let times = log.frame_times();
        let line = |values: Vec<f64>| time_series(&times, &values);
        let acquisition_shifted = log.column(|r| r.acquisition_ts_shifted);
        let latency = |stamps: Vec<i64>| {
            let values: Vec<f64> = stamps
                .iter()
                .zip(acquisition_shifted.iter())
                .map(|(&stamp, &acquired)| (stamp - acquired) as f64 / US_PER_MS)
                .collect();
            time_series(&times, &values)
        };

        FrameMetrics {
            frame_time_max: times.iter().copied().fold(0.0, f64::max),
            distance_from_home: line(log.column(|r| r.flight.distance_from_home)),
            relative_height: line(log.column(|r| r.flight.relative_height)),
            wifi_rssi: line(log.column(|r| r.wifi.rssi as f64)),
            frame_psnr_y: lagged_series(&times, &log.column(|r| r.encoder.streaming_prev_frame_psnr_y)),
            frame_size: lagged_series(
                &times,
                &log.column(|r| r.encoder.streaming_prev_frame_size as f64),
            ),
            yaw: line(log.column(|r| r.flight.yaw)),
            pitch: line(log.column(|r| r.flight.pitch)),
            roll: line(log.column(|r| r.flight.roll)),
            wifi_mcs_rate: line(log.column(|r| r.wifi.mcs_rate_mbps)),
            acquisition_time_delta: delta_series(
                &times,
                &log.column(|r| r.acquisition_ts as f64),
                US_PER_MS,
            ),
            output_time_delta: delta_series(
                &times,
                &log.column(|r| r.au_output_time as f64),
                US_PER_MS,
            ),
            x_speed: line(log.column(|r| r.flight.x_speed)),
            y_speed: line(log.column(|r| r.flight.y_speed)),
            z_speed: line(log.column(|r| r.flight.z_speed)),
            target_bitrate: line(log.column(|r| r.encoder.streaming_target_bitrate_mbps)),
            sent_bitrate: line(log.column(|r| r.streaming.bytes_sent as f64 / BYTES_PER_MBIT)),
            dropped_bitrate: line(log.column(|r| r.streaming.bytes_dropped as f64 / BYTES_PER_MBIT)),
            first_nalu_input_latency: latency(log.column(|r| r.first_nalu_input_time)),
            au_output_latency: latency(log.column(|r| r.au_output_time)),
            last_command_time_delta: line(
                log.column(|r| r.last_command_time_delta as f64 / US_PER_MS),
            ),
            commands_max_time_delta: line(
                log.column(|r| r.commands_max_time_delta_on_last_sec as f64 / US_PER_MS),
            ),
            wifi_tx_fail_events: delta_series(
                &times,
                &log.column(|r| r.wifi.tx_fail_event_count as f64),
                1.0,
            ),
            packets_sent: line(log.column(|r| r.streaming.packets_sent as f64)),
            nalu_dropped: line(log.column(|r| r.streaming.nalu_dropped as f64)),
            estimated_lost_frames: line(log.column(|r| r.estimated_lost_frames as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::log_reader::{aggregate, resolve_columns};
    use std::path::Path;

    #[test]
    fn test_delta_series_uses_later_time() {
        let times = [0.0, 1.0, 2.0];
        let values = [10.0, 15.0, 25.0];
        assert_eq!(delta_series(&times, &values, 0.5), vec![(1.0, 10.0), (2.0, 20.0)]);
    }

    #[test]
    fn test_lagged_series_shifts_values_forward() {
        let times = [0.0, 1.0, 2.0];
        let values = [7.0, 8.0, 9.0];
        assert_eq!(lagged_series(&times, &values), vec![(1.0, 7.0), (2.0, 8.0)]);
    }

    #[test]
    fn test_short_inputs_give_empty_derived_series() {
        assert!(delta_series(&[0.0], &[1.0], 1.0).is_empty());
        assert!(lagged_series(&[], &[]).is_empty());
    }

    #[test]
    fn test_metrics_from_log() {
        let input = "acquisitionTs acquisitionTsShifted beaverAuOutputTime streamingSrcBytesSent\n\
                     1000000 1000000 1040000 125000\n\
                     1033000 1033000 1080000 250000\n";
        let path = Path::new("frameinfo.log");
        let columns = resolve_columns::<FrameInfoLog, _>(input.as_bytes(), path).unwrap();
        let log: FrameInfoLog = aggregate(input.as_bytes(), &columns, path).unwrap();
        let metrics = FrameMetrics::from_log(&log);

        assert!((metrics.frame_time_max - 0.033).abs() < 1e-9);
        assert_eq!(metrics.au_output_latency[0].1, 40.0);
        assert_eq!(metrics.au_output_latency[1].1, 47.0);
        assert_eq!(metrics.sent_bitrate[0].1, 1.0);
        assert_eq!(metrics.acquisition_time_delta.len(), 1);
        assert_eq!(metrics.acquisition_time_delta[0].1, 33.0);
        assert_eq!(metrics.output_time_delta[0].1, 40.0);
    }
}

// src/data_analysis/frame_metrics.rs
