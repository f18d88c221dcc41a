// src/data_input/frame_info.rs

use crate::data_analysis::sequence::ReferenceTime;
use crate::data_input::log_line::LogLine;
use crate::data_input::log_reader::LogAggregator;
use crate::error::LogError;

const BPS_TO_MBPS: f64 = 1.0 / 1_000_000.0;

pub const FRAME_INFO_FIELDS: [&str; 60] = [
    "frameIndex",
    "acquisitionTs",
    "systemTs",
    "batteryPercentage",
    "gpsLatitude",
    "gpsLongitude",
    "gpsAltitude",
    "absoluteHeight",
    "relativeHeight",
    "xSpeed",
    "ySpeed",
    "zSpeed",
    "distanceFromHome",
    "yaw",
    "pitch",
    "roll",
    "cameraPan",
    "cameraTilt",
    "videoStreamingTargetBitrate",
    "videoStreamingDecimation",
    "videoStreamingGopLength",
    "videoStreamingPrevFrameType",
    "videoStreamingPrevFrameSize",
    "videoStreamingPrevFramePsnrY",
    "videoRecordingPrevFrameType",
    "videoRecordingPrevFrameSize",
    "videoRecordingPrevFramePsnrY",
    "wifiRssi",
    "wifiMcsRate",
    "wifiTxRate",
    "wifiRxRate",
    "wifiTxFailRate",
    "wifiTxErrorRate",
    "wifiTxFailEventCount",
    "preReprojTimestampDelta",
    "postReprojTimestampDelta",
    "postEeTimestampDelta",
    "postScalingTimestampDelta",
    "postStreamingEncodingTimestampDelta",
    "postRecordingEncodingTimestampDelta",
    "postNetworkInputTimestampDelta",
    "streamingSrcMonitorTimeInterval",
    "streamingSrcMeanAcqToNetworkTime",
    "streamingSrcAcqToNetworkJitter",
    "streamingSrcMeanNetworkTime",
    "streamingSrcNetworkJitter",
    "streamingSrcBytesSent",
    "streamingSrcMeanPacketSize",
    "streamingSrcPacketSizeStdDev",
    "streamingSrcPacketsSent",
    "streamingSrcBytesDropped",
    "streamingSrcNaluDropped",
    "commandsMaxTimeDeltaOnLastSec",
    "lastCommandTimeDelta",
    "lastCommandPsiValue",
    "frameSize",
    "estimatedLostFrames",
    "acquisitionTsShifted",
    "beaverFirstNaluInputTime",
    "beaverAuOutputTime",
];

/// Flight attitude and position sampled with a frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FlightState {
    pub battery_percentage: i64,
    pub gps_latitude: f64,
    pub gps_longitude: f64,
    pub gps_altitude: f64,
    pub absolute_height: f64,
    pub relative_height: f64,
    pub x_speed: f64, // m/s
    pub y_speed: f64,
    pub z_speed: f64,
    pub distance_from_home: f64,
    pub yaw: f64, // rad
    pub pitch: f64,
    pub roll: f64,
    pub camera_pan: f64,
    pub camera_tilt: f64,
}

/// Encoder state reported for the previous streamed / recorded frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EncoderState {
    pub streaming_target_bitrate_mbps: f64,
    pub streaming_decimation: i64,
    pub streaming_gop_length: i64,
    pub streaming_prev_frame_type: i64,
    pub streaming_prev_frame_size: i64,
    pub streaming_prev_frame_psnr_y: f64,
    pub recording_prev_frame_type: i64,
    pub recording_prev_frame_size: i64,
    pub recording_prev_frame_psnr_y: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WifiState {
    pub rssi: i64, // dBm
    pub mcs_rate_mbps: f64,
    pub tx_rate_mbps: f64,
    pub rx_rate_mbps: f64,
    pub tx_fail_rate: i64,
    pub tx_error_rate: i64,
    pub tx_fail_event_count: i64,
}

/// Per-stage timestamp deltas of the acquisition pipeline (us).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PipelineDeltas {
    pub pre_reproj: i64,
    pub post_reproj: i64,
    pub post_ee: i64,
    pub post_scaling: i64,
    pub post_streaming_encoding: i64,
    pub post_recording_encoding: i64,
    pub post_network_input: i64,
}

/// Streaming source monitoring over the last monitor interval.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamingSource {
    pub monitor_time_interval: i64,
    pub mean_acq_to_network_time: i64,
    pub acq_to_network_jitter: i64,
    pub mean_network_time: i64,
    pub network_jitter: i64,
    pub bytes_sent: i64,
    pub mean_packet_size: i64,
    pub packet_size_std_dev: i64,
    pub packets_sent: i64,
    pub bytes_dropped: i64,
    pub nalu_dropped: i64,
}

/// One accepted line of a frame-info log.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameInfoRecord {
    /// Seconds since the first frame.
    pub frame_time_s: f64,
    pub frame_index: i64,
    pub acquisition_ts: i64,
    pub system_ts: i64,
    pub flight: FlightState,
    pub encoder: EncoderState,
    pub wifi: WifiState,
    pub pipeline: PipelineDeltas,
    pub streaming: StreamingSource,
    pub commands_max_time_delta_on_last_sec: i64,
    pub last_command_time_delta: i64,
    pub last_command_psi_value: i64,
    pub frame_size: i64,
    pub estimated_lost_frames: i64,
    pub acquisition_ts_shifted: i64,
    pub first_nalu_input_time: i64,
    pub au_output_time: i64,
}

/// Frame-info aggregator: one record per frame with a strictly increasing
/// acquisition timestamp.
#[derive(Debug, Default)]
pub struct FrameInfoLog {
    records: Vec<FrameInfoRecord>,
    reference: ReferenceTime,
    previous_ts: Option<i64>,
    previous_index: Option<i64>,
    ignored_lines: usize,
}

impl FrameInfoLog {
    pub fn records(&self) -> &[FrameInfoRecord] {
        &self.records
    }

    /// One metric across all accepted frames.
    pub fn column<T>(&self, metric: impl Fn(&FrameInfoRecord) -> T) -> Vec<T> {
        self.records.iter().map(metric).collect()
    }

    pub fn frame_times(&self) -> Vec<f64> {
        self.column(|r| r.frame_time_s)
    }

    /// Lines dropped by the monotonic timestamp check.
    pub fn ignored_lines(&self) -> usize {
        self.ignored_lines
    }

    fn decode(line: &LogLine<'_>) -> Result<FrameInfoRecord, LogError> {
        Ok(FrameInfoRecord {
            frame_time_s: 0.0,
            frame_index: line.get_int("frameIndex")?,
            acquisition_ts: line.get_int("acquisitionTs")?,
            system_ts: line.get_int("systemTs")?,
            flight: FlightState {
                battery_percentage: line.get_int("batteryPercentage")?,
                gps_latitude: line.get_float("gpsLatitude")?,
                gps_longitude: line.get_float("gpsLongitude")?,
                gps_altitude: line.get_float("gpsAltitude")?,
                absolute_height: line.get_float("absoluteHeight")?,
                relative_height: line.get_float("relativeHeight")?,
                x_speed: line.get_float("xSpeed")?,
                y_speed: line.get_float("ySpeed")?,
                z_speed: line.get_float("zSpeed")?,
                distance_from_home: line.get_float("distanceFromHome")?,
                yaw: line.get_float("yaw")?,
                pitch: line.get_float("pitch")?,
                roll: line.get_float("roll")?,
                camera_pan: line.get_float("cameraPan")?,
                camera_tilt: line.get_float("cameraTilt")?,
            },
            encoder: EncoderState {
                streaming_target_bitrate_mbps: line.get_int("videoStreamingTargetBitrate")? as f64
                    * BPS_TO_MBPS,
                streaming_decimation: line.get_int("videoStreamingDecimation")?,
                streaming_gop_length: line.get_int("videoStreamingGopLength")?,
                streaming_prev_frame_type: line.get_int("videoStreamingPrevFrameType")?,
                streaming_prev_frame_size: line.get_int("videoStreamingPrevFrameSize")?,
                streaming_prev_frame_psnr_y: line.get_float("videoStreamingPrevFramePsnrY")?,
                recording_prev_frame_type: line.get_int("videoRecordingPrevFrameType")?,
                recording_prev_frame_size: line.get_int("videoRecordingPrevFrameSize")?,
                recording_prev_frame_psnr_y: line.get_float("videoRecordingPrevFramePsnrY")?,
            },
            wifi: WifiState {
                rssi: line.get_int("wifiRssi")?,
                mcs_rate_mbps: line.get_int("wifiMcsRate")? as f64 * BPS_TO_MBPS,
                tx_rate_mbps: line.get_int("wifiTxRate")? as f64 * BPS_TO_MBPS,
                rx_rate_mbps: line.get_int("wifiRxRate")? as f64 * BPS_TO_MBPS,
                tx_fail_rate: line.get_int("wifiTxFailRate")?,
                tx_error_rate: line.get_int("wifiTxErrorRate")?,
                tx_fail_event_count: line.get_int("wifiTxFailEventCount")?,
            },
            pipeline: PipelineDeltas {
                pre_reproj: line.get_int("preReprojTimestampDelta")?,
                post_reproj: line.get_int("postReprojTimestampDelta")?,
                post_ee: line.get_int("postEeTimestampDelta")?,
                post_scaling: line.get_int("postScalingTimestampDelta")?,
                post_streaming_encoding: line.get_int("postStreamingEncodingTimestampDelta")?,
                post_recording_encoding: line.get_int("postRecordingEncodingTimestampDelta")?,
                post_network_input: line.get_int("postNetworkInputTimestampDelta")?,
            },
            streaming: StreamingSource {
                monitor_time_interval: line.get_int("streamingSrcMonitorTimeInterval")?,
                mean_acq_to_network_time: line.get_int("streamingSrcMeanAcqToNetworkTime")?,
                acq_to_network_jitter: line.get_int("streamingSrcAcqToNetworkJitter")?,
                mean_network_time: line.get_int("streamingSrcMeanNetworkTime")?,
                network_jitter: line.get_int("streamingSrcNetworkJitter")?,
                bytes_sent: line.get_int("streamingSrcBytesSent")?,
                mean_packet_size: line.get_int("streamingSrcMeanPacketSize")?,
                packet_size_std_dev: line.get_int("streamingSrcPacketSizeStdDev")?,
                packets_sent: line.get_int("streamingSrcPacketsSent")?,
                bytes_dropped: line.get_int("streamingSrcBytesDropped")?,
                nalu_dropped: line.get_int("streamingSrcNaluDropped")?,
            },
            commands_max_time_delta_on_last_sec: line.get_int("commandsMaxTimeDeltaOnLastSec")?,
            last_command_time_delta: line.get_int("lastCommandTimeDelta")?,
            last_command_psi_value: line.get_int("lastCommandPsiValue")?,
            frame_size: line.get_int("frameSize")?,
            estimated_lost_frames: line.get_int("estimatedLostFrames")?,
            acquisition_ts_shifted: line.get_int("acquisitionTsShifted")?,
            first_nalu_input_time: line.get_int("beaverFirstNaluInputTime")?,
            au_output_time: line.get_int("beaverAuOutputTime")?,
        })
    }
}

impl LogAggregator for FrameInfoLog {
    const FIELDS: &'static [&'static str] = &FRAME_INFO_FIELDS;
    const KIND: &'static str = "frame info";

    fn push_line(&mut self, line: &LogLine<'_>) -> Result<(), LogError> {
        let acquisition_ts = line.get_int("acquisitionTs")?;
        self.reference.capture(acquisition_ts);

        if self.previous_ts.is_some_and(|previous| acquisition_ts <= previous) {
            log::warn!(
                "Inconsistent timestamp: {} at line {} (line ignored)",
                acquisition_ts,
                line.line_number()
            );
            self.ignored_lines += 1;
            return Ok(());
        }

        let mut record = Self::decode(line)?;
        record.frame_time_s = self.reference.elapsed_s(acquisition_ts);
        if !line.columns().is_resolved("estimatedLostFrames") {
            record.estimated_lost_frames = match self.previous_index {
                Some(previous) => record.frame_index - previous - 1,
                None => 0,
            };
        }

        self.previous_ts = Some(acquisition_ts);
        self.previous_index = Some(record.frame_index);
        self.records.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::log_reader::{aggregate, resolve_columns};
    use std::path::Path;

    fn read(input: &str) -> FrameInfoLog {
        let path = Path::new("frameinfo.log");
        let columns = resolve_columns::<FrameInfoLog, _>(input.as_bytes(), path).unwrap();
        aggregate(input.as_bytes(), &columns, path).unwrap()
    }

    #[test]
    fn test_non_monotonic_timestamp_is_dropped() {
        let log = read("frameIndex acquisitionTs\n1 100\n2 100\n3 200\n");
        assert_eq!(log.len(), 2);
        assert_eq!(log.ignored_lines(), 1);
        assert_eq!(log.column(|r| r.acquisition_ts), vec![100, 200]);
        assert_eq!(log.column(|r| r.frame_index), vec![1, 3]);
    }

    #[test]
    fn test_frame_time_is_relative_to_first_frame() {
        let log = read("acquisitionTs frameIndex\n5000000 1\n5033000 2\n5066000 3\n");
        let times = log.frame_times();
        assert_eq!(times[0], 0.0);
        assert!((times[1] - 0.033).abs() < 1e-9);
        assert!((times[2] - 0.066).abs() < 1e-9);
    }

    #[test]
    fn test_lost_frames_derived_from_frame_index_gaps() {
        let log = read("frameIndex acquisitionTs\n10 100\n11 200\n14 300\n15 400\n");
        assert_eq!(log.column(|r| r.estimated_lost_frames), vec![0, 0, 2, 0]);
    }

    #[test]
    fn test_lost_frames_column_used_verbatim() {
        let log = read("frameIndex acquisitionTs estimatedLostFrames\n10 100 4\n14 200 0\n");
        assert_eq!(log.column(|r| r.estimated_lost_frames), vec![4, 0]);
    }

    #[test]
    fn test_rates_converted_to_mbps() {
        let log = read("acquisitionTs videoStreamingTargetBitrate wifiMcsRate\n1 2500000 65000000\n");
        let record = &log.records()[0];
        assert!((record.encoder.streaming_target_bitrate_mbps - 2.5).abs() < 1e-12);
        assert!((record.wifi.mcs_rate_mbps - 65.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_columns_default_to_zero() {
        let log = read("acquisitionTs yaw\n100 0.5\n200\n");
        assert_eq!(log.len(), 2);
        assert_eq!(log.column(|r| r.flight.yaw), vec![0.5, 0.0]);
        assert_eq!(log.column(|r| r.wifi.rssi), vec![0, 0]);
    }

    #[test]
    fn test_dropped_line_does_not_advance_frame_index() {
        let log = read("frameIndex acquisitionTs\n1 100\n9 50\n2 200\n");
        assert_eq!(log.column(|r| r.estimated_lost_frames), vec![0, 0]);
    }
}

// src/data_input/frame_info.rs
