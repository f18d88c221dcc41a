// src/data_input/video_stats.rs

use crate::data_input::log_line::LogLine;
use crate::data_input::log_reader::LogAggregator;
use crate::error::LogError;

pub const ZONE_COUNT: usize = 5;
pub const MACROBLOCK_STATUS_COUNT: usize = 6;

const ERRORED_SECOND_ZONE_FIELDS: [&str; ZONE_COUNT] = [
    "erroredSecondCountByZone[0]",
    "erroredSecondCountByZone[1]",
    "erroredSecondCountByZone[2]",
    "erroredSecondCountByZone[3]",
    "erroredSecondCountByZone[4]",
];

// Name used by older receivers.
const ERROR_SECOND_ZONE_FIELDS: [&str; ZONE_COUNT] = [
    "errorSecondCountByZone[0]",
    "errorSecondCountByZone[1]",
    "errorSecondCountByZone[2]",
    "errorSecondCountByZone[3]",
    "errorSecondCountByZone[4]",
];

const MACROBLOCK_STATUS_FIELDS: [[&str; ZONE_COUNT]; MACROBLOCK_STATUS_COUNT] = [
    [
        "macroblockStatus[0][0]",
        "macroblockStatus[0][1]",
        "macroblockStatus[0][2]",
        "macroblockStatus[0][3]",
        "macroblockStatus[0][4]",
    ],
    [
        "macroblockStatus[1][0]",
        "macroblockStatus[1][1]",
        "macroblockStatus[1][2]",
        "macroblockStatus[1][3]",
        "macroblockStatus[1][4]",
    ],
    [
        "macroblockStatus[2][0]",
        "macroblockStatus[2][1]",
        "macroblockStatus[2][2]",
        "macroblockStatus[2][3]",
        "macroblockStatus[2][4]",
    ],
    [
        "macroblockStatus[3][0]",
        "macroblockStatus[3][1]",
        "macroblockStatus[3][2]",
        "macroblockStatus[3][3]",
        "macroblockStatus[3][4]",
    ],
    [
        "macroblockStatus[4][0]",
        "macroblockStatus[4][1]",
        "macroblockStatus[4][2]",
        "macroblockStatus[4][3]",
        "macroblockStatus[4][4]",
    ],
    [
        "macroblockStatus[5][0]",
        "macroblockStatus[5][1]",
        "macroblockStatus[5][2]",
        "macroblockStatus[5][3]",
        "macroblockStatus[5][4]",
    ],
];

pub const VIDEO_STATS_FIELDS: [&str; 55] = [
    "timestamp",
    "rssi",
    "totalFrameCount",
    "outputFrameCount",
    "erroredOutputFrameCount",
    "discardedFrameCount",
    "missedFrameCount",
    "erroredSecondCount",
    "errorSecondCount",
    "erroredSecondCountByZone[0]",
    "erroredSecondCountByZone[1]",
    "erroredSecondCountByZone[2]",
    "erroredSecondCountByZone[3]",
    "erroredSecondCountByZone[4]",
    "errorSecondCountByZone[0]",
    "errorSecondCountByZone[1]",
    "errorSecondCountByZone[2]",
    "errorSecondCountByZone[3]",
    "errorSecondCountByZone[4]",
    "timestampDeltaIntegral",
    "timestampDeltaIntegralSq",
    "timingErrorIntegral",
    "timingErrorIntegralSq",
    "estimatedLatencyIntegral",
    "estimatedLatencyIntegralSq",
    "macroblockStatus[0][0]",
    "macroblockStatus[0][1]",
    "macroblockStatus[0][2]",
    "macroblockStatus[0][3]",
    "macroblockStatus[0][4]",
    "macroblockStatus[1][0]",
    "macroblockStatus[1][1]",
    "macroblockStatus[1][2]",
    "macroblockStatus[1][3]",
    "macroblockStatus[1][4]",
    "macroblockStatus[2][0]",
    "macroblockStatus[2][1]",
    "macroblockStatus[2][2]",
    "macroblockStatus[2][3]",
    "macroblockStatus[2][4]",
    "macroblockStatus[3][0]",
    "macroblockStatus[3][1]",
    "macroblockStatus[3][2]",
    "macroblockStatus[3][3]",
    "macroblockStatus[3][4]",
    "macroblockStatus[4][0]",
    "macroblockStatus[4][1]",
    "macroblockStatus[4][2]",
    "macroblockStatus[4][3]",
    "macroblockStatus[4][4]",
    "macroblockStatus[5][0]",
    "macroblockStatus[5][1]",
    "macroblockStatus[5][2]",
    "macroblockStatus[5][3]",
    "macroblockStatus[5][4]",
];

/// Running sum and sum of squares of a per-frame duration (us, us²).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TimingIntegral {
    pub sum: i64,
    pub sum_sq: i64,
}

/// Cumulative receiver counters at one sampling instant.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VideoStatsRecord {
    pub timestamp: i64,
    pub rssi: i64,
    pub total_frames: i64,
    pub output_frames: i64,
    pub errored_output_frames: i64,
    pub discarded_frames: i64,
    pub missed_frames: i64,
    pub errored_seconds: i64,
    pub errored_seconds_by_zone: [i64; ZONE_COUNT],
    pub timestamp_delta: TimingIntegral,
    pub timing_error: TimingIntegral,
    pub estimated_latency: TimingIntegral,
    /// Indexed by status, then zone.
    pub macroblocks: [[i64; ZONE_COUNT]; MACROBLOCK_STATUS_COUNT],
}

impl VideoStatsRecord {
    /// Macroblocks of `status` summed over all zones.
    pub fn macroblocks_of(&self, status: usize) -> i64 {
        self.macroblocks[status].iter().sum()
    }
}

#[derive(Debug, Default)]
pub struct VideoStatsLog {
    records: Vec<VideoStatsRecord>,
}

impl VideoStatsLog {
    pub fn records(&self) -> &[VideoStatsRecord] {
        &self.records
    }

    pub fn column<T>(&self, metric: impl Fn(&VideoStatsRecord) -> T) -> Vec<T> {
        self.records.iter().map(metric).collect()
    }
}

fn read_integral(
    line: &LogLine<'_>,
    sum: &'static str,
    sum_sq: &'static str,
) -> Result<TimingIntegral, LogError> {
    Ok(TimingIntegral {
        sum: line.get_int(sum)?,
        sum_sq: line.get_int(sum_sq)?,
    })
}

impl LogAggregator for VideoStatsLog {
    const FIELDS: &'static [&'static str] = &VIDEO_STATS_FIELDS;
    const KIND: &'static str = "video stats";

    fn push_line(&mut self, line: &LogLine<'_>) -> Result<(), LogError> {
        let (errored_seconds_field, zone_fields) = if line.columns().is_resolved("erroredSecondCount") {
            ("erroredSecondCount", &ERRORED_SECOND_ZONE_FIELDS)
        } else {
            ("errorSecondCount", &ERROR_SECOND_ZONE_FIELDS)
        };

        let mut record = VideoStatsRecord {
            timestamp: line.get_int("timestamp")?,
            rssi: line.get_int("rssi")?,
            total_frames: line.get_int("totalFrameCount")?,
            output_frames: line.get_int("outputFrameCount")?,
            errored_output_frames: line.get_int("erroredOutputFrameCount")?,
            discarded_frames: line.get_int("discardedFrameCount")?,
            missed_frames: line.get_int("missedFrameCount")?,
            errored_seconds: line.get_int(errored_seconds_field)?,
            timestamp_delta: read_integral(line, "timestampDeltaIntegral", "timestampDeltaIntegralSq")?,
            timing_error: read_integral(line, "timingErrorIntegral", "timingErrorIntegralSq")?,
            estimated_latency: read_integral(
                line,
                "estimatedLatencyIntegral",
                "estimatedLatencyIntegralSq",
            )?,
            ..VideoStatsRecord::default()
        };
        for (zone, field) in zone_fields.iter().enumerate() {
            record.errored_seconds_by_zone[zone] = line.get_int(*field)?;
        }
        for (status, fields) in MACROBLOCK_STATUS_FIELDS.iter().enumerate() {
            for (zone, field) in fields.iter().enumerate() {
                record.macroblocks[status][zone] = line.get_int(*field)?;
            }
        }

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

    fn read(input: &str) -> VideoStatsLog {
        let path = Path::new("vstats.log");
        let columns = resolve_columns::<VideoStatsLog, _>(input.as_bytes(), path).unwrap();
        aggregate(input.as_bytes(), &columns, path).unwrap()
    }

    #[test]
    fn test_field_tables_are_consistent() {
        for field in ERRORED_SECOND_ZONE_FIELDS
            .iter()
            .chain(ERROR_SECOND_ZONE_FIELDS.iter())
            .chain(MACROBLOCK_STATUS_FIELDS.iter().flatten())
        {
            assert!(VIDEO_STATS_FIELDS.contains(field), "{field} not declared");
        }
    }

    #[test]
    fn test_errored_second_family_preferred() {
        let input = "timestamp erroredSecondCount errorSecondCount erroredSecondCountByZone[4]\n\
                     1000000 3 9 2\n";
        let log = read(input);
        assert_eq!(log.records()[0].errored_seconds, 3);
        assert_eq!(log.records()[0].errored_seconds_by_zone, [0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_older_error_second_names_accepted() {
        let input = "timestamp errorSecondCount errorSecondCountByZone[0] errorSecondCountByZone[1]\n\
                     1000000 4 1 3\n";
        let log = read(input);
        assert_eq!(log.records()[0].errored_seconds, 4);
        assert_eq!(log.records()[0].errored_seconds_by_zone, [1, 3, 0, 0, 0]);
    }

    #[test]
    fn test_macroblocks_indexed_by_status_and_zone() {
        let input = "rssi macroblockStatus[1][0] macroblockStatus[1][4] macroblockStatus[5][2]\n\
                     -40 100 20 7\n";
        let log = read(input);
        let record = &log.records()[0];
        assert_eq!(record.macroblocks_of(1), 120);
        assert_eq!(record.macroblocks[5][2], 7);
        assert_eq!(record.macroblocks_of(0), 0);
    }

    #[test]
    fn test_integrals_default_to_zero_when_absent() {
        let log = read("timestamp outputFrameCount\n1 30\n");
        assert_eq!(log.records()[0].timing_error, TimingIntegral::default());
    }
}

// src/data_input/video_stats.rs
