// src/data_analysis/video_stats.rs

use ndarray::{Array1, Zip};
use ndarray_stats::QuantileExt;

use crate::constants::{US2_PER_MS2, US_PER_MS, US_PER_S};
use crate::data_input::log_reader::IndexedLog;
use crate::data_input::video_stats::{
    TimingIntegral, VideoStatsLog, VideoStatsRecord, MACROBLOCK_STATUS_COUNT, ZONE_COUNT,
};
use crate::error::LogError;

/// Macroblock decoding statuses, in the order of the `macroblockStatus` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroblockStatus {
    Unknown,
    ValidI,
    ValidP,
    MissingConcealed,
    Missing,
    ErrorPropagation,
}

impl MacroblockStatus {
    pub const ALL: [MacroblockStatus; MACROBLOCK_STATUS_COUNT] = [
        MacroblockStatus::Unknown,
        MacroblockStatus::ValidI,
        MacroblockStatus::ValidP,
        MacroblockStatus::MissingConcealed,
        MacroblockStatus::Missing,
        MacroblockStatus::ErrorPropagation,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            MacroblockStatus::Unknown => "Unknown",
            MacroblockStatus::ValidI => "Valid (I)",
            MacroblockStatus::ValidP => "Valid (P)",
            MacroblockStatus::MissingConcealed => "Missing (concealed)",
            MacroblockStatus::Missing => "Missing",
            MacroblockStatus::ErrorPropagation => "Error propagation",
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, MacroblockStatus::ValidI | MacroblockStatus::ValidP)
    }
}

/// Element-wise `numerator / denominator`, 0 where the denominator is 0.
pub fn safe_divide(numerator: &Array1<f64>, denominator: &Array1<f64>) -> Array1<f64> {
    Zip::from(numerator)
        .and(denominator)
        .map_collect(|&n, &d| if d != 0.0 { n / d } else { 0.0 })
}

fn share(part: f64, total: f64) -> f64 {
    if total != 0.0 {
        part / total
    } else {
        0.0
    }
}

/// One bin per integer RSSI value between the lowest and highest sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RssiBins {
    pub min: i64,
    pub max: i64,
}

impl RssiBins {
    pub fn from_records(records: &[VideoStatsRecord]) -> Option<Self> {
        let rssi = Array1::from(records.iter().map(|r| r.rssi).collect::<Vec<_>>());
        match (rssi.min(), rssi.max()) {
            (Ok(&min), Ok(&max)) => Some(RssiBins { min, max }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        (self.max - self.min + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    pub fn rssi_values(&self) -> Vec<i64> {
        (self.min..=self.max).collect()
    }

    /// Sums the per-interval delta of a cumulative counter into the bin of
    /// the interval's closing RSSI.
    pub fn accumulate<F>(&self, records: &[VideoStatsRecord], delta: F) -> Array1<f64>
    where
        F: Fn(&VideoStatsRecord, &VideoStatsRecord) -> f64,
    {
        let mut bins = Array1::zeros(self.len());
        for pair in records.windows(2) {
            let bin = (pair[1].rssi - self.min) as usize;
            bins[bin] += delta(&pair[0], &pair[1]);
        }
        bins
    }

    /// RSSI range of the bins holding a nonzero `weight`, if any.
    pub fn populated_range(&self, weights: &Array1<f64>) -> Option<(i64, i64)> {
        let populated: Vec<i64> = self
            .rssi_values()
            .into_iter()
            .zip(weights.iter())
            .filter(|&(_, &weight)| weight > 0.0)
            .map(|(rssi, _)| rssi)
            .collect();
        Some((*populated.first()?, *populated.last()?))
    }
}

/// Final frame counters split into disjoint categories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallFrames {
    pub total: f64,
    pub output_no_error: f64,
    pub output_errored: f64,
    pub discarded: f64,
    pub missed: f64,
}

impl OverallFrames {
    pub fn from_record(last: &VideoStatsRecord) -> Self {
        let output_errored = last.errored_output_frames as f64;
        let discarded = last.discarded_frames as f64;
        OverallFrames {
            total: last.total_frames as f64,
            output_no_error: last.output_frames as f64 - output_errored,
            output_errored,
            discarded,
            missed: last.missed_frames as f64 - discarded,
        }
    }

    pub fn category_sum(&self) -> f64 {
        self.output_no_error + self.output_errored + self.discarded + self.missed
    }

    pub fn is_consistent(&self) -> bool {
        self.category_sum() == self.total
    }
}

/// Per-bin shares of each frame category, each relative to the bin total.
#[derive(Debug, Clone)]
pub struct FramesByRssi {
    pub missed: Array1<f64>,
    pub discarded: Array1<f64>,
    pub output_errored: Array1<f64>,
    pub output_no_error: Array1<f64>,
    /// Bin total relative to the overall frame count.
    pub total_share: Array1<f64>,
}

impl FramesByRssi {
    fn new(records: &[VideoStatsRecord], bins: &RssiBins, overall_total: f64) -> Self {
        let total = bins.accumulate(records, |a, b| (b.total_frames - a.total_frames) as f64);
        let errored = bins.accumulate(records, |a, b| {
            (b.errored_output_frames - a.errored_output_frames) as f64
        });
        let output = bins.accumulate(records, |a, b| (b.output_frames - a.output_frames) as f64);
        let discarded =
            bins.accumulate(records, |a, b| (b.discarded_frames - a.discarded_frames) as f64);
        let missed = bins.accumulate(records, |a, b| (b.missed_frames - a.missed_frames) as f64);

        FramesByRssi {
            missed: safe_divide(&(&missed - &discarded), &total),
            discarded: safe_divide(&discarded, &total),
            output_errored: safe_divide(&errored, &total),
            output_no_error: safe_divide(&(&output - &errored), &total),
            total_share: total.mapv(|bin| share(bin, overall_total)),
        }
    }
}

/// Mean and standard deviation of a per-frame duration (ms).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

impl MeanStd {
    /// From the integral and integral of squares (us, us²) over `frames`.
    pub fn from_integrals(sum_us: f64, sum_sq_us2: f64, frames: f64) -> Self {
        if frames == 0.0 {
            return MeanStd::default();
        }
        let mean = sum_us / US_PER_MS / frames;
        let variance = sum_sq_us2 / US2_PER_MS2 / frames - mean * mean;
        MeanStd {
            mean,
            std: variance.max(0.0).sqrt(),
        }
    }
}

/// Mean and standard deviation of one timing per RSSI bin (ms).
#[derive(Debug, Clone)]
pub struct BinnedTiming {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl BinnedTiming {
    fn new<F>(records: &[VideoStatsRecord], bins: &RssiBins, output: &Array1<f64>, integral: F) -> Self
    where
        F: Fn(&VideoStatsRecord) -> TimingIntegral,
    {
        let sum = bins.accumulate(records, |a, b| {
            (integral(b).sum - integral(a).sum) as f64 / US_PER_MS
        });
        let sum_sq = bins.accumulate(records, |a, b| {
            (integral(b).sum_sq - integral(a).sum_sq) as f64 / US2_PER_MS2
        });
        let mean = safe_divide(&sum, output);
        let mean_sq = safe_divide(&sum_sq, output);
        let std = Zip::from(&mean_sq)
            .and(&mean)
            .map_collect(|&sq, &m| (sq - m * m).max(0.0).sqrt());
        BinnedTiming { mean, std }
    }
}

#[derive(Debug, Clone)]
pub struct TimingsByRssi {
    pub timestamp_delta: BinnedTiming,
    pub timing_error: BinnedTiming,
    pub estimated_latency: BinnedTiming,
    /// Output frames of the bin relative to all output frames.
    pub output_share: Array1<f64>,
    pub output_frames: Array1<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallTimings {
    pub timestamp_delta: MeanStd,
    pub timing_error: MeanStd,
    pub estimated_latency: MeanStd,
}

impl OverallTimings {
    fn from_record(last: &VideoStatsRecord) -> Self {
        let frames = last.output_frames as f64;
        let stats = |integral: TimingIntegral| {
            MeanStd::from_integrals(integral.sum as f64, integral.sum_sq as f64, frames)
        };
        OverallTimings {
            timestamp_delta: stats(last.timestamp_delta),
            timing_error: stats(last.timing_error),
            estimated_latency: stats(last.estimated_latency),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MacroblocksByRssi {
    /// Indexed by [`MacroblockStatus::index`].
    pub status_share: Vec<Array1<f64>>,
    pub total_share: Array1<f64>,
}

/// Every breakdown drawn by the video-stats view.
#[derive(Debug, Clone)]
pub struct VideoStatsReport {
    pub title: String,
    pub bins: RssiBins,
    pub overall_frames: OverallFrames,
    pub frames_by_rssi: FramesByRssi,
    /// Errored-second ratio (%), zone 5 first.
    pub zone_esr: [f64; ZONE_COUNT],
    pub timings_by_rssi: TimingsByRssi,
    pub overall_timings: OverallTimings,
    /// Final macroblock counts per status, summed over zones.
    pub overall_macroblocks: [f64; MACROBLOCK_STATUS_COUNT],
    pub macroblocks_by_rssi: MacroblocksByRssi,
}

impl VideoStatsReport {
    pub fn from_records(records: &[VideoStatsRecord], title: String) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;
        let bins = RssiBins::from_records(records)?;

        let overall_frames = OverallFrames::from_record(last);
        if !overall_frames.is_consistent() {
            log::warn!(
                "Overall frame count mismatch: {} vs. {}",
                overall_frames.total,
                overall_frames.category_sum()
            );
        }
        let frames_by_rssi = FramesByRssi::new(records, &bins, overall_frames.total);

        let total_time_s = (last.timestamp - first.timestamp) as f64 / US_PER_S + 1.0;
        let mut zone_esr = [0.0; ZONE_COUNT];
        for (slot, zone) in zone_esr.iter_mut().zip((0..ZONE_COUNT).rev()) {
            *slot = last.errored_seconds_by_zone[zone] as f64 / total_time_s * 100.0;
        }

        let output_frames =
            bins.accumulate(records, |a, b| (b.output_frames - a.output_frames) as f64);
        let overall_output = last.output_frames as f64;
        let timings_by_rssi = TimingsByRssi {
            timestamp_delta: BinnedTiming::new(records, &bins, &output_frames, |r| r.timestamp_delta),
            timing_error: BinnedTiming::new(records, &bins, &output_frames, |r| r.timing_error),
            estimated_latency: BinnedTiming::new(records, &bins, &output_frames, |r| {
                r.estimated_latency
            }),
            output_share: output_frames.mapv(|bin| share(bin, overall_output)),
            output_frames,
        };

        let mut overall_macroblocks = [0.0; MACROBLOCK_STATUS_COUNT];
        for status in MacroblockStatus::ALL {
            overall_macroblocks[status.index()] = last.macroblocks_of(status.index()) as f64;
        }
        let overall_macroblock_total: f64 = overall_macroblocks.iter().sum();

        let per_status: Vec<Array1<f64>> = MacroblockStatus::ALL
            .iter()
            .map(|status| {
                let s = status.index();
                bins.accumulate(records, |a, b| (b.macroblocks_of(s) - a.macroblocks_of(s)) as f64)
            })
            .collect();
        let macroblock_total = per_status
            .iter()
            .fold(Array1::<f64>::zeros(bins.len()), |acc, counts| acc + counts);
        let macroblocks_by_rssi = MacroblocksByRssi {
            status_share: per_status
                .iter()
                .map(|counts| safe_divide(counts, &macroblock_total))
                .collect(),
            total_share: macroblock_total.mapv(|bin| share(bin, overall_macroblock_total)),
        };

        Some(VideoStatsReport {
            title,
            bins,
            overall_frames,
            frames_by_rssi,
            zone_esr,
            timings_by_rssi,
            overall_timings: OverallTimings::from_record(last),
            overall_macroblocks,
            macroblocks_by_rssi,
        })
    }

    /// Builds the report of an opened video-stats log.
    pub fn from_log(log: &IndexedLog<VideoStatsLog>) -> Result<Self, LogError> {
        Self::from_records(log.data().records(), log.title())
            .ok_or_else(|| LogError::Empty(log.path().to_path_buf()))
    }
}


// src/data_analysis/video_stats.rs
