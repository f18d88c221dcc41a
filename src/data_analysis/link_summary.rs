// src/data_analysis/link_summary.rs

use std::fmt;

use ndarray::Array1;
use ndarray_stats::QuantileExt;

use crate::data_input::rtp_reader::RtpReaderLog;
use crate::data_input::rtp_sender::RtpSenderLog;
use crate::types::TimeSeries;

/// Absolute deviation of each sample from the mean of all samples.
pub fn jitter(values: &Array1<f64>) -> Array1<f64> {
    match values.mean() {
        Some(mean) => values.mapv(|value| (value - mean).abs()),
        None => Array1::zeros(0),
    }
}

/// Share (%) of packets lost over the span of logical packet indices.
pub fn loss_percent(lost: &Array1<f64>, indices: &Array1<f64>) -> f64 {
    let span = match (indices.max(), indices.min()) {
        (Ok(max), Ok(min)) => max - min,
        _ => return 0.0,
    };
    if span <= 0.0 {
        return 0.0;
    }
    lost.sum() * 100.0 / span
}

fn ratio(reader: f64, sender: f64) -> f64 {
    if sender != 0.0 {
        reader / sender
    } else {
        0.0
    }
}

fn indexed(indices: &Array1<f64>, values: &Array1<f64>) -> TimeSeries {
    indices.iter().copied().zip(values.iter().copied()).collect()
}

/// End-to-end view of one stream from both sides of the link, indexed by
/// logical packet number.
#[derive(Debug, Clone)]
pub struct LinkSummary {
    pub sender_acq_to_network: TimeSeries,
    pub sender_acq_to_network_input: TimeSeries,
    pub sender_network: TimeSeries,
    pub reader_network_recv: TimeSeries,
    pub sender_jitter: TimeSeries,
    pub reader_jitter: TimeSeries,
    pub sender_dropped_before: TimeSeries,
    pub reader_missing_before: TimeSeries,
    pub sender_mean_jitter_ms: f64,
    pub sender_dropped_percent: f64,
    pub reader_mean_jitter_ms: f64,
    pub reader_missing_percent: f64,
    pub jitter_ratio: f64,
    pub loss_ratio: f64,
}

impl LinkSummary {
    pub fn new(sender: &RtpSenderLog, reader: &RtpReaderLog) -> Self {
        let sender_index = Array1::from(sender.column(|r| r.packet_index as f64));
        let acq_to_network = Array1::from(sender.column(|r| r.acq_to_network_ms()));
        let network = Array1::from(sender.column(|r| r.network_ms()));
        let acq_to_network_input = &acq_to_network - &network;
        let sender_jitter = jitter(&acq_to_network);
        let dropped = Array1::from(sender.column(|r| r.dropped_before as f64));

        let reader_index = Array1::from(reader.column(|r| r.packet_index as f64));
        let network_recv = Array1::from(reader.column(|r| r.network_recv_ms));
        let reader_jitter = jitter(&network_recv);
        let missing = Array1::from(reader.column(|r| r.missing_before as f64));

        let sender_mean_jitter_ms = sender_jitter.mean().unwrap_or(0.0);
        let reader_mean_jitter_ms = reader_jitter.mean().unwrap_or(0.0);
        let sender_dropped_percent = loss_percent(&dropped, &sender_index);
        let reader_missing_percent = loss_percent(&missing, &reader_index);

        LinkSummary {
            sender_acq_to_network: indexed(&sender_index, &acq_to_network),
            sender_acq_to_network_input: indexed(&sender_index, &acq_to_network_input),
            sender_network: indexed(&sender_index, &network),
            reader_network_recv: indexed(&reader_index, &network_recv),
            sender_jitter: indexed(&sender_index, &sender_jitter),
            reader_jitter: indexed(&reader_index, &reader_jitter),
            sender_dropped_before: indexed(&sender_index, &dropped),
            reader_missing_before: indexed(&reader_index, &missing),
            sender_mean_jitter_ms,
            sender_dropped_percent,
            reader_mean_jitter_ms,
            reader_missing_percent,
            jitter_ratio: ratio(reader_mean_jitter_ms, sender_mean_jitter_ms),
            loss_ratio: ratio(reader_missing_percent, sender_dropped_percent),
        }
    }
}

impl fmt::Display for LinkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mean sender jitter: {:.3} ms", self.sender_mean_jitter_ms)?;
        writeln!(f, "Dropped packets: {:.3}%", self.sender_dropped_percent)?;
        writeln!(
            f,
            "Mean reader jitter: {:.3} ms (x{:.2})",
            self.reader_mean_jitter_ms, self.jitter_ratio
        )?;
        write!(
            f,
            "Missing packets: {:.3}% (x{:.2})",
            self.reader_missing_percent, self.loss_ratio
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::log_reader::{aggregate, resolve_columns, LogAggregator};
    use ndarray::array;
    use std::path::Path;

    fn read<A: LogAggregator>(input: &str) -> A {
        let path = Path::new("link.log");
        let columns = resolve_columns::<A, _>(input.as_bytes(), path).unwrap();
        aggregate(input.as_bytes(), &columns, path).unwrap()
    }

    #[test]
    fn test_jitter_is_distance_to_mean() {
        assert_eq!(jitter(&array![1.0, 3.0, 5.0]), array![2.0, 0.0, 2.0]);
        assert_eq!(jitter(&Array1::zeros(0)).len(), 0);
    }

    #[test]
    fn test_loss_percent_over_index_span() {
        let lost = array![0.0, 1.0, 0.0, 1.0];
        let indices = array![0.0, 2.0, 3.0, 5.0];
        assert!((loss_percent(&lost, &indices) - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_loss_percent_guards_empty_and_single_packet() {
        assert_eq!(loss_percent(&Array1::zeros(0), &Array1::zeros(0)), 0.0);
        assert_eq!(loss_percent(&array![0.0], &array![7.0]), 0.0);
    }

    #[test]
    fn test_summary_ratios() {
        let sender: RtpSenderLog = read(
            "sendTimestamp auTimestamp inputTimestamp rtpSeqNum bytesSent\n\
             1002000 1000000 1001000 0 100\n\
             1006000 1000000 1005000 1 100\n\
             1010000 1008000 1009000 2 0\n\
             1014000 1010000 1013000 3 100\n",
        );
        let reader: RtpReaderLog = read(
            "recvTimestamp rtpTimestampShifted rtpSeqNum\n\
             2004000 2000000 0\n\
             2010000 2000000 1\n\
             2018000 2010000 3\n",
        );
        let summary = LinkSummary::new(&sender, &reader);

        // acq-to-network [2, 6, 2, 4] -> mean 3.5, jitter [1.5, 2.5, 1.5, 0.5]
        assert!((summary.sender_mean_jitter_ms - 1.5).abs() < 1e-12);
        // one drop over an index span of 3
        assert!((summary.sender_dropped_percent - 100.0 / 3.0).abs() < 1e-9);
        // network receive [4, 10, 8] -> mean 22/3
        let expected_reader_jitter = (10.0 / 3.0 + 8.0 / 3.0 + 2.0 / 3.0) / 3.0;
        assert!((summary.reader_mean_jitter_ms - expected_reader_jitter).abs() < 1e-9);
        assert!((summary.reader_missing_percent - 100.0 / 3.0).abs() < 1e-9);
        assert!((summary.loss_ratio - 1.0).abs() < 1e-9);
        assert!(
            (summary.jitter_ratio - expected_reader_jitter / 1.5).abs() < 1e-9
        );
        assert_eq!(summary.sender_acq_to_network_input[0], (0.0, 1.0));
    }

    #[test]
    fn test_zero_sender_values_give_zero_ratios() {
        let sender: RtpSenderLog = read("rtpSeqNum bytesSent\n0 10\n1 10\n");
        let reader: RtpReaderLog = read("rtpSeqNum\n0\n2\n");
        let summary = LinkSummary::new(&sender, &reader);
        assert_eq!(summary.sender_dropped_percent, 0.0);
        assert_eq!(summary.loss_ratio, 0.0);
        assert_eq!(summary.jitter_ratio, 0.0);
        assert_eq!(summary.reader_missing_percent, 50.0);
    }
}

// src/data_analysis/link_summary.rs
