// src/data_input/rtp_reader.rs

use crate::data_analysis::sequence::{ReferenceTime, SeqNumUnwrapper, RTP_SEQ_MODULUS};
use crate::data_input::log_line::LogLine;
use crate::data_input::log_reader::LogAggregator;
use crate::data_input::rtp_sender::rtp_timestamp_to_us;
use crate::error::LogError;

pub const RTP_READER_FIELDS: [&str; 6] = [
    "recvTimestamp",
    "rtpTimestamp",
    "rtpTimestampShifted",
    "rtpSeqNum",
    "rtpMarkerBit",
    "bytes",
];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RtpReaderRecord {
    /// Seconds since the first received packet.
    pub packet_time_s: f64,
    pub rtp_timestamp_us: i64,
    pub rtp_seq_num: i64,
    pub packet_index: i64,
    pub marker_bit: bool,
    pub bytes: i64,
    pub network_recv_ms: f64,
    /// Packets lost between the previous one and this one.
    pub missing_before: i64,
}

#[derive(Debug)]
pub struct RtpReaderLog {
    records: Vec<RtpReaderRecord>,
    reference: ReferenceTime,
    // receive clock minus media clock on the first packet
    clock_offset: Option<i64>,
    unwrapper: SeqNumUnwrapper,
}

impl Default for RtpReaderLog {
    fn default() -> Self {
        RtpReaderLog {
            records: Vec::new(),
            reference: ReferenceTime::default(),
            clock_offset: None,
            unwrapper: SeqNumUnwrapper::new(RTP_SEQ_MODULUS),
        }
    }
}

impl RtpReaderLog {
    pub fn records(&self) -> &[RtpReaderRecord] {
        &self.records
    }

    pub fn column<T>(&self, metric: impl Fn(&RtpReaderRecord) -> T) -> Vec<T> {
        self.records.iter().map(metric).collect()
    }

    pub fn missing_count(&self) -> i64 {
        self.records.iter().map(|r| r.missing_before).sum()
    }
}

impl LogAggregator for RtpReaderLog {
    const FIELDS: &'static [&'static str] = &RTP_READER_FIELDS;
    const KIND: &'static str = "rtp reader";

    fn push_line(&mut self, line: &LogLine<'_>) -> Result<(), LogError> {
        let recv_ts = line.get_int("recvTimestamp")?;
        let rtp_timestamp_us = rtp_timestamp_to_us(line.get_int("rtpTimestamp")?);
        let shifted_ts = line.get_int("rtpTimestampShifted")?;
        let rtp_seq_num = line.get_int("rtpSeqNum")?;

        self.reference.capture(recv_ts);
        let clock_offset = *self
            .clock_offset
            .get_or_insert(recv_ts - rtp_timestamp_us);
        let network_recv_ms = if shifted_ts != 0 {
            (recv_ts - shifted_ts) as f64 / 1000.0
        } else {
            (recv_ts - rtp_timestamp_us - clock_offset) as f64 / 1000.0
        };
        let unwrapped = self.unwrapper.push(rtp_seq_num);

        self.records.push(RtpReaderRecord {
            packet_time_s: self.reference.elapsed_s(recv_ts),
            rtp_timestamp_us,
            rtp_seq_num,
            packet_index: unwrapped.index,
            marker_bit: line.get_int("rtpMarkerBit")? != 0,
            bytes: line.get_int("bytes")?,
            network_recv_ms,
            missing_before: unwrapped.missing_before(),
        });
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

    fn read(input: &str) -> RtpReaderLog {
        let path = Path::new("reader.log");
        let columns = resolve_columns::<RtpReaderLog, _>(input.as_bytes(), path).unwrap();
        aggregate(input.as_bytes(), &columns, path).unwrap()
    }

    #[test]
    fn test_missing_packets_from_sequence_gaps() {
        let log = read("rtpSeqNum bytes\n10 100\n12 100\n13 100\n");
        assert_eq!(log.column(|r| r.missing_before), vec![0, 1, 0]);
        assert_eq!(log.missing_count(), 1);
    }

    #[test]
    fn test_network_time_uses_shifted_timestamp_when_present() {
        let input = "recvTimestamp rtpTimestampShifted\n1010000 1000000\n1025000 1020000\n";
        let log = read(input);
        assert_eq!(log.column(|r| r.network_recv_ms), vec![10.0, 5.0]);
    }

    #[test]
    fn test_network_time_relative_to_first_packet_without_shift() {
        // rtp 90 ticks = 1000 us
        let input = "recvTimestamp rtpTimestamp\n5000000 0\n5004000 90\n5012000 180\n";
        let log = read(input);
        assert_eq!(log.column(|r| r.network_recv_ms), vec![0.0, 3.0, 10.0]);
    }

    #[test]
    fn test_packet_time_relative_to_first_reception() {
        let log = read("recvTimestamp\n3000000\n3250000\n");
        assert_eq!(log.column(|r| r.packet_time_s), vec![0.0, 0.25]);
    }
}

// src/data_input/rtp_reader.rs
