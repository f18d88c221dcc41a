// src/data_input/rtp_sender.rs

use crate::data_analysis::sequence::{DropRunCounter, ReferenceTime, SeqNumUnwrapper, RTP_SEQ_MODULUS};
use crate::data_input::log_line::LogLine;
use crate::data_input::log_reader::LogAggregator;
use crate::error::LogError;

pub const RTP_SENDER_FIELDS: [&str; 8] = [
    "sendTimestamp",
    "inputTimestamp",
    "auTimestamp",
    "rtpTimestamp",
    "rtpSeqNum",
    "rtpMarkerBit",
    "bytesSent",
    "bytesDropped",
];

/// Converts a 90 kHz RTP media timestamp to the microsecond scale.
pub fn rtp_timestamp_to_us(rtp_timestamp: i64) -> i64 {
    rtp_timestamp * 1000 / 90
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RtpSenderRecord {
    /// Seconds since the first access unit.
    pub packet_time_s: f64,
    pub rtp_timestamp_us: i64,
    pub rtp_seq_num: i64,
    /// Sequence number with 16-bit wraparound removed.
    pub packet_index: i64,
    pub marker_bit: bool,
    pub bytes_sent: i64,
    pub bytes_dropped: i64,
    /// Zero-byte packets immediately before this one.
    pub dropped_before: u64,
    pub acq_to_network_send_ms: f64,
    pub network_send_ms: f64,
    pub acq_to_network_drop_ms: f64,
    pub network_drop_ms: f64,
}

impl RtpSenderRecord {
    pub fn is_dropped(&self) -> bool {
        self.bytes_sent == 0
    }

    /// Acquisition to network time whether the packet was sent or dropped.
    pub fn acq_to_network_ms(&self) -> f64 {
        self.acq_to_network_send_ms + self.acq_to_network_drop_ms
    }

    pub fn network_ms(&self) -> f64 {
        self.network_send_ms + self.network_drop_ms
    }

    /// Time spent between acquisition and network input.
    pub fn acq_to_network_input_ms(&self) -> f64 {
        self.acq_to_network_ms() - self.network_ms()
    }
}

#[derive(Debug)]
pub struct RtpSenderLog {
    records: Vec<RtpSenderRecord>,
    reference: ReferenceTime,
    unwrapper: SeqNumUnwrapper,
    drops: DropRunCounter,
}

impl Default for RtpSenderLog {
    fn default() -> Self {
        RtpSenderLog {
            records: Vec::new(),
            reference: ReferenceTime::default(),
            unwrapper: SeqNumUnwrapper::new(RTP_SEQ_MODULUS),
            drops: DropRunCounter::default(),
        }
    }
}

impl RtpSenderLog {
    pub fn records(&self) -> &[RtpSenderRecord] {
        &self.records
    }

    pub fn column<T>(&self, metric: impl Fn(&RtpSenderRecord) -> T) -> Vec<T> {
        self.records.iter().map(metric).collect()
    }

    pub fn dropped_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_dropped()).count()
    }
}

impl LogAggregator for RtpSenderLog {
    const FIELDS: &'static [&'static str] = &RTP_SENDER_FIELDS;
    const KIND: &'static str = "rtp sender";

    fn push_line(&mut self, line: &LogLine<'_>) -> Result<(), LogError> {
        let send_ts = line.get_int("sendTimestamp")?;
        let input_ts = line.get_int("inputTimestamp")?;
        let au_ts = line.get_int("auTimestamp")?;
        let rtp_seq_num = line.get_int("rtpSeqNum")?;
        let bytes_sent = line.get_int("bytesSent")?;

        self.reference.capture(au_ts);
        let acq_to_network = (send_ts - au_ts) as f64 / 1000.0;
        let network = (send_ts - input_ts) as f64 / 1000.0;
        let sent = bytes_sent > 0;

        let mut record = RtpSenderRecord {
            packet_time_s: self.reference.elapsed_s(send_ts),
            rtp_timestamp_us: rtp_timestamp_to_us(line.get_int("rtpTimestamp")?),
            rtp_seq_num,
            packet_index: self.unwrapper.push(rtp_seq_num).index,
            marker_bit: line.get_int("rtpMarkerBit")? != 0,
            bytes_sent,
            bytes_dropped: line.get_int("bytesDropped")?,
            dropped_before: self.drops.push(!sent),
            ..RtpSenderRecord::default()
        };
        if sent {
            record.acq_to_network_send_ms = acq_to_network;
            record.network_send_ms = network;
        } else {
            record.acq_to_network_drop_ms = acq_to_network;
            record.network_drop_ms = network;
        }

        self.records.push(record);
        Ok(())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}


// src/data_input/rtp_sender.rs
