// src/data_input/pcmd_monitor.rs

use crate::data_analysis::sequence::{ReferenceTime, SeqNumUnwrapper, PCMD_SEQ_MODULUS};
use crate::data_input::log_line::LogLine;
use crate::data_input::log_reader::LogAggregator;
use crate::error::LogError;

pub const PCMD_MONITOR_FIELDS: [&str; 6] = [
    "seqNum",
    "creationTimestamp",
    "creationTimestampShifted",
    "receptionTimestamp",
    "useTimestamp",
    "netmonTimestamp",
];

/// One piloting command as seen by the receiving side.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PcmdRecord {
    /// Seconds since the first command was created.
    pub elapsed_s: f64,
    pub seq_num: i64,
    /// Sequence number with 8-bit wraparound removed.
    pub pcmd_index: i64,
    pub creation_ts: i64,
    pub creation_ts_shifted: i64,
    pub reception_ts: i64,
    pub use_ts: i64,
    pub netmon_ts: i64,
    pub missing_before: i64,
}

impl PcmdRecord {
    /// Creation to reception in ms, on the receiver clock when the shifted
    /// creation timestamp is available.
    pub fn creation_to_reception_ms(&self) -> f64 {
        let created = if self.creation_ts_shifted != 0 {
            self.creation_ts_shifted
        } else {
            self.creation_ts
        };
        (self.reception_ts - created) as f64 / 1000.0
    }

    /// Reception to use in ms, 0 for a command that was never used.
    pub fn reception_to_use_ms(&self) -> f64 {
        if self.use_ts == 0 {
            return 0.0;
        }
        (self.use_ts - self.reception_ts) as f64 / 1000.0
    }
}

#[derive(Debug)]
pub struct PcmdMonitorLog {
    records: Vec<PcmdRecord>,
    reference: ReferenceTime,
    unwrapper: SeqNumUnwrapper,
}

impl Default for PcmdMonitorLog {
    fn default() -> Self {
        PcmdMonitorLog {
            records: Vec::new(),
            reference: ReferenceTime::default(),
            unwrapper: SeqNumUnwrapper::new(PCMD_SEQ_MODULUS),
        }
    }
}

impl PcmdMonitorLog {
    pub fn records(&self) -> &[PcmdRecord] {
        &self.records
    }

    pub fn column<T>(&self, metric: impl Fn(&PcmdRecord) -> T) -> Vec<T> {
        self.records.iter().map(metric).collect()
    }

    pub fn missing_count(&self) -> i64 {
        self.records.iter().map(|r| r.missing_before).sum()
    }
}

impl LogAggregator for PcmdMonitorLog {
    const FIELDS: &'static [&'static str] = &PCMD_MONITOR_FIELDS;
    const KIND: &'static str = "piloting commands";

    fn push_line(&mut self, line: &LogLine<'_>) -> Result<(), LogError> {
        let seq_num = line.get_int("seqNum")?;
        let creation_ts = line.get_int("creationTimestamp")?;
        self.reference.capture(creation_ts);
        let unwrapped = self.unwrapper.push(seq_num);

        self.records.push(PcmdRecord {
            elapsed_s: self.reference.elapsed_s(creation_ts),
            seq_num,
            pcmd_index: unwrapped.index,
            creation_ts,
            creation_ts_shifted: line.get_int("creationTimestampShifted")?,
            reception_ts: line.get_int("receptionTimestamp")?,
            use_ts: line.get_int("useTimestamp")?,
            netmon_ts: line.get_int("netmonTimestamp")?,
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

    fn read(input: &str) -> PcmdMonitorLog {
        let path = Path::new("pcmd.log");
        let columns = resolve_columns::<PcmdMonitorLog, _>(input.as_bytes(), path).unwrap();
        aggregate(input.as_bytes(), &columns, path).unwrap()
    }

    #[test]
    fn test_8bit_sequence_wraps_into_logical_index() {
        let log = read("seqNum\n254\n255\n0\n1\n");
        assert_eq!(log.column(|r| r.pcmd_index), vec![254, 255, 256, 257]);
        assert_eq!(log.missing_count(), 0);
    }

    #[test]
    fn test_missing_commands_across_wrap() {
        let log = read("seqNum\n250\n253\n2\n");
        assert_eq!(log.column(|r| r.missing_before), vec![0, 2, 4]);
    }

    #[test]
    fn test_delays_in_milliseconds() {
        let input = "seqNum creationTimestamp creationTimestampShifted receptionTimestamp useTimestamp\n\
                     1 1000000 2000000 2012000 2015000\n\
                     2 1050000 0 1065000 0\n";
        let log = read(input);
        assert_eq!(log.column(|r| r.creation_to_reception_ms()), vec![12.0, 15.0]);
        assert_eq!(log.column(|r| r.reception_to_use_ms()), vec![3.0, 0.0]);
        assert_eq!(log.column(|r| r.elapsed_s), vec![0.0, 0.05]);
    }
}

// src/data_input/pcmd_monitor.rs
