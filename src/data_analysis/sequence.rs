// src/data_analysis/sequence.rs

/// 16-bit RTP sequence numbers.
pub const RTP_SEQ_MODULUS: i64 = 1 << 16;
/// 8-bit piloting command sequence numbers.
pub const PCMD_SEQ_MODULUS: i64 = 1 << 8;

/// Result of feeding one raw sequence number to a [`SeqNumUnwrapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unwrapped {
    /// Monotonic logical index (`raw + offset`).
    pub index: i64,
    /// Wrap-corrected delta to the previous raw value, `None` on the first one.
    pub delta: Option<i64>,
}

impl Unwrapped {
    /// Items lost between the previous value and this one.
    pub fn missing_before(&self) -> i64 {
        match self.delta {
            Some(delta) if delta > 0 => delta - 1,
            _ => 0,
        }
    }
}

/// Rebuilds a logical index from a wrapping fixed-width sequence counter.
///
/// A backward jump larger than half the modulus is taken as a wrap and adds
/// one full modulus to the running offset. The offset never decreases.
#[derive(Debug, Clone)]
pub struct SeqNumUnwrapper {
    modulus: i64,
    previous: Option<i64>,
    offset: i64,
}

impl SeqNumUnwrapper {
    pub fn new(modulus: i64) -> Self {
        SeqNumUnwrapper {
            modulus,
            previous: None,
            offset: 0,
        }
    }

    pub fn push(&mut self, raw: i64) -> Unwrapped {
        let delta = self.previous.map(|previous| {
            let delta = raw - previous;
            if delta < -(self.modulus / 2) {
                self.offset += self.modulus;
                delta + self.modulus
            } else {
                delta
            }
        });
        self.previous = Some(raw);
        Unwrapped {
            index: raw + self.offset,
            delta,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

/// Counts consecutive dropped items and reports the run on the next kept one.
#[derive(Debug, Clone, Default)]
pub struct DropRunCounter {
    pending: u64,
}

impl DropRunCounter {
    /// Returns the number of items dropped right before this one; always 0
    /// for a dropped item.
    pub fn push(&mut self, dropped: bool) -> u64 {
        if dropped {
            self.pending += 1;
            0
        } else {
            std::mem::take(&mut self.pending)
        }
    }
}

/// First non-zero timestamp seen, used as the origin of elapsed times.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceTime(i64);

impl ReferenceTime {
    pub fn capture(&mut self, timestamp: i64) -> i64 {
        if self.0 == 0 {
            self.0 = timestamp;
        }
        self.0
    }

    /// Seconds elapsed between the reference and `timestamp_us`.
    pub fn elapsed_s(&self, timestamp_us: i64) -> f64 {
        (timestamp_us - self.0) as f64 / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_8bit_wraparound_unwraps() {
        let mut unwrapper = SeqNumUnwrapper::new(PCMD_SEQ_MODULUS);
        let indices: Vec<i64> = [254, 255, 0, 1]
            .iter()
            .map(|&raw| unwrapper.push(raw).index)
            .collect();
        assert_eq!(indices, vec![254, 255, 256, 257]);
        assert_eq!(unwrapper.offset(), 256);
    }

    #[test]
    fn test_16bit_missing_before() {
        let mut unwrapper = SeqNumUnwrapper::new(RTP_SEQ_MODULUS);
        let missing: Vec<i64> = [10, 12, 13]
            .iter()
            .map(|&raw| unwrapper.push(raw).missing_before())
            .collect();
        assert_eq!(missing, vec![0, 1, 0]);
    }

    #[test]
    fn test_gap_across_wrap_is_counted() {
        let mut unwrapper = SeqNumUnwrapper::new(RTP_SEQ_MODULUS);
        unwrapper.push(65534);
        let after = unwrapper.push(2);
        assert_eq!(after.index, 65538);
        assert_eq!(after.delta, Some(4));
        assert_eq!(after.missing_before(), 3);
    }

    #[test]
    fn test_small_backward_jump_is_not_a_wrap() {
        let mut unwrapper = SeqNumUnwrapper::new(RTP_SEQ_MODULUS);
        unwrapper.push(500);
        let reordered = unwrapper.push(498);
        assert_eq!(reordered.index, 498);
        assert_eq!(reordered.missing_before(), 0);
        assert_eq!(unwrapper.offset(), 0);
    }

    #[test]
    fn test_offset_accumulates_over_several_wraps() {
        let mut unwrapper = SeqNumUnwrapper::new(PCMD_SEQ_MODULUS);
        let mut last = 0;
        for _ in 0..3 {
            for raw in (0..256).step_by(64) {
                last = unwrapper.push(raw).index;
            }
        }
        assert_eq!(unwrapper.offset(), 512);
        assert_eq!(last, 512 + 192);
    }

    #[test]
    fn test_drop_run_reported_on_next_kept_item() {
        let mut counter = DropRunCounter::default();
        let reported: Vec<u64> = [50, 0, 0, 40]
            .iter()
            .map(|&bytes: &i64| counter.push(bytes == 0))
            .collect();
        assert_eq!(reported, vec![0, 0, 0, 2]);
    }

    #[test]
    fn test_reference_time_keeps_first_nonzero() {
        let mut reference = ReferenceTime::default();
        assert_eq!(reference.capture(0), 0);
        assert_eq!(reference.capture(2_000_000), 2_000_000);
        assert_eq!(reference.capture(3_000_000), 2_000_000);
        assert!((reference.elapsed_s(3_500_000) - 1.5).abs() < 1e-12);
    }
}

// src/data_analysis/sequence.rs
