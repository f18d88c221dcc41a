// src/data_input/column_index.rs

use std::collections::HashMap;

use csv::StringRecord;

/// Maps each known field name of a log type to its position in a data line.
///
/// Built once from the header line of a file and never modified afterwards.
/// Fields missing from the header stay unresolved (`None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTable {
    indices: HashMap<&'static str, Option<usize>>,
}

impl ColumnTable {
    /// Resolves `known_fields` against the tokens of a header record.
    ///
    /// Unknown header tokens are ignored. If a name appears twice the last
    /// position wins, matching a left-to-right scan.
    pub fn resolve(known_fields: &[&'static str], header: &StringRecord) -> Self {
        let mut indices: HashMap<&'static str, Option<usize>> =
            known_fields.iter().map(|&name| (name, None)).collect();

        for (position, token) in header.iter().enumerate() {
            let token = token.trim();
            if let Some(slot) = indices.get_mut(token) {
                *slot = Some(position);
            }
        }

        ColumnTable { indices }
    }

    /// Same as [`ColumnTable::resolve`] but from a raw header line.
    pub fn resolve_line(known_fields: &[&'static str], header_line: &str) -> Self {
        let header: StringRecord = header_line.trim_end().split(' ').collect();
        Self::resolve(known_fields, &header)
    }

    /// Position of `field` in a data line, if the header carried it.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.indices.get(field).copied().flatten()
    }

    pub fn is_resolved(&self, field: &str) -> bool {
        self.index_of(field).is_some()
    }

    /// Known fields that the header did not provide, sorted by name.
    pub fn unresolved(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = self
            .indices
            .iter()
            .filter(|(_, index)| index.is_none())
            .map(|(&name, _)| name)
            .collect();
        missing.sort_unstable();
        missing
    }

    pub fn resolved_count(&self) -> usize {
        self.indices.values().filter(|index| index.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: [&str; 4] = ["recvTimestamp", "rtpTimestamp", "rtpSeqNum", "bytes"];

    #[test]
    fn test_resolves_known_columns_by_position() {
        let table = ColumnTable::resolve_line(&FIELDS, "rtpSeqNum recvTimestamp bytes\n");
        assert_eq!(table.index_of("rtpSeqNum"), Some(0));
        assert_eq!(table.index_of("recvTimestamp"), Some(1));
        assert_eq!(table.index_of("bytes"), Some(2));
    }

    #[test]
    fn test_missing_column_stays_unresolved() {
        let table = ColumnTable::resolve_line(&FIELDS, "recvTimestamp bytes");
        assert_eq!(table.index_of("rtpTimestamp"), None);
        assert!(!table.is_resolved("rtpSeqNum"));
        assert_eq!(table.unresolved(), vec!["rtpSeqNum", "rtpTimestamp"]);
        assert_eq!(table.resolved_count(), 2);
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let table = ColumnTable::resolve_line(&FIELDS, "foo bytes bar");
        assert_eq!(table.index_of("bytes"), Some(1));
        assert_eq!(table.index_of("foo"), None);
        assert_eq!(table.resolved_count(), 1);
    }

    #[test]
    fn test_tokens_are_trimmed() {
        let table = ColumnTable::resolve_line(&FIELDS, "recvTimestamp bytes\r\n");
        assert_eq!(table.index_of("bytes"), Some(1));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let header = "bytes rtpSeqNum unknown recvTimestamp";
        let first = ColumnTable::resolve_line(&FIELDS, header);
        let second = ColumnTable::resolve_line(&FIELDS, header);
        assert_eq!(first, second);
    }
}

// src/data_input/column_index.rs
