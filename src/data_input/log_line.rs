// src/data_input/log_line.rs

use csv::StringRecord;

use crate::data_input::column_index::ColumnTable;
use crate::error::{LogError, NumericKind};

/// Value returned for any field that cannot be located in a line.
pub const DEFAULT_FIELD_VALUE: &str = "0";

/// One data line of a log, viewed through the column table of its file.
pub struct LogLine<'a> {
    record: &'a StringRecord,
    columns: &'a ColumnTable,
    line_number: u64,
}

impl<'a> LogLine<'a> {
    pub fn new(record: &'a StringRecord, columns: &'a ColumnTable, line_number: u64) -> Self {
        LogLine {
            record,
            columns,
            line_number,
        }
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn columns(&self) -> &ColumnTable {
        self.columns
    }

    /// Raw token for `field`, or `"0"` when the column is unresolved or the
    /// line is too short to hold it.
    pub fn get_str(&self, field: &str) -> &'a str {
        self.columns
            .index_of(field)
            .and_then(|index| self.record.get(index))
            .map(str::trim)
            .unwrap_or(DEFAULT_FIELD_VALUE)
    }

    pub fn get_int(&self, field: &'static str) -> Result<i64, LogError> {
        let value = self.get_str(field);
        value.parse::<i64>().map_err(|_| LogError::Parse {
            line: self.line_number,
            field,
            value: value.to_string(),
            kind: NumericKind::Integer,
        })
    }

    pub fn get_float(&self, field: &'static str) -> Result<f64, LogError> {
        let value = self.get_str(field);
        value.parse::<f64>().map_err(|_| LogError::Parse {
            line: self.line_number,
            field,
            value: value.to_string(),
            kind: NumericKind::Float,
        })
    }
}


// src/data_input/log_line.rs
