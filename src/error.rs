// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and aggregating a telemetry log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("'{0}' has no header line")]
    MissingHeader(PathBuf),

    /// Non-numeric content in a field that must be numeric. Fatal for the file.
    #[error("line {line}: field '{field}' expected {kind}, found '{value}'")]
    Parse {
        line: u64,
        field: &'static str,
        value: String,
        kind: NumericKind,
    },

    #[error("'{0}' contains no data lines")]
    Empty(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

impl std::fmt::Display for NumericKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericKind::Integer => write!(f, "an integer"),
            NumericKind::Float => write!(f, "a number"),
        }
    }
}

// src/error.rs
