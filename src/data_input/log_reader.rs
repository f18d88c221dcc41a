// src/data_input/log_reader.rs

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::data_input::column_index::ColumnTable;
use crate::data_input::log_line::LogLine;
use crate::error::LogError;

/// Per-record derivation for one log type.
///
/// Implementors own every sequence and every piece of carried state (reference
/// times, unwrap counters). A fresh `Default` value is built for each read, so
/// a refresh never mixes old and new records.
pub trait LogAggregator: Default {
    /// Column names this log type understands.
    const FIELDS: &'static [&'static str];
    /// Short name used in diagnostics.
    const KIND: &'static str;

    fn push_line(&mut self, line: &LogLine<'_>) -> Result<(), LogError>;

    /// Number of accepted records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(b' ')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .trim(Trim::All);
    builder
}

/// Reads the optional `#` title line at the top of a log.
pub fn read_title<R: Read>(input: R) -> std::io::Result<Option<String>> {
    let mut first_line = String::new();
    BufReader::new(input).read_line(&mut first_line)?;
    Ok(first_line
        .strip_prefix('#')
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty()))
}

/// Resolves the column table of `A` from the header of `input`.
pub fn resolve_columns<A: LogAggregator, R: Read>(
    input: R,
    path: &Path,
) -> Result<ColumnTable, LogError> {
    let mut reader = reader_builder().from_reader(input);
    let header = reader.headers().map_err(|source| LogError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    if header.is_empty() || header.iter().all(|token| token.is_empty()) {
        return Err(LogError::MissingHeader(path.to_path_buf()));
    }
    Ok(ColumnTable::resolve(A::FIELDS, header))
}

/// Feeds every data line of `input` through a fresh aggregator.
///
/// The header line is skipped; `columns` must already have been resolved.
pub fn aggregate<A: LogAggregator, R: Read>(
    input: R,
    columns: &ColumnTable,
    path: &Path,
) -> Result<A, LogError> {
    let mut reader = reader_builder().from_reader(input);
    let mut aggregator = A::default();
    let mut record = StringRecord::new();

    loop {
        let has_record = reader
            .read_record(&mut record)
            .map_err(|source| LogError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        if !has_record {
            break;
        }
        let line_number = record.position().map(|pos| pos.line()).unwrap_or(0);
        aggregator.push_line(&LogLine::new(&record, columns, line_number))?;
    }

    Ok(aggregator)
}

/// A log file bound to its column table and its aggregated records.
pub struct IndexedLog<A: LogAggregator> {
    path: PathBuf,
    title: Option<String>,
    columns: ColumnTable,
    data: A,
}

impl<A: LogAggregator> IndexedLog<A> {
    /// Opens `path`, resolves its header and reads every data line.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LogError> {
        let path = path.as_ref().to_path_buf();
        let title = read_title(open_file(&path)?).map_err(|source| LogError::Io {
            path: path.clone(),
            source,
        })?;
        let columns = resolve_columns::<A, _>(open_file(&path)?, &path)?;

        log::debug!(
            "{} '{}': {} of {} known columns found",
            A::KIND,
            path.display(),
            columns.resolved_count(),
            A::FIELDS.len()
        );
        let missing = columns.unresolved();
        if !missing.is_empty() {
            log::debug!("  not in header (defaults to 0): {}", missing.join(", "));
        }

        let mut log = IndexedLog {
            path,
            title,
            columns,
            data: A::default(),
        };
        log.refresh()?;
        Ok(log)
    }

    /// Re-reads the file from scratch and replaces the records wholesale.
    ///
    /// The column table resolved at open time is kept.
    pub fn refresh(&mut self) -> Result<(), LogError> {
        let data = aggregate::<A, _>(open_file(&self.path)?, &self.columns, &self.path)?;
        log::info!(
            "{} '{}': {} records",
            A::KIND,
            self.path.display(),
            data.len()
        );
        self.data = data;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Title from a leading `#` line, falling back to the file name.
    pub fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Input file stem, used to name output images.
    pub fn root_name(&self) -> String {
        self.path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    }

    pub fn columns(&self) -> &ColumnTable {
        &self.columns
    }

    pub fn data(&self) -> &A {
        &self.data
    }
}

fn open_file(path: &Path) -> Result<File, LogError> {
    File::open(path).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })
}


// src/data_input/log_reader.rs
