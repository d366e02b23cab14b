//! CSV reading and row-level parsing for a single file

use crate::app::services::record_parser::{
    RowError, is_blank_record, is_header_row, parse_record,
};
use crate::models::SensorReading;
use crate::{Error, Result};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

/// Readings extracted from a file together with the rows that were rejected
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub readings: Vec<SensorReading>,
    pub error_count: usize,
}

/// Read every row of a CSV file
///
/// Rows may have differing column counts. A file without any rows yields
/// [`Error::EmptyFile`].
pub fn read_records(path: &Path, file_name: &str) -> Result<Vec<StringRecord>> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("failed to open file {}", path.display()), e))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::csv_parsing(file_name, e))?;

    if records.is_empty() {
        return Err(Error::empty_file(file_name));
    }

    Ok(records)
}

/// Warning line for a rejected row; `row` is 1-based and counts the header
pub fn row_warning(row: usize, file_name: &str, error: &RowError) -> String {
    format!("Row {} in {} has {}", row, file_name, error)
}

/// Parse the rows of one file in order
///
/// The first row is skipped when it looks like a header. Every rejected row is
/// logged with its 1-based position in the file and counted; it never stops
/// the remaining rows from being parsed.
pub fn parse_records(records: &[StringRecord], file_name: &str) -> ParsedFile {
    let mut parsed = ParsedFile::default();

    let skip_header = records.first().is_some_and(is_header_row);
    if skip_header {
        debug!("Skipping header row in {}", file_name);
    }

    for (index, record) in records.iter().enumerate().skip(usize::from(skip_header)) {
        if is_blank_record(record) {
            continue;
        }

        match parse_record(record) {
            Ok(reading) => parsed.readings.push(reading),
            Err(e) => {
                parsed.error_count += 1;
                warn!("{}", row_warning(index + 1, file_name, &e));
            }
        }
    }

    parsed
}
