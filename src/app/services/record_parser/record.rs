//! Row validation

use super::field_parsers::{parse_timestamp, parse_value};
use crate::constants::MIN_COLUMNS;
use crate::models::SensorReading;
use csv::StringRecord;
use thiserror::Error;

/// Why a data row was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("insufficient columns (expected {}, got {found})", MIN_COLUMNS)]
    InsufficientColumns { found: usize },

    #[error("invalid timestamp format: {value}")]
    InvalidTimestamp { value: String },

    #[error("empty sensor name")]
    EmptySensorName,

    #[error("invalid value: {value}")]
    InvalidValue { value: String },
}

/// Rows with no cells, or a single blank cell, are skipped silently
pub fn is_blank_record(record: &StringRecord) -> bool {
    match record.len() {
        0 => true,
        1 => record.get(0).is_none_or(|cell| cell.trim().is_empty()),
        _ => false,
    }
}

/// Validate one data row
///
/// Columns beyond the third are ignored. Checks run in column order and stop
/// at the first failure.
pub fn parse_record(record: &StringRecord) -> Result<SensorReading, RowError> {
    if record.len() < MIN_COLUMNS {
        return Err(RowError::InsufficientColumns {
            found: record.len(),
        });
    }

    let raw_timestamp = record.get(0).unwrap_or_default().trim();
    let timestamp = parse_timestamp(raw_timestamp).ok_or_else(|| RowError::InvalidTimestamp {
        value: raw_timestamp.to_string(),
    })?;

    let sensor_name = record.get(1).unwrap_or_default().trim();
    if sensor_name.is_empty() {
        return Err(RowError::EmptySensorName);
    }

    let raw_value = record.get(2).unwrap_or_default().trim();
    let value = parse_value(raw_value).ok_or_else(|| RowError::InvalidValue {
        value: raw_value.to_string(),
    })?;

    Ok(SensorReading::new(timestamp, sensor_name, value))
}
