//! Tests for CSV reading and row parsing

use super::super::reader::{parse_records, read_records, row_warning};
use crate::app::services::record_parser::parse_record;
use crate::Error;
use csv::StringRecord;
use tempfile::TempDir;

fn records(rows: &[&[&str]]) -> Vec<StringRecord> {
    rows.iter().map(|cells| StringRecord::from(cells.to_vec())).collect()
}

#[test]
fn test_header_then_data() {
    let rows = records(&[
        &["timestamp", "sensor_name", "value"],
        &["2024-01-15T10:30:00Z", "temp_01", "23.5"],
        &["2024-01-15T10:31:00Z", "temp_01", "23.7"],
    ]);

    let parsed = parse_records(&rows, "a.csv");
    assert_eq!(parsed.readings.len(), 2);
    assert_eq!(parsed.error_count, 0);
}

#[test]
fn test_data_without_header() {
    let rows = records(&[
        &["2024-01-15T10:30:00Z", "temp_01", "23.5"],
        &["2024-01-15T10:31:00Z", "temp_01", "23.7"],
    ]);

    let parsed = parse_records(&rows, "a.csv");
    assert_eq!(parsed.readings.len(), 2);
}

#[test]
fn test_zone_less_first_row_is_dropped_as_header() {
    let rows = records(&[
        &["2024-01-15 10:30:00", "temp_01", "23.5"],
        &["2024-01-15 10:31:00", "temp_01", "23.7"],
    ]);

    let parsed = parse_records(&rows, "a.csv");
    assert_eq!(parsed.readings.len(), 1);
    assert_eq!(parsed.readings[0].value, 23.7);
}

#[test]
fn test_bad_rows_are_counted_and_skipped() {
    let rows = records(&[
        &["timestamp", "sensor_name", "value"],
        &["bad_ts", "s", "1"],
        &["2024-01-15T10:30:00Z", "", "1"],
        &["2024-01-15T10:30:00Z", "s", "notanumber"],
    ]);

    let parsed = parse_records(&rows, "a.csv");
    assert_eq!(parsed.readings.len(), 0);
    assert_eq!(parsed.error_count, 3);
}

#[test]
fn test_blank_rows_are_not_errors() {
    let rows = records(&[
        &["2024-01-15T10:30:00Z", "temp_01", "23.5"],
        &["   "],
        &[],
        &["2024-01-15T10:31:00Z", "temp_01"],
    ]);

    let parsed = parse_records(&rows, "a.csv");
    assert_eq!(parsed.readings.len(), 1);
    assert_eq!(parsed.error_count, 1);
}

#[test]
fn test_short_first_row_is_an_error_not_a_header() {
    let rows = records(&[
        &["timestamp", "sensor_name"],
        &["2024-01-15T10:30:00Z", "temp_01", "23.5"],
    ]);

    let parsed = parse_records(&rows, "a.csv");
    assert_eq!(parsed.readings.len(), 1);
    assert_eq!(parsed.error_count, 1);
}

#[test]
fn test_read_flexible_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mixed.csv");
    std::fs::write(
        &path,
        "timestamp,sensor_name,value\n2024-01-15T10:30:00Z,temp_01\n2024-01-15T10:31:00Z,temp_01,1,extra\n",
    )
    .unwrap();

    let rows = read_records(&path, "mixed.csv").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].len(), 2);
    assert_eq!(rows[2].len(), 4);
}

#[test]
fn test_read_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.csv");
    std::fs::write(&path, "").unwrap();

    assert!(matches!(
        read_records(&path, "empty.csv"),
        Err(Error::EmptyFile { .. })
    ));
}

#[test]
fn test_read_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("gone.csv");

    assert!(matches!(
        read_records(&path, "gone.csv"),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_read_invalid_utf8() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("binary.csv");
    std::fs::write(&path, [0xff, 0xfe, b',', b'a', b',', b'b', b'\n']).unwrap();

    assert!(matches!(
        read_records(&path, "binary.csv"),
        Err(Error::CsvParsing { .. })
    ));
}

#[test]
fn test_row_warnings_name_row_file_and_raw_value() {
    let rows = records(&[
        &["timestamp", "sensor_name", "value"],
        &["bad_ts", "s", "1"],
        &["2024-01-15T10:30:00Z", "", "1"],
        &["2024-01-15T10:30:00Z", "s", "notanumber"],
        &["2024-01-15T10:30:00Z", "s"],
    ]);

    let warnings: Vec<String> = rows
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, row)| {
            parse_record(row)
                .err()
                .map(|e| row_warning(index + 1, "readings.csv", &e))
        })
        .collect();

    assert_eq!(
        warnings,
        vec![
            "Row 2 in readings.csv has invalid timestamp format: bad_ts",
            "Row 3 in readings.csv has empty sensor name",
            "Row 4 in readings.csv has invalid value: notanumber",
            "Row 5 in readings.csv has insufficient columns (expected 3, got 2)",
        ]
    );
}
