//! Tests for the sensor row parser

use csv::StringRecord;

mod field_parser_tests;

/// Build a record from string cells
pub fn row(cells: &[&str]) -> StringRecord {
    StringRecord::from(cells.to_vec())
}
