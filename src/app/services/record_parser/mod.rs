//! Record parser for sensor CSV rows
//!
//! Turns one raw CSV row into a validated [`SensorReading`](crate::models::SensorReading)
//! or a classified [`RowError`]. The parser is pure: no I/O, no shared state.
//!
//! - [`header`] - first-row header detection
//! - [`record`] - row validation and [`RowError`]
//! - [`field_parsers`] - timestamp and value parsing

pub mod field_parsers;
pub mod header;
pub mod record;

#[cfg(test)]
pub mod tests;

pub use field_parsers::{is_rfc3339, parse_timestamp, parse_value};
pub use header::is_header_row;
pub use record::{RowError, is_blank_record, parse_record};
