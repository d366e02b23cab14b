//! Per-file ingestion
//!
//! - [`reader`] - reads a CSV file and turns its rows into readings
//! - [`processor`] - drives reading, parsing and persistence for one job

pub mod processor;
pub mod reader;

#[cfg(test)]
pub mod tests;

pub use processor::FileProcessor;
pub use reader::{ParsedFile, parse_records, read_records, row_warning};
