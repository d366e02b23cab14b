//! Error handling for sensor data import operations.
//!
//! File-level and fatal failures are represented by [`Error`]. Row-level parse
//! failures live in [`crate::app::services::record_parser::RowError`] and store
//! failures in [`crate::app::services::persistence::StoreError`], because
//! neither of them ever aborts a file on its own.

use crate::app::services::persistence::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the sensor importer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for directory scanning, file processing and persistence
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV structure could not be read
    #[error("failed to read CSV '{file}': {source}")]
    CsvParsing {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// File contained no rows at all
    #[error("empty CSV file: {file}")]
    EmptyFile { file: String },

    /// Scan directory does not exist
    #[error("directory does not exist: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("failed to parse config file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Database connection or statement failure
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: sqlx::Error,
    },

    /// Readings could not be persisted at all
    #[error("failed to insert data: {message}")]
    Persistence {
        message: String,
        #[source]
        source: StoreError,
    },

    /// A processing task could not complete
    #[error("Processing failed for file {file}: {reason}")]
    ProcessingFailed { file: String, reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error for a file
    pub fn csv_parsing(file: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvParsing {
            file: file.into(),
            source,
        }
    }

    /// Create an empty file error
    pub fn empty_file(file: impl Into<String>) -> Self {
        Self::EmptyFile { file: file.into() }
    }

    /// Create a missing directory error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a database error with context
    pub fn database(message: impl Into<String>, source: sqlx::Error) -> Self {
        Self::Database {
            message: message.into(),
            source,
        }
    }

    /// Create a persistence error with context
    pub fn persistence(message: impl Into<String>, source: StoreError) -> Self {
        Self::Persistence {
            message: message.into(),
            source,
        }
    }

    /// Create a processing failure for a file
    pub fn processing_failed(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_message_wraps_store_error() {
        let error = Error::persistence(
            "failed to insert any records",
            StoreError::Conflict("duplicate".to_string()),
        );
        assert_eq!(
            error.to_string(),
            "failed to insert data: failed to insert any records"
        );
    }

    #[test]
    fn test_error_messages() {
        let error = Error::directory_not_found("/data/in");
        assert_eq!(error.to_string(), "directory does not exist: /data/in");

        let error = Error::empty_file("readings.csv");
        assert_eq!(error.to_string(), "empty CSV file: readings.csv");
    }
}
