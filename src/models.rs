//! Core data structures passed through the ingestion pipeline.
//!
//! A [`FileJob`] is produced by the directory scanner, consumed by exactly one
//! worker, and answered by exactly one [`ProcessResult`]. [`SensorReading`] is
//! the unit handed to the persistence layer.

use crate::error::Error;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// A single validated sensor measurement
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub timestamp: DateTime<Utc>,
    pub sensor_name: String,
    pub value: f64,
}

impl SensorReading {
    pub fn new(timestamp: DateTime<Utc>, sensor_name: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp,
            sensor_name: sensor_name.into(),
            value,
        }
    }
}

/// A CSV file scheduled for ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    pub path: PathBuf,
    pub file_name: String,
}

impl FileJob {
    pub fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, file_name }
    }
}

/// Outcome of processing one file
///
/// `record_count` counts rows that parsed successfully, independent of how
/// many of them the store ultimately accepted.
#[derive(Debug)]
pub struct ProcessResult {
    pub path: PathBuf,
    pub file_name: String,
    pub record_count: usize,
    pub error_count: usize,
    pub duration: Duration,
    pub error: Option<Error>,
}

impl ProcessResult {
    /// Start a result for a job; counts are filled in as processing advances
    pub fn for_job(job: &FileJob) -> Self {
        Self {
            path: job.path.clone(),
            file_name: job.file_name.clone(),
            record_count: 0,
            error_count: 0,
            duration: Duration::ZERO,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
