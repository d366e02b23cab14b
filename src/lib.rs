//! Sensor Importer Library
//!
//! Imports sensor readings from directories of CSV files into a relational
//! database, processing many files concurrently.
//!
//! This library provides tools for:
//! - Discovering CSV files in a directory (non-recursively)
//! - Parsing rows with header detection and several timestamp layouts
//! - Tolerating malformed rows without aborting the file
//! - Persisting readings in batches with a per-record fallback
//! - Distributing files across a fixed pool of workers
//! - Summarising the outcome of every file

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Core application modules
pub mod app {
    pub mod services {
        pub mod directory_scanner;
        pub mod file_processor;
        pub mod persistence;
        pub mod record_parser;
        pub mod summary;
        pub mod worker_pool;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use models::{FileJob, ProcessResult, SensorReading};
