//! Command-line argument definitions for the sensor importer
//!
//! This module defines the CLI interface using the clap derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Import sensor readings from CSV files into a relational database
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sensor-importer",
    version,
    about = "Import sensor readings from CSV files into a relational database",
    long_about = "Scans a directory for CSV files of sensor readings (timestamp, sensor name, value) \
                  and imports them into SQLite or PostgreSQL using a pool of parallel workers. \
                  Malformed rows are logged and skipped without aborting the file."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (defaults to ./config.yaml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Import every CSV file in a directory
    Scan(ScanArgs),
    /// Test the database connection
    Connect,
    /// Create the sensor table and its unique index
    Migrate,
    /// Show database statistics
    Info,
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Directory containing the CSV files (not searched recursively)
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// Number of parallel workers (default: CPU count, at most 8)
    #[arg(short = 'j', long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Number of readings per batch insert
    #[arg(long = "batch-size", value_name = "N")]
    pub batch_size: Option<usize>,

    /// Show a progress bar while files are processed
    #[arg(long = "progress")]
    pub progress: bool,
}

impl Args {
    /// Log level forced by the verbosity flags, if any
    pub fn get_log_level(&self) -> Option<&'static str> {
        if self.quiet {
            Some("error")
        } else {
            match self.verbose {
                0 => None,
                1 => Some("debug"),
                _ => Some("trace"),
            }
        }
    }
}
