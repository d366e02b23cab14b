//! Application constants for the sensor importer
//!
//! Default values, file format markers and database names used throughout
//! the ingestion pipeline.

// =============================================================================
// Input Format
// =============================================================================

/// Extension (compared case-insensitively) of files picked up by a scan
pub const CSV_EXTENSION: &str = "csv";

/// Minimum number of columns in a data row: timestamp, sensor name, value
pub const MIN_COLUMNS: usize = 3;

/// Substrings that mark the first column of a header row
pub const HEADER_KEYWORDS: &[&str] = &["timestamp", "time", "date", "datetime"];

/// Zone-less timestamp layouts tried after RFC 3339, in order, keyed by the
/// byte separating date and time.
///
/// Both are interpreted as UTC. `%.f` accepts an optional fractional part.
pub const NAIVE_TIMESTAMP_LAYOUTS: &[(u8, &str)] = &[
    (b'T', "%Y-%m-%dT%H:%M:%S%.f"),
    (b' ', "%Y-%m-%d %H:%M:%S%.f"),
];

// =============================================================================
// Pipeline Defaults
// =============================================================================

/// Upper bound on the default worker count; the database is usually the bottleneck
pub const MAX_DEFAULT_WORKERS: usize = 8;

/// Number of readings handed to a single batch insert
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Width of the divider lines in the processing summary
pub const SUMMARY_WIDTH: usize = 60;

// =============================================================================
// Configuration Defaults
// =============================================================================

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Log file written next to the working directory
pub const DEFAULT_LOG_FILE: &str = "result.log";

/// Default log level name
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted log level names
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// SQLite database file used when no configuration is present
pub const DEFAULT_SQLITE_PATH: &str = "sensor_data.db";

/// Default PostgreSQL port
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;

/// Default connection pool limits
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 10;
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 5;

/// Default connection lifetime in seconds (0 disables recycling)
pub const DEFAULT_CONN_MAX_LIFETIME_SECS: u64 = 3600;

/// SQLite busy timeout applied to every pooled connection
pub const SQLITE_BUSY_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// Database Schema
// =============================================================================

/// Table holding persisted readings
pub const SENSOR_TABLE: &str = "sensor_data";

/// Unique index over (timestamp, sensor_name)
pub const SENSOR_UNIQUE_INDEX: &str = "idx_timestamp_sensor";
