//! Configuration management and validation.
//!
//! Configuration is read from a YAML file (`config.yaml` by default) with
//! sections for the database connection, schema bootstrap, logging and the
//! scanner. Every field has a default so partial files are accepted.

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONFIG_PATH, DEFAULT_CONN_MAX_LIFETIME_SECS, DEFAULT_LOG_FILE,
    DEFAULT_LOG_LEVEL, DEFAULT_MAX_IDLE_CONNS, DEFAULT_MAX_OPEN_CONNS, DEFAULT_POSTGRES_PORT,
    DEFAULT_SQLITE_PATH, LOG_LEVELS, MAX_DEFAULT_WORKERS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supported database backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    #[default]
    Sqlite,
    Postgres,
}

impl fmt::Display for DatabaseDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseDriver::Sqlite => write!(f, "sqlite"),
            DatabaseDriver::Postgres => write!(f, "postgres"),
        }
    }
}

/// SQLite specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
    pub path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SQLITE_PATH),
        }
    }
}

/// PostgreSQL specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    /// One of disable, allow, prefer, require, verify-ca, verify-full
    pub sslmode: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_POSTGRES_PORT,
            user: String::new(),
            password: String::new(),
            dbname: String::new(),
            sslmode: "prefer".to_string(),
        }
    }
}

/// Connection pool limits, enforced by the pool rather than the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
    /// Seconds before a connection is recycled (0 = never)
    pub conn_max_lifetime: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            max_open_conns: DEFAULT_MAX_OPEN_CONNS,
            conn_max_lifetime: DEFAULT_CONN_MAX_LIFETIME_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    pub sqlite: SqliteConfig,
    pub postgres: PostgresConfig,
    pub connection_pool: PoolConfig,
}

impl DatabaseConfig {
    /// In-place SQLite configuration pointing at `path`
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            driver: DatabaseDriver::Sqlite,
            sqlite: SqliteConfig { path: path.into() },
            ..Default::default()
        }
    }

    /// Human-readable connection target with credentials removed
    pub fn describe(&self) -> String {
        match self.driver {
            DatabaseDriver::Sqlite => format!("sqlite://{}", self.sqlite.path.display()),
            DatabaseDriver::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.postgres.user, self.postgres.host, self.postgres.port, self.postgres.dbname
            ),
        }
    }
}

/// Schema bootstrap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Create the sensor table and its unique index before scanning
    pub auto_migrate: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self { auto_migrate: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_file: PathBuf,
    pub log_to_console: bool,
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_to_console: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Number of parallel workers (0 = automatic)
    pub workers: usize,

    /// Readings per batch insert
    pub batch_size: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl ScannerConfig {
    /// Worker count after applying the automatic default
    pub fn resolved_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            default_worker_count()
        }
    }
}

/// Default pool size: available parallelism capped at [`MAX_DEFAULT_WORKERS`]
pub fn default_worker_count() -> usize {
    num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS)
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub migration: MigrationConfig,
    pub logging: LoggingConfig,
    pub scanner: ScannerConfig,
}

impl Config {
    /// Default configuration file location
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_PATH)
    }

    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("failed to read config file {}", path.display()),
                e,
            )
        })?;

        let config = Self::from_yaml_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path, or from the default path if it exists.
    ///
    /// Returns the configuration and whether a file was actually read.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, bool)> {
        match explicit {
            Some(path) => Ok((Self::load(path)?, true)),
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    Ok((Self::load(&default_path)?, true))
                } else {
                    Ok((Self::default(), false))
                }
            }
        }
    }

    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        match self.database.driver {
            DatabaseDriver::Sqlite => {
                if self.database.sqlite.path.as_os_str().is_empty() {
                    return Err(Error::configuration("sqlite path is required"));
                }
            }
            DatabaseDriver::Postgres => {
                let pg = &self.database.postgres;
                if pg.host.is_empty() {
                    return Err(Error::configuration("postgres host is required"));
                }
                if pg.user.is_empty() {
                    return Err(Error::configuration("postgres user is required"));
                }
                if pg.dbname.is_empty() {
                    return Err(Error::configuration("postgres database name is required"));
                }
            }
        }

        if self.database.connection_pool.max_open_conns == 0 {
            return Err(Error::configuration(
                "connection_pool.max_open_conns must be greater than zero",
            ));
        }

        if self.scanner.batch_size == 0 {
            return Err(Error::configuration(
                "scanner.batch_size must be greater than zero",
            ));
        }

        let level = self.logging.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::configuration(format!(
                "unknown log level '{}' (expected one of {})",
                self.logging.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    /// Override the worker count; non-positive values are ignored
    pub fn with_workers(mut self, workers: usize) -> Self {
        if workers > 0 {
            self.scanner.workers = workers;
        }
        self
    }

    /// Override the batch size; non-positive values are ignored
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if batch_size > 0 {
            self.scanner.batch_size = batch_size;
        }
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.log_level = level.into();
        self
    }
}
