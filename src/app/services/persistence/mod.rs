//! Persistence layer for sensor readings
//!
//! Every backend implements [`SensorStore`], which offers an all-or-nothing
//! [`SensorStore::batch_insert`] and a single-row [`SensorStore::insert`]. The
//! pipeline only ever holds an `Arc<dyn SensorStore>`, created by [`connect`].
//!
//! - [`sqlite`] - SQLite store backed by a WAL-mode connection pool
//! - [`postgres`] - PostgreSQL store
//! - [`memory`] - in-process store with the same uniqueness rules
//! - [`batch`] - chunked persistence with per-record fallback

pub mod batch;
pub mod memory;
pub mod postgres;
pub mod sqlite;

#[cfg(test)]
pub mod tests;

use crate::config::{DatabaseConfig, DatabaseDriver};
use crate::models::SensorReading;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub use batch::{PersistOutcome, persist_in_chunks};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

/// Failure reported by a store for a single statement
#[derive(Error, Debug)]
pub enum StoreError {
    /// The (timestamp, sensor_name) key already exists
    #[error("duplicate reading: {0}")]
    Conflict(String),

    /// Any other database failure
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Classify an sqlx error, separating unique-key violations
    pub fn from_sqlx(error: sqlx::Error) -> Self {
        let conflict = error
            .as_database_error()
            .filter(|db_error| db_error.is_unique_violation())
            .map(|db_error| db_error.message().to_string());

        match conflict {
            Some(message) => Self::Conflict(message),
            None => Self::Database(error),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::from_sqlx(error)
    }
}

/// Aggregate figures over the persisted readings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreStats {
    pub total_records: i64,
    pub unique_sensors: i64,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

/// Snapshot of a connection pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub open: u32,
    pub idle: usize,
}

/// Storage backend for sensor readings
#[async_trait]
pub trait SensorStore: Send + Sync {
    /// Short backend name used in log lines
    fn driver_name(&self) -> &'static str;

    /// Check that the backend is reachable
    async fn ping(&self) -> std::result::Result<(), StoreError>;

    /// Create the sensor table and its unique index when missing
    async fn ensure_schema(&self) -> std::result::Result<(), StoreError>;

    /// Insert all readings or none of them
    async fn batch_insert(&self, readings: &[SensorReading])
    -> std::result::Result<(), StoreError>;

    /// Insert a single reading
    async fn insert(&self, reading: &SensorReading) -> std::result::Result<(), StoreError>;

    async fn stats(&self) -> std::result::Result<StoreStats, StoreError>;

    /// Connection pool usage, for backends that pool connections
    fn pool_status(&self) -> Option<PoolStatus> {
        None
    }

    /// Release pooled connections
    async fn close(&self) {}
}

/// Convert the configured lifetime in seconds, where 0 disables recycling
pub(crate) fn max_lifetime(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

/// Open the configured backend
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn SensorStore>> {
    let store: Arc<dyn SensorStore> = match config.driver {
        DatabaseDriver::Sqlite => {
            Arc::new(SqliteStore::connect(&config.sqlite, &config.connection_pool).await?)
        }
        DatabaseDriver::Postgres => {
            Arc::new(PostgresStore::connect(&config.postgres, &config.connection_pool).await?)
        }
    };

    store.ping().await.map_err(|e| match e {
        StoreError::Database(source) => {
            Error::database(format!("failed to reach {}", config.describe()), source)
        }
        StoreError::Conflict(message) => Error::configuration(message),
    })?;

    info!(
        "Connected to {} database ({})",
        store.driver_name(),
        config.describe()
    );
    Ok(store)
}
