//! Test doubles for the persistence layer
//!
//! [`ScriptedStore`] wraps a [`MemoryStore`] and injects failures so the
//! fallback path can be driven without a database.

use super::{MemoryStore, SensorStore, StoreError, StoreStats};
use crate::models::SensorReading;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};


/// Store whose failures are chosen up front
#[derive(Default)]
pub struct ScriptedStore {
    pub inner: MemoryStore,
    /// Every batch insert fails with a database error
    pub reject_batches: bool,
    /// Every single-row insert fails with a database error
    pub offline: bool,
    /// Single-row inserts for these sensors fail with a database error
    pub broken_sensors: HashSet<String>,
    pub batch_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn rejecting_batches() -> Self {
        Self {
            reject_batches: true,
            ..Default::default()
        }
    }

    pub fn offline() -> Self {
        Self {
            reject_batches: true,
            offline: true,
            ..Default::default()
        }
    }

    pub fn with_broken_sensor(mut self, name: &str) -> Self {
        self.broken_sensors.insert(name.to_string());
        self
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

fn database_failure() -> StoreError {
    StoreError::Database(sqlx::Error::PoolTimedOut)
}

#[async_trait]
impl SensorStore for ScriptedStore {
    fn driver_name(&self) -> &'static str {
        "scripted"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn batch_insert(&self, readings: &[SensorReading]) -> Result<(), StoreError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_batches {
            return Err(database_failure());
        }
        self.inner.batch_insert(readings).await
    }

    async fn insert(&self, reading: &SensorReading) -> Result<(), StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline || self.broken_sensors.contains(&reading.sensor_name) {
            return Err(database_failure());
        }
        self.inner.insert(reading).await
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        self.inner.stats().await
    }
}

/// `count` readings for one sensor, one second apart
pub fn sample_readings(sensor: &str, count: usize) -> Vec<SensorReading> {
    let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            SensorReading::new(
                start + chrono::Duration::seconds(i as i64),
                sensor,
                i as f64 * 0.5,
            )
        })
        .collect()
}
