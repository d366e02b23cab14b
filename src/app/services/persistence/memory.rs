//! In-process store with the same atomicity and uniqueness rules as the
//! database backends.

use super::{SensorStore, StoreError, StoreStats};
use crate::models::SensorReading;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};

type ReadingKey = (DateTime<Utc>, String);

#[derive(Debug, Default)]
pub struct MemoryStore {
    readings: Mutex<BTreeMap<ReadingKey, f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ReadingKey, f64>> {
        self.readings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stored readings ordered by timestamp then sensor name
    pub fn readings(&self) -> Vec<SensorReading> {
        self.lock()
            .iter()
            .map(|((timestamp, name), value)| SensorReading::new(*timestamp, name.clone(), *value))
            .collect()
    }
}

fn conflict(reading: &SensorReading) -> StoreError {
    StoreError::Conflict(format!(
        "{} at {} already exists",
        reading.sensor_name, reading.timestamp
    ))
}

#[async_trait]
impl SensorStore for MemoryStore {
    fn driver_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn batch_insert(&self, readings: &[SensorReading]) -> Result<(), StoreError> {
        let mut stored = self.lock();

        let mut batch_keys = HashSet::with_capacity(readings.len());
        for reading in readings {
            let key = (reading.timestamp, reading.sensor_name.clone());
            if stored.contains_key(&key) || !batch_keys.insert(key) {
                return Err(conflict(reading));
            }
        }

        for reading in readings {
            stored.insert(
                (reading.timestamp, reading.sensor_name.clone()),
                reading.value,
            );
        }
        Ok(())
    }

    async fn insert(&self, reading: &SensorReading) -> Result<(), StoreError> {
        let mut stored = self.lock();
        let key = (reading.timestamp, reading.sensor_name.clone());
        if stored.contains_key(&key) {
            return Err(conflict(reading));
        }
        stored.insert(key, reading.value);
        Ok(())
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        let stored = self.lock();
        let sensors: BTreeSet<&str> = stored.keys().map(|(_, name)| name.as_str()).collect();
        Ok(StoreStats {
            total_records: stored.len() as i64,
            unique_sensors: sensors.len() as i64,
            earliest: stored.keys().next().map(|(timestamp, _)| *timestamp),
            latest: stored.keys().next_back().map(|(timestamp, _)| *timestamp),
        })
    }
}
