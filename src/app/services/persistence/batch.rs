//! Chunked persistence with a per-record fallback
//!
//! Readings are handed to [`SensorStore::batch_insert`] in chunks. When a chunk
//! is rejected, each of its readings is retried on its own so one bad record
//! cannot sink its neighbours. Only a chunk that persisted nothing because of
//! genuine database failures aborts the file; a chunk made entirely of
//! already-stored readings does not.

use super::{SensorStore, StoreError};
use crate::models::SensorReading;
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Counts produced by [`persist_in_chunks`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Readings the store accepted
    pub inserted: usize,
    /// Readings rejected during the per-record fallback
    pub failed: usize,
    /// Subset of `failed` rejected because the key already existed
    pub duplicates: usize,
}

/// Persist `readings` in chunks of `batch_size`
///
/// Later chunks are still attempted after a chunk falls back to per-record
/// inserts. Returns [`Error::Persistence`] as soon as a chunk persists nothing
/// and at least one of its failures was not a duplicate key.
pub async fn persist_in_chunks(
    store: &dyn SensorStore,
    readings: &[SensorReading],
    batch_size: usize,
) -> Result<PersistOutcome> {
    let mut outcome = PersistOutcome::default();

    for chunk in readings.chunks(batch_size.max(1)) {
        match store.batch_insert(chunk).await {
            Ok(()) => outcome.inserted += chunk.len(),
            Err(batch_error) => {
                debug!(
                    "Batch insert of {} records failed ({}), falling back to individual inserts",
                    chunk.len(),
                    batch_error
                );
                let fallback = insert_individually(store, chunk).await;
                outcome.inserted += fallback.outcome.inserted;
                outcome.failed += fallback.outcome.failed;
                outcome.duplicates += fallback.outcome.duplicates;

                if fallback.outcome.inserted == 0 {
                    if let Some(source) = fallback.hard_failure {
                        return Err(Error::persistence("failed to insert any records", source));
                    }
                }
            }
        }
    }

    Ok(outcome)
}

struct Fallback {
    outcome: PersistOutcome,
    /// Last failure that was not a duplicate key
    hard_failure: Option<StoreError>,
}

async fn insert_individually(store: &dyn SensorStore, chunk: &[SensorReading]) -> Fallback {
    let mut fallback = Fallback {
        outcome: PersistOutcome::default(),
        hard_failure: None,
    };

    for reading in chunk {
        match store.insert(reading).await {
            Ok(()) => fallback.outcome.inserted += 1,
            Err(e) => {
                warn!(
                    "Failed to insert record {} at {}: {}",
                    reading.sensor_name,
                    reading.timestamp.to_rfc3339(),
                    e
                );
                fallback.outcome.failed += 1;
                if e.is_conflict() {
                    fallback.outcome.duplicates += 1;
                } else {
                    fallback.hard_failure = Some(e);
                }
            }
        }
    }

    if fallback.outcome.inserted > 0 && fallback.outcome.failed > 0 {
        info!(
            "Inserted {} out of {} records with some errors",
            fallback.outcome.inserted,
            chunk.len()
        );
    } else if fallback.outcome.inserted == 0 && fallback.hard_failure.is_none() {
        info!("All {} records in batch were already stored", chunk.len());
    }

    fallback
}
