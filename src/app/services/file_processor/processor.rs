//! File processor: one [`FileJob`] in, one [`ProcessResult`] out

use super::reader::{ParsedFile, parse_records, read_records};
use crate::app::services::persistence::{SensorStore, persist_in_chunks};
use crate::constants::DEFAULT_BATCH_SIZE;
use crate::models::{FileJob, ProcessResult};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{error, info, warn};

/// Reads, parses and persists individual CSV files
pub struct FileProcessor {
    store: Arc<dyn SensorStore>,
    batch_size: usize,
}

impl FileProcessor {
    pub fn new(store: Arc<dyn SensorStore>) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the chunk size handed to the store; zero is ignored
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if batch_size > 0 {
            self.batch_size = batch_size;
        }
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Process one file
    ///
    /// Never fails: file-level problems are recorded on the returned result.
    pub async fn process(&self, job: &FileJob) -> ProcessResult {
        let start = Instant::now();
        let mut result = ProcessResult::for_job(job);

        info!("Processing file: {}", job.file_name);

        if let Err(e) = self.ingest(job, &mut result).await {
            error!("Failed to process {}: {}", job.file_name, e);
            result.error = Some(e);
        }

        result.duration = start.elapsed();
        if result.is_success() {
            info!(
                "✓ Completed {}: {} records processed, {} errors in {:?}",
                result.file_name, result.record_count, result.error_count, result.duration
            );
        }

        result
    }

    async fn ingest(&self, job: &FileJob, result: &mut ProcessResult) -> Result<()> {
        let parsed = self.read_and_parse(job).await?;
        result.record_count = parsed.readings.len();
        result.error_count = parsed.error_count;

        if parsed.readings.is_empty() {
            return Ok(());
        }

        let outcome =
            persist_in_chunks(self.store.as_ref(), &parsed.readings, self.batch_size).await?;

        if outcome.inserted < parsed.readings.len() {
            warn!(
                "{}: persisted {} of {} parsed records ({} already stored)",
                job.file_name,
                outcome.inserted,
                parsed.readings.len(),
                outcome.duplicates
            );
        }

        Ok(())
    }

    /// Reading and parsing are blocking work
    async fn read_and_parse(&self, job: &FileJob) -> Result<ParsedFile> {
        let path = job.path.clone();
        let file_name = job.file_name.clone();

        task::spawn_blocking(move || {
            let records = read_records(&path, &file_name)?;
            Ok(parse_records(&records, &file_name))
        })
        .await
        .map_err(|e| Error::processing_failed(&job.file_name, e.to_string()))?
    }
}
