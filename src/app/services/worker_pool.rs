//! Fixed-size worker pool for file jobs
//!
//! Jobs travel over a bounded crossbeam queue that is filled and closed before
//! any worker starts; results come back over a tokio channel. A supervisor task
//! owns the workers and closes the results channel once the last one exits, so
//! a consumer simply reads until `recv` returns `None`.

use crate::app::services::file_processor::FileProcessor;
use crate::config::default_worker_count;
use crate::models::{FileJob, ProcessResult};
use crate::Error;
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error};

pub struct WorkerPool {
    processor: Arc<FileProcessor>,
    workers: usize,
}

impl WorkerPool {
    /// Pool sized to the available parallelism, capped at eight workers
    pub fn new(processor: FileProcessor) -> Self {
        Self {
            processor: Arc::new(processor),
            workers: default_worker_count(),
        }
    }

    /// Override the worker count; zero is ignored
    pub fn with_workers(mut self, workers: usize) -> Self {
        if workers > 0 {
            self.workers = workers;
        }
        self
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Start processing `jobs` and return the stream of results
    ///
    /// Exactly one result is produced per job. Must be called from within a
    /// tokio runtime.
    pub fn start(&self, jobs: Vec<FileJob>) -> mpsc::Receiver<ProcessResult> {
        let capacity = jobs.len().max(1);
        let (job_tx, job_rx) = crossbeam_channel::bounded(capacity);
        for job in jobs {
            // Capacity covers every job and the receiver is alive
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        let (result_tx, result_rx) = mpsc::channel(capacity);
        let worker_count = self.workers.min(capacity);
        let processor = self.processor.clone();

        tokio::spawn(async move {
            let mut workers = JoinSet::new();
            for worker_id in 0..worker_count {
                workers.spawn(run_worker(
                    worker_id,
                    processor.clone(),
                    job_rx.clone(),
                    result_tx.clone(),
                ));
            }
            drop(job_rx);
            drop(result_tx);

            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(processed) => debug!("Worker finished after {} files", processed),
                    Err(e) => error!("Worker task failed: {}", e),
                }
            }
            debug!("All workers finished");
        });

        result_rx
    }
}

/// Take jobs until the queue is drained, returning the number processed
async fn run_worker(
    worker_id: usize,
    processor: Arc<FileProcessor>,
    jobs: Receiver<FileJob>,
    results: mpsc::Sender<ProcessResult>,
) -> usize {
    let mut processed = 0;

    loop {
        let job = match jobs.try_recv() {
            Ok(job) => job,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
        };
        debug!("Worker {} picked up {}", worker_id, job.file_name);

        let result = process_isolated(processor.clone(), job).await;
        processed += 1;

        if results.send(result).await.is_err() {
            debug!("Worker {} stopping: results receiver dropped", worker_id);
            break;
        }
    }

    processed
}

/// Run one job on its own task so a panic becomes a failed result
async fn process_isolated(processor: Arc<FileProcessor>, job: FileJob) -> ProcessResult {
    let mut fallback = ProcessResult::for_job(&job);

    match tokio::spawn(async move { processor.process(&job).await }).await {
        Ok(result) => result,
        Err(e) => {
            error!("Processing {} aborted: {}", fallback.file_name, e);
            fallback.error = Some(Error::processing_failed(
                fallback.file_name.clone(),
                e.to_string(),
            ));
            fallback
        }
    }
}
