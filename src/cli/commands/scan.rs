//! Scan command: import every CSV file of a directory

use super::shared::create_progress_bar;
use crate::app::services::directory_scanner::scan_directory;
use crate::app::services::file_processor::FileProcessor;
use crate::app::services::persistence::{self, SensorStore};
use crate::app::services::summary::ScanSummary;
use crate::app::services::worker_pool::WorkerPool;
use crate::cli::args::ScanArgs;
use crate::config::Config;
use crate::models::ProcessResult;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Run the scan command against the configured database
pub async fn run_scan(config: Config, args: &ScanArgs) -> Result<ScanSummary> {
    let config = config
        .with_workers(args.workers.unwrap_or(0))
        .with_batch_size(args.batch_size.unwrap_or(0));

    info!("Scanning directory: {}", args.directory.display());

    let store = persistence::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    if config.migration.auto_migrate {
        store
            .ensure_schema()
            .await
            .context("Failed to prepare database schema")?;
    }

    let summary = import_directory(store.clone(), &config, &args.directory, args.progress).await;
    store.close().await;
    let summary = summary?;

    info!("✓ Directory scan completed successfully");
    Ok(summary)
}

/// Import a directory into `store`, logging and returning the summary
///
/// Only setup problems (missing directory) are errors; per-file failures are
/// reported in the summary.
pub async fn import_directory(
    store: Arc<dyn SensorStore>,
    config: &Config,
    directory: &Path,
    show_progress: bool,
) -> Result<ScanSummary> {
    let jobs = scan_directory(directory)
        .with_context(|| format!("Failed to scan {}", directory.display()))?;

    if jobs.is_empty() {
        info!("No CSV files found in the directory");
        return Ok(ScanSummary::new());
    }

    info!("Found {} CSV file(s) to process", jobs.len());

    let processor = FileProcessor::new(store).with_batch_size(config.scanner.batch_size);
    let pool = WorkerPool::new(processor).with_workers(config.scanner.resolved_workers());
    info!("Processing with {} parallel workers", pool.worker_count());

    let progress = show_progress.then(|| create_progress_bar(jobs.len() as u64, "processed"));
    let results = pool.start(jobs);
    let summary = match progress {
        Some(pb) => collect_with_progress(results, pb).await,
        None => ScanSummary::collect(results).await,
    };

    summary.log();
    Ok(summary)
}

async fn collect_with_progress(
    mut results: mpsc::Receiver<ProcessResult>,
    pb: ProgressBar,
) -> ScanSummary {
    let mut summary = ScanSummary::new();
    while let Some(result) = results.recv().await {
        pb.set_message(result.file_name.clone());
        summary.record(result);
        pb.inc(1);
    }
    pb.finish_with_message("done");
    summary
}
