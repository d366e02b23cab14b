//! Aggregation and reporting of per-file results

use crate::constants::SUMMARY_WIDTH;
use crate::models::ProcessResult;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Per-file line of the report
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Imported {
        record_count: usize,
        error_count: usize,
        duration: Duration,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub file_name: String,
    pub outcome: FileOutcome,
}

/// Totals across every processed file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    /// Parsed records of successful files
    pub total_records: usize,
    /// Row-level errors of successful files
    pub total_errors: usize,
    /// Sum of per-file durations, across all workers
    pub total_duration: Duration,
    pub files: Vec<FileSummary>,
}

impl ScanSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one result into the totals
    pub fn record(&mut self, result: ProcessResult) {
        self.total_files += 1;
        self.total_duration += result.duration;

        let outcome = match result.error {
            Some(error) => {
                self.failed_files += 1;
                FileOutcome::Failed {
                    reason: error.to_string(),
                }
            }
            None => {
                self.successful_files += 1;
                self.total_records += result.record_count;
                self.total_errors += result.error_count;
                FileOutcome::Imported {
                    record_count: result.record_count,
                    error_count: result.error_count,
                    duration: result.duration,
                }
            }
        };

        self.files.push(FileSummary {
            file_name: result.file_name,
            outcome,
        });
    }

    /// Consume results until the channel closes
    pub async fn collect(mut results: mpsc::Receiver<ProcessResult>) -> Self {
        let mut summary = Self::new();
        while let Some(result) = results.recv().await {
            summary.record(result);
        }
        summary
    }

    /// Report lines, per-file entries ordered by file name
    pub fn lines(&self) -> Vec<String> {
        let heavy = "=".repeat(SUMMARY_WIDTH);
        let light = "-".repeat(SUMMARY_WIDTH);

        let mut files: Vec<&FileSummary> = self.files.iter().collect();
        files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        let mut lines = vec![heavy.clone(), "PROCESSING SUMMARY".to_string(), heavy.clone()];
        lines.extend(files.into_iter().map(|file| match &file.outcome {
            FileOutcome::Imported {
                record_count,
                error_count,
                duration,
            } => format!(
                "✅ {}: {} records, {} errors ({:?})",
                file.file_name, record_count, error_count, duration
            ),
            FileOutcome::Failed { reason } => {
                format!("❌ {}: FAILED - {}", file.file_name, reason)
            }
        }));
        lines.push(light);
        lines.push(format!("Total files processed: {}", self.total_files));
        lines.push(format!("Successful: {}", self.successful_files));
        lines.push(format!("Failed: {}", self.failed_files));
        lines.push(format!("Total records imported: {}", self.total_records));
        lines.push(format!("Total parsing errors: {}", self.total_errors));
        lines.push(format!("Total processing time: {:?}", self.total_duration));
        lines.push(heavy);
        lines
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }

    /// Emit the report through the logger
    pub fn log(&self) {
        for line in self.lines() {
            info!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::models::FileJob;
    use std::path::PathBuf;

    fn result(name: &str, records: usize, errors: usize, millis: u64) -> ProcessResult {
        let mut result = ProcessResult::for_job(&FileJob::new(PathBuf::from(name)));
        result.record_count = records;
        result.error_count = errors;
        result.duration = Duration::from_millis(millis);
        result
    }

    #[test]
    fn test_totals() {
        let mut summary = ScanSummary::new();
        summary.record(result("a.csv", 10, 1, 5));
        summary.record(result("b.csv", 4, 0, 5));
        let mut failed = result("c.csv", 7, 2, 10);
        failed.error = Some(Error::empty_file("c.csv"));
        summary.record(failed);

        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.successful_files, 2);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.total_records, 14);
        assert_eq!(summary.total_errors, 1);
        assert_eq!(summary.total_duration, Duration::from_millis(20));
    }

    #[test]
    fn test_render_sorted_by_file_name() {
        let mut summary = ScanSummary::new();
        summary.record(result("zeta.csv", 1, 0, 1));
        let mut failed = result("empty.csv", 0, 0, 1);
        failed.error = Some(Error::empty_file("empty.csv"));
        summary.record(failed);
        summary.record(result("alpha.csv", 2, 3, 1));

        let lines = summary.lines();
        assert_eq!(lines[0], "=".repeat(60));
        assert_eq!(lines[1], "PROCESSING SUMMARY");
        assert_eq!(lines[3], "✅ alpha.csv: 2 records, 3 errors (1ms)");
        assert_eq!(lines[4], "❌ empty.csv: FAILED - empty CSV file: empty.csv");
        assert!(lines[5].starts_with("✅ zeta.csv"));
        assert_eq!(lines[6], "-".repeat(60));
        assert_eq!(lines[7], "Total files processed: 3");
        assert_eq!(lines[8], "Successful: 2");
        assert_eq!(lines[9], "Failed: 1");
        assert_eq!(lines[10], "Total records imported: 3");
        assert_eq!(lines[11], "Total parsing errors: 3");
        assert_eq!(lines[12], "Total processing time: 3ms");
        assert_eq!(lines.last().unwrap(), &"=".repeat(60));
    }

    #[tokio::test]
    async fn test_collect_until_closed() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(result("a.csv", 1, 0, 1)).await.unwrap();
        tx.send(result("b.csv", 2, 0, 1)).await.unwrap();
        drop(tx);

        let summary = ScanSummary::collect(rx).await;
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.total_records, 3);
    }
}
