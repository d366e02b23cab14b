//! Tests for per-file ingestion

use crate::models::FileJob;
use std::path::Path;
use tempfile::TempDir;

mod reader_tests;

/// Write `content` to `name` inside `dir` and return a job for it
pub fn write_csv(dir: &TempDir, name: &str, content: &str) -> FileJob {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    FileJob::new(path)
}

pub fn job_for(path: &Path) -> FileJob {
    FileJob::new(path.to_path_buf())
}
