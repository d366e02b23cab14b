//! Directory scanning for CSV input files
//!
//! Only the direct children of the scanned directory are considered; CSV files
//! in subdirectories are never picked up.

use crate::constants::CSV_EXTENSION;
use crate::models::FileJob;
use crate::{Error, Result};
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// List the CSV files directly inside `directory` as jobs
///
/// The extension match is case-insensitive. An existing directory without CSV
/// files yields an empty list.
pub fn scan_directory(directory: &Path) -> Result<Vec<FileJob>> {
    if !directory.is_dir() {
        return Err(Error::directory_not_found(directory));
    }

    debug!("Scanning {} for CSV files", directory.display());

    let mut jobs = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|e| {
            Error::DirectoryTraversal {
                message: format!("failed to read directory {}", directory.display()),
                source: e,
            }
        })?;

        if entry.file_type().is_file() && has_csv_extension(entry.path()) {
            jobs.push(FileJob::new(entry.into_path()));
        }
    }

    debug!("Found {} CSV files in {}", jobs.len(), directory.display());
    Ok(jobs)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
}
