//! Shared components for CLI commands
//!
//! Configuration loading, logging setup and progress reporting used by every
//! command.

use crate::cli::args::Args;
use crate::config::{Config, LoggingConfig};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Configuration after CLI overrides, and whether a file was read
pub struct LoadedConfig {
    pub config: Config,
    pub from_file: bool,
}

/// Load configuration from `--config`, or `config.yaml` when present
///
/// A missing explicit file is an error; a missing default file falls back to
/// built-in defaults.
pub fn load_configuration(args: &Args) -> Result<LoadedConfig> {
    let (mut config, from_file) = Config::load_or_default(args.config_file.as_deref())
        .context("Failed to load configuration")?;

    if let Some(level) = args.get_log_level() {
        config = config.with_log_level(level);
    }

    Ok(LoadedConfig { config, from_file })
}

/// Set up structured logging to the console and the log file
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// flushes the file writer when dropped and must be held for the whole
/// command.
pub fn setup_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let level = config.log_level.to_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sensor_importer={}", level)));

    let console_layer = config.log_to_console.then(|| {
        fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_timer(fmt::time::uptime())
            .with_writer(std::io::stderr)
    });

    let (file_layer, guard) = if config.log_file.as_os_str().is_empty() {
        (None, None)
    } else {
        let appender = file_appender(&config.log_file)?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer()
            .with_target(false)
            .with_level(true)
            .with_writer(writer)
            .with_ansi(false);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    tracing::debug!("Logging initialized at level: {}", level);
    Ok(guard)
}

/// Append-only log file without rotation
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path: {}", path.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Progress bar counting processed files
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_load_configuration_applies_verbosity() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "logging:\n  log_level: warn\n").unwrap();

        let args = Args::parse_from([
            "sensor-importer",
            "-c",
            path.to_str().unwrap(),
            "-v",
            "connect",
        ]);
        let loaded = load_configuration(&args).unwrap();

        assert!(loaded.from_file);
        assert_eq!(loaded.config.logging.log_level, "debug");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.yaml");
        let args = Args::parse_from(["sensor-importer", "-c", path.to_str().unwrap(), "info"]);

        assert!(load_configuration(&args).is_err());
    }

    #[test]
    fn test_file_appender_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("import.log");

        let _appender = file_appender(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_progress_bar_length() {
        let pb = create_progress_bar(12, "importing");
        assert_eq!(pb.length(), Some(12));
    }
}
