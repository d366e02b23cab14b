//! CLI command implementations
//!
//! - [`scan`] - directory import
//! - [`database`] - connect, migrate and info
//! - [`shared`] - configuration and logging setup

pub mod database;
pub mod scan;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Result;
use tracing::{error, info, warn};

/// Run the selected command
///
/// Configuration is loaded before logging starts, so configuration errors
/// only reach stderr.
pub async fn run(args: Args) -> Result<()> {
    let Some(command) = args.command.clone() else {
        return Ok(());
    };

    let loaded = shared::load_configuration(&args)?;
    let _guard = shared::setup_logging(&loaded.config.logging)?;

    info!(
        "=== sensor-importer {} session started ===",
        env!("CARGO_PKG_VERSION")
    );
    if !loaded.from_file {
        warn!("No configuration file found, using built-in defaults");
    }

    let result = match command {
        Commands::Scan(scan_args) => scan::run_scan(loaded.config, &scan_args)
            .await
            .map(|_| ()),
        Commands::Connect => database::run_connect(&loaded.config).await,
        Commands::Migrate => database::run_migrate(&loaded.config).await,
        Commands::Info => database::run_info(&loaded.config).await,
    };

    match &result {
        Ok(()) => info!("=== session finished ==="),
        Err(e) => error!("{:#}", e),
    }

    result
}
