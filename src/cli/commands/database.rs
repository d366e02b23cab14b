//! Database maintenance commands: connect, migrate and info

use crate::app::services::persistence;
use crate::config::{Config, DatabaseDriver};
use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

/// Test the database connection and print the connection settings
pub async fn run_connect(config: &Config) -> Result<()> {
    info!("Testing database connection...");

    let store = persistence::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let pool = &config.database.connection_pool;
    println!(
        "{} Successfully connected to {} database",
        "✓".green().bold(),
        config.database.driver
    );
    println!("  Target:            {}", config.database.describe());
    println!("  Max Connections:   {}", pool.max_open_conns);
    println!("  Idle Connections:  {}", pool.max_idle_conns);
    println!("  Max Lifetime:      {}s", pool.conn_max_lifetime);

    store.close().await;
    Ok(())
}

/// Create the sensor table and unique index when missing
pub async fn run_migrate(config: &Config) -> Result<()> {
    info!("Running database migrations...");

    let store = persistence::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    store
        .ensure_schema()
        .await
        .context("Failed to create sensor table")?;

    info!("✓ Schema is up to date");
    println!("{} Schema is up to date", "✓".green().bold());

    store.close().await;
    Ok(())
}

/// Print driver, connection status and data statistics
pub async fn run_info(config: &Config) -> Result<()> {
    let divider = "=".repeat(50);
    println!("{}", "Database Information:".bold());
    println!("{}", divider);
    println!("Database Type:     {}", config.database.driver);

    match config.database.driver {
        DatabaseDriver::Sqlite => {
            println!(
                "File Path:         {}",
                config.database.sqlite.path.display()
            );
        }
        DatabaseDriver::Postgres => {
            let pg = &config.database.postgres;
            println!("Host:              {}", pg.host);
            println!("Port:              {}", pg.port);
            println!("Database:          {}", pg.dbname);
        }
    }

    let store = match persistence::connect(&config.database).await {
        Ok(store) => store,
        Err(e) => {
            println!("Connection Status: {}", "Disconnected".red());
            println!("\nConnection failed - unable to retrieve detailed information");
            println!("{}", divider);
            return Err(e).context("Failed to connect to database");
        }
    };
    println!("Connection Status: {}", "Connected".green());

    if let Some(status) = store.pool_status() {
        println!("\nConnection Pool:");
        println!(
            "  Max Connections: {}",
            config.database.connection_pool.max_open_conns
        );
        println!("  Open Connections:{}", status.open);
        println!("  Idle:            {}", status.idle);
    }

    match store.stats().await {
        Ok(stats) => {
            println!("\nData Information:");
            println!("  Total Records:   {}", stats.total_records);
            println!("  Unique Sensors:  {}", stats.unique_sensors);
            if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
                println!(
                    "  Date Range:      {} to {}",
                    earliest.format("%Y-%m-%d %H:%M:%S"),
                    latest.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        Err(e) => {
            println!(
                "\n{} Could not read sensor data: {} (run `migrate` first?)",
                "!".yellow(),
                e
            );
        }
    }

    println!("{}", divider);
    store.close().await;
    Ok(())
}
