//! PostgreSQL backend

use super::{PoolStatus, SensorStore, StoreError, StoreStats, max_lifetime};
use crate::config::{PoolConfig, PostgresConfig};
use crate::constants::{SENSOR_TABLE, SENSOR_UNIQUE_INDEX};
use crate::models::SensorReading;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use sqlx::{Postgres, QueryBuilder};
use std::str::FromStr;
use tracing::debug;

/// Rows per INSERT statement; Postgres allows at most 65535 bind parameters
const ROWS_PER_STATEMENT: usize = 10_000;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(config: &PostgresConfig, pool_config: &PoolConfig) -> Result<Self> {
        let ssl_mode = PgSslMode::from_str(&config.sslmode).map_err(|_| {
            Error::configuration(format!("unknown postgres sslmode '{}'", config.sslmode))
        })?;

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .database(&config.dbname)
            .ssl_mode(ssl_mode);
        if !config.password.is_empty() {
            options = options.password(&config.password);
        }

        debug!(
            "Opening PostgreSQL pool at {}:{}/{}: max {} connections",
            config.host, config.port, config.dbname, pool_config.max_open_conns
        );

        let pool = PgPoolOptions::new()
            .max_connections(pool_config.max_open_conns)
            .min_connections(pool_config.max_idle_conns.min(pool_config.max_open_conns))
            .max_lifetime(max_lifetime(pool_config.conn_max_lifetime))
            .connect_with(options)
            .await
            .map_err(|e| {
                Error::database(
                    format!(
                        "failed to connect to postgres at {}:{}/{}",
                        config.host, config.port, config.dbname
                    ),
                    e,
                )
            })?;

        Ok(Self { pool })
    }
}

fn insert_statement<'a>(
    readings: impl IntoIterator<Item = &'a SensorReading>,
    created_at: DateTime<Utc>,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} (timestamp, sensor_name, value, created_at) ",
        SENSOR_TABLE
    ));
    builder.push_values(readings, |mut row, reading| {
        row.push_bind(reading.timestamp)
            .push_bind(&reading.sensor_name)
            .push_bind(reading.value)
            .push_bind(created_at);
    });
    builder
}

#[async_trait]
impl SensorStore for PostgresStore {
    fn driver_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> std::result::Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_schema(&self) -> std::result::Result<(), StoreError> {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id BIGSERIAL PRIMARY KEY,
                timestamp TIMESTAMPTZ NOT NULL,
                sensor_name VARCHAR(255) NOT NULL,
                value DOUBLE PRECISION NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            SENSOR_TABLE
        ))
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} (timestamp, sensor_name)",
            SENSOR_UNIQUE_INDEX, SENSOR_TABLE
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn batch_insert(
        &self,
        readings: &[SensorReading],
    ) -> std::result::Result<(), StoreError> {
        if readings.is_empty() {
            return Ok(());
        }

        let created_at = Utc::now();
        let mut tx = self.pool.begin().await?;
        for statement_rows in readings.chunks(ROWS_PER_STATEMENT) {
            insert_statement(statement_rows, created_at)
                .build()
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn insert(&self, reading: &SensorReading) -> std::result::Result<(), StoreError> {
        insert_statement(std::iter::once(reading), Utc::now())
            .build()
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn stats(&self) -> std::result::Result<StoreStats, StoreError> {
        let (total_records, unique_sensors, earliest, latest): (
            i64,
            i64,
            Option<DateTime<Utc>>,
            Option<DateTime<Utc>>,
        ) = sqlx::query_as(&format!(
            "SELECT COUNT(*), COUNT(DISTINCT sensor_name), MIN(timestamp), MAX(timestamp) FROM {}",
            SENSOR_TABLE
        ))
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreStats {
            total_records,
            unique_sensors,
            earliest,
            latest,
        })
    }

    fn pool_status(&self) -> Option<PoolStatus> {
        Some(PoolStatus {
            open: self.pool.size(),
            idle: self.pool.num_idle(),
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
