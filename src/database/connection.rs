// Database Connection Management
//
// PostgreSQL connection pooling with tokio-postgres and deadpool. A failed
// connection at startup leaves the handle in degraded mode instead of
// stopping the process.
use anyhow::{Context, Result};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use std::str::FromStr;
use std::time::Duration;
use tokio_postgres::NoTls;

use crate::config::DatabaseConfig;
use crate::database::migrations;
use crate::database::store::{StoreError, StoreResult};

const POOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Database connection wrapper. `pool` is `None` in degraded mode.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: Option<Pool>,
}

impl DatabaseConnection {
    /// Connect and bootstrap the schema, degrading on any failure
    pub async fn connect(config: Option<&DatabaseConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("⚠️  DATABASE_URL not set, running with a degraded no-op store");
            return Self::degraded();
        };

        match Self::try_connect(config).await {
            Ok(pool) => Self { pool: Some(pool) },
            Err(e) => {
                tracing::warn!("⚠️  Database unavailable ({:#}), running with a degraded no-op store", e);
                Self::degraded()
            }
        }
    }

    /// Store that answers every read with "not found"
    pub fn degraded() -> Self {
        Self { pool: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.pool.is_none()
    }

    async fn try_connect(config: &DatabaseConfig) -> Result<Pool> {
        let pg_config = tokio_postgres::Config::from_str(&config.url)
            .context("Failed to parse DATABASE_URL")?;
        tracing::info!(
            "🔌 Connecting to database: {:?}/{}",
            pg_config.get_hosts().first(),
            pg_config.get_dbname().unwrap_or_default()
        );

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = if config.tls {
            let tls_connector = TlsConnector::builder()
                .build()
                .context("Failed to build TLS connector")?;
            Manager::from_config(pg_config, MakeTlsConnector::new(tls_connector), mgr_config)
        } else {
            Manager::from_config(pg_config, NoTls, mgr_config)
        };

        let pool = Pool::builder(mgr)
            .max_size(config.max_connections)
            .wait_timeout(Some(POOL_TIMEOUT))
            .create_timeout(Some(POOL_TIMEOUT))
            .recycle_timeout(Some(POOL_TIMEOUT))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .context("Failed to create database pool")?;

        // Test the connection
        let client = pool
            .get()
            .await
            .context("Failed to get connection from pool")?;
        client
            .query("SELECT 1", &[])
            .await
            .context("Failed to test database connection")?;

        migrations::init_schema(&client).await?;

        tracing::info!("✅ Database connection established successfully");
        Ok(pool)
    }

    /// Pooled client, or `None` when degraded
    pub(crate) async fn client(&self) -> StoreResult<Option<Object>> {
        match &self.pool {
            Some(pool) => Ok(Some(pool.get().await?)),
            None => Ok(None),
        }
    }

    /// Pooled client for writes that must produce a row
    pub(crate) async fn require_client(&self) -> StoreResult<Object> {
        self.client().await?.ok_or(StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_config_degrades() {
        let db = DatabaseConnection::connect(None).await;
        assert!(db.is_degraded());
        assert!(matches!(db.require_client().await, Err(StoreError::Unavailable)));
        assert!(db.client().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_url_degrades() {
        let config = DatabaseConfig {
            url: "definitely not a url ::".to_string(),
            max_connections: 1,
            tls: false,
        };
        assert!(DatabaseConnection::connect(Some(&config)).await.is_degraded());
    }
}
