use std::time::Duration;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::RagChatError;
use crate::Result;

mod connect;
mod passages;

pub use connect::connect_options;
pub use connect::EasyConnect;

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the pool described by the configuration
    ///
    /// Any failure here is reported as a connection error.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let options = connect_options(&config.database)?;

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections())
            .min_connections(config.min_connections())
            .acquire_timeout(Duration::from_secs(config.connection_timeout()))
            .connect_with(options)
            .await
            .map_err(|e| RagChatError::Connection(e.to_string()))?;

        tracing::info!(
            "Database pool configured: max_connections={}, min_connections={}",
            config.max_connections(),
            config.min_connections()
        );

        Ok(Self::new(pool))
    }

    /// Get a reference to the database pool for raw queries
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection; waits for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}
