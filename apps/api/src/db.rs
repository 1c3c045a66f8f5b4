use std::time::Duration;

use anyhow::Result;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tracing::info;

const MAX_CONNECTIONS: u32 = 10;

/// Creates a MySQL pool that connects on first use.
/// Only a malformed URL fails here; an unreachable server surfaces per query.
pub fn create_lazy_pool(database_url: &str, acquire_timeout: Duration) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Creates and returns a MySQL connection pool, connecting eagerly.
pub async fn create_pool(database_url: &str) -> Result<MySqlPool> {
    info!("Connecting to MySQL...");

    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;

    info!("MySQL connection pool established");
    Ok(pool)
}
