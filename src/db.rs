use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::mysql::MySqlPoolOptions;
use tracing::{info, warn};

use crate::config::Config;
use crate::store::{MemoryStore, MySqlStore, Store};

pub async fn init_store(config: &Config) -> Result<Arc<dyn Store>> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set, leaves are kept in memory only");
        return Ok(Arc::new(MemoryStore::new()));
    };

    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    info!("Database ready");
    Ok(Arc::new(MySqlStore::new(pool)))
}
