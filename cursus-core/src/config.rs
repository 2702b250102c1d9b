//! Storage configuration. Process wiring stays in the binaries; the core
//! only knows how to turn settings into a connection pool.

use std::time::Duration;

use serde::Deserialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::{CatalogError, Result};

/// Connection settings for the catalog database.
///
/// Loaded from `CURSUS_DATABASE__*` environment variables, e.g.
/// `CURSUS_DATABASE__URL=postgres://localhost/cursus`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "DatabaseConfig::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseConfig::default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    fn default_max_connections() -> u32 {
        10
    }

    fn default_acquire_timeout_secs() -> u64 {
        5
    }

    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CURSUS").separator("__"),
            )
            .build()
            .map_err(|e| {
                CatalogError::Internal(format!("failed to read config: {e}"))
            })?;

        settings.get::<DatabaseConfig>("database").map_err(|e| {
            CatalogError::Internal(format!("invalid database config: {e}"))
        })
    }

    pub async fn connect(&self) -> Result<PgPool> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "failed to connect to database: {e}"
                ))
            })
    }
}
