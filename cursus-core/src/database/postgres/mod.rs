//! Postgres adapters for the repository ports, built on the sqlx runtime
//! query API. One [`PostgresStorage`] transaction backs a whole lifecycle
//! operation.

pub mod entities;
pub mod images;
pub mod parts;
pub mod products;

use async_trait::async_trait;
use cursus_model::Visibility;
use sqlx::{PgPool, Postgres, Transaction};

use crate::config::DatabaseConfig;
use crate::database::Storage;
use crate::error::{CatalogError, Result};

pub use entities::{PgEntity, PostgresEntityRepository};
pub use images::PostgresImageRepository;
pub use parts::PostgresPartRepository;
pub use products::PostgresProductRepository;

/// Unit-of-work factory over a Postgres pool.
#[derive(Clone, Debug)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        Ok(Self::new(config.connect().await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies any pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            CatalogError::Internal(format!("failed to run migrations: {e}"))
        })
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    type Conn = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Conn> {
        self.pool.begin().await.map_err(|e| {
            CatalogError::Internal(format!("failed to start transaction: {e}"))
        })
    }

    async fn commit(&self, conn: Self::Conn) -> Result<()> {
        conn.commit().await.map_err(|e| {
            CatalogError::Internal(format!(
                "failed to commit transaction: {e}"
            ))
        })
    }

    async fn rollback(&self, conn: Self::Conn) -> Result<()> {
        conn.rollback().await.map_err(|e| {
            CatalogError::Internal(format!(
                "failed to roll back transaction: {e}"
            ))
        })
    }
}

/// `AND`-form tier filter, appended to a query that already has a WHERE
/// clause. Applied identically to entities and products.
pub(crate) fn visibility_clause(vis: Visibility) -> &'static str {
    match vis {
        Visibility::Listed => " AND in_stock = TRUE AND deleted_at IS NULL",
        Visibility::WithDeleted => "",
        Visibility::WithUnpublished => " AND deleted_at IS NULL",
    }
}

pub(crate) fn db_err(context: &str, err: sqlx::Error) -> CatalogError {
    CatalogError::Internal(format!("{context}: {err}"))
}
