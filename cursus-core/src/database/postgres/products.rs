use async_trait::async_trait;
use cursus_model::{
    DetailsRef, EntityId, EntityKind, Product, ProductId, ProductPatch,
    Visibility,
};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::Storage;
use crate::database::ports::ProductRepository;
use crate::database::postgres::{PostgresStorage, db_err, visibility_clause};
use crate::error::Result;

type PgConn = <PostgresStorage as Storage>::Conn;

/// Postgres adapter for the product port. All lookups go through the
/// polymorphic `(details_id, details_type)` key.
#[derive(Clone, Debug, Default)]
pub struct PostgresProductRepository;

impl PostgresProductRepository {
    pub fn new() -> Self {
        Self
    }
}

fn push_details(qb: &mut QueryBuilder<'_, sqlx::Postgres>, details: DetailsRef) {
    qb.push(" WHERE details_id = ");
    qb.push_bind(details.id.to_uuid());
    qb.push(" AND details_type = ");
    qb.push_bind(details.kind);
}

#[async_trait]
impl ProductRepository<PostgresStorage> for PostgresProductRepository {
    async fn insert_batch(
        &self,
        conn: &mut PgConn,
        products: &[Product],
    ) -> Result<()> {
        if products.is_empty() {
            return Ok(());
        }
        let mut qb = QueryBuilder::new(
            "INSERT INTO products (id, tier, price, in_stock, details_id, \
             details_type, created_at, updated_at, deleted_at) ",
        );
        qb.push_values(products, |mut row, product| {
            row.push_bind(product.id.to_uuid())
                .push_bind(product.tier)
                .push_bind(product.price)
                .push_bind(product.in_stock)
                .push_bind(product.details_id.to_uuid())
                .push_bind(product.details_type)
                .push_bind(product.created_at)
                .push_bind(product.updated_at)
                .push_bind(product.deleted_at);
        });
        qb.build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to insert products", e))?;
        Ok(())
    }

    async fn list_by_details(
        &self,
        conn: &mut PgConn,
        details: DetailsRef,
        vis: Visibility,
    ) -> Result<Vec<Product>> {
        let mut qb = QueryBuilder::new("SELECT * FROM products");
        push_details(&mut qb, details);
        qb.push(visibility_clause(vis));
        qb.push(" ORDER BY tier, id");
        qb.build_query_as::<Product>()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to list products", e))
    }

    async fn list_by_details_batch(
        &self,
        conn: &mut PgConn,
        kind: EntityKind,
        ids: &[EntityId],
        vis: Visibility,
    ) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(EntityId::to_uuid).collect();
        let mut qb =
            QueryBuilder::new("SELECT * FROM products WHERE details_id = ANY(");
        qb.push_bind(uuids);
        qb.push(") AND details_type = ");
        qb.push_bind(kind);
        qb.push(visibility_clause(vis));
        qb.push(" ORDER BY details_id, tier, id");
        qb.build_query_as::<Product>()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to batch-list products", e))
    }

    async fn update(
        &self,
        conn: &mut PgConn,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<u64> {
        let mut qb =
            QueryBuilder::new("UPDATE products SET updated_at = NOW()");
        if let Some(price) = patch.price {
            qb.push(", price = ");
            qb.push_bind(price);
        }
        qb.push(" WHERE id = ");
        qb.push_bind(id.to_uuid());
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to update product", e))?;
        Ok(result.rows_affected())
    }

    async fn set_in_stock_by_details(
        &self,
        conn: &mut PgConn,
        details: DetailsRef,
        in_stock: bool,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new("UPDATE products SET in_stock = ");
        qb.push_bind(in_stock);
        qb.push(", updated_at = NOW()");
        push_details(&mut qb, details);
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to set product in_stock", e))?;
        Ok(result.rows_affected())
    }

    async fn soft_delete_by_details(
        &self,
        conn: &mut PgConn,
        details: DetailsRef,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(
            "UPDATE products SET deleted_at = NOW(), in_stock = FALSE, \
             updated_at = NOW()",
        );
        push_details(&mut qb, details);
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to soft-delete products", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_permanent_by_details(
        &self,
        conn: &mut PgConn,
        details: DetailsRef,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new("DELETE FROM products");
        push_details(&mut qb, details);
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to delete products", e))?;
        Ok(result.rows_affected())
    }

    async fn restore_by_details(
        &self,
        conn: &mut PgConn,
        details: DetailsRef,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(
            "UPDATE products SET deleted_at = NULL, updated_at = NOW()",
        );
        push_details(&mut qb, details);
        qb.push(" AND deleted_at IS NOT NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to restore products", e))?;
        Ok(result.rows_affected())
    }
}
