use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use cursus_model::{
    DetailsRef, EntityId, EntityKind, Product, ProductId, ProductPatch,
    ProductTier, Visibility,
};
use uuid::Uuid;

use crate::database::memory::{MemoryConn, MemoryStorage};
use crate::database::ports::ProductRepository;
use crate::error::Result;

/// In-memory adapter for the product port.
#[derive(Clone, Debug, Default)]
pub struct MemoryProductRepository;

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self
    }
}

/// Sort key matching the Postgres enum declaration order.
fn tier_rank(tier: ProductTier) -> u8 {
    match tier {
        ProductTier::Standard => 0,
        ProductTier::Reservation => 1,
        ProductTier::Early => 2,
        ProductTier::Late => 3,
        ProductTier::EarlySurcharge => 4,
        ProductTier::LateSurcharge => 5,
    }
}

fn matches_details(product: &Product, details: DetailsRef) -> bool {
    product.details_id == details.id && product.details_type == details.kind
}

#[async_trait]
impl ProductRepository<MemoryStorage> for MemoryProductRepository {
    async fn insert_batch(
        &self,
        conn: &mut MemoryConn,
        products: &[Product],
    ) -> Result<()> {
        let table = &mut conn.state_mut().products;
        for product in products {
            table.insert(product.id.to_uuid(), product.clone());
        }
        Ok(())
    }

    async fn list_by_details(
        &self,
        conn: &mut MemoryConn,
        details: DetailsRef,
        vis: Visibility,
    ) -> Result<Vec<Product>> {
        let mut rows: Vec<Product> = conn
            .state()
            .products
            .values()
            .filter(|p| matches_details(p, details))
            .filter(|p| vis.admits(p.in_stock, p.deleted_at.is_some()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            tier_rank(a.tier)
                .cmp(&tier_rank(b.tier))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn list_by_details_batch(
        &self,
        conn: &mut MemoryConn,
        kind: EntityKind,
        ids: &[EntityId],
        vis: Visibility,
    ) -> Result<Vec<Product>> {
        let wanted: HashSet<Uuid> =
            ids.iter().map(EntityId::to_uuid).collect();
        let mut rows: Vec<Product> = conn
            .state()
            .products
            .values()
            .filter(|p| {
                p.details_type == kind
                    && wanted.contains(&p.details_id.to_uuid())
            })
            .filter(|p| vis.admits(p.in_stock, p.deleted_at.is_some()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.details_id
                .cmp(&b.details_id)
                .then_with(|| tier_rank(a.tier).cmp(&tier_rank(b.tier)))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn update(
        &self,
        conn: &mut MemoryConn,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<u64> {
        match conn.state_mut().products.get_mut(&id.to_uuid()) {
            Some(product) if product.deleted_at.is_none() => {
                if let Some(price) = patch.price {
                    product.price = price;
                }
                product.updated_at = Utc::now();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn set_in_stock_by_details(
        &self,
        conn: &mut MemoryConn,
        details: DetailsRef,
        in_stock: bool,
    ) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for product in conn.state_mut().products.values_mut() {
            if matches_details(product, details)
                && product.deleted_at.is_none()
            {
                product.in_stock = in_stock;
                product.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn soft_delete_by_details(
        &self,
        conn: &mut MemoryConn,
        details: DetailsRef,
    ) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for product in conn.state_mut().products.values_mut() {
            if matches_details(product, details)
                && product.deleted_at.is_none()
            {
                product.deleted_at = Some(now);
                product.in_stock = false;
                product.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_permanent_by_details(
        &self,
        conn: &mut MemoryConn,
        details: DetailsRef,
    ) -> Result<u64> {
        let table = &mut conn.state_mut().products;
        let before = table.len();
        table.retain(|_, p| !matches_details(p, details));
        Ok((before - table.len()) as u64)
    }

    async fn restore_by_details(
        &self,
        conn: &mut MemoryConn,
        details: DetailsRef,
    ) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for product in conn.state_mut().products.values_mut() {
            if matches_details(product, details)
                && product.deleted_at.is_some()
            {
                product.deleted_at = None;
                product.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
