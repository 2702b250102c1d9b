use std::sync::Arc;

use chrono::Utc;
use cursus_model::{
    CatalogEntity, CreatePhysicalGood, EntityId, PhysicalGood,
    PhysicalGoodDiff, PhysicalGoodPatch, Product, ProductPatch, ProductTier,
    UpdatePhysicalGood, Visibility,
};

use crate::database::memory::{
    MemoryEntityRepository, MemoryPartRepository, MemoryProductRepository,
    MemoryStorage,
};
use crate::database::postgres::{
    PostgresEntityRepository, PostgresPartRepository,
    PostgresProductRepository, PostgresStorage,
};
use crate::database::{Storage, with_tx};
use crate::error::{CatalogError, Result};
use crate::service::Lifecycle;
use crate::validate;

/// Catalog service for shippable physical goods.
pub struct PhysicalGoodService<S: Storage> {
    pub lifecycle: Lifecycle<S, PhysicalGood, PhysicalGoodPatch>,
}

impl<S: Storage> std::fmt::Debug for PhysicalGoodService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicalGoodService")
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl PhysicalGoodService<PostgresStorage> {
    pub fn postgres(storage: Arc<PostgresStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(PostgresEntityRepository::<PhysicalGood>::new()),
                Arc::new(PostgresProductRepository::new()),
                Arc::new(PostgresPartRepository::new()),
            ),
        }
    }
}

impl PhysicalGoodService<MemoryStorage> {
    pub fn in_memory(storage: Arc<MemoryStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(MemoryEntityRepository::<PhysicalGood>::new()),
                Arc::new(MemoryProductRepository::new()),
                Arc::new(MemoryPartRepository::new()),
            ),
        }
    }
}

impl<S: Storage> PhysicalGoodService<S> {
    crate::service::delegate_lifecycle!(PhysicalGood);

    /// Creates a physical good and its single product, unpublished.
    pub async fn create(
        &self,
        req: CreatePhysicalGood,
    ) -> Result<(PhysicalGood, Product)> {
        validate::create_physical_good(&req)?;
        let now = Utc::now();
        let good = PhysicalGood {
            id: EntityId::new(),
            name: req.name,
            short_description: req.short_description,
            description: req.description,
            sku: req.sku,
            weight_grams: req.weight_grams,
            images_count: 0,
            in_stock: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let product = Product::new(
            good.details_ref(),
            ProductTier::Standard,
            req.price,
        );
        self.lifecycle
            .create_records(&good, vec![product.clone()])
            .await?;
        Ok((good, product))
    }

    pub async fn update(
        &self,
        raw_id: &str,
        req: UpdatePhysicalGood,
    ) -> Result<PhysicalGoodDiff> {
        validate::update_physical_good(&req)?;
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.lifecycle.entities);
        let products = Arc::clone(&self.lifecycle.products);
        with_tx(&*self.lifecycle.storage, move |conn| {
            Box::pin(async move {
                let good = entities
                    .get(conn, id, Visibility::WithUnpublished)
                    .await?
                    .ok_or_else(|| {
                        CatalogError::NotFound(format!(
                            "physical good {id}"
                        ))
                    })?;
                let set = products
                    .list_by_details(
                        conn,
                        good.details_ref(),
                        Visibility::WithUnpublished,
                    )
                    .await?;
                let product = set.first().ok_or_else(|| {
                    CatalogError::NotFound(format!(
                        "product for physical good {id}"
                    ))
                })?;

                let diff = diff_good(&good, product, &req);
                if !diff.physical_good.is_empty()
                    && entities
                        .update(conn, id, &diff.physical_good)
                        .await?
                        == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "physical good {id}"
                    )));
                }
                if !diff.product.is_empty()
                    && products
                        .update(conn, product.id, &diff.product)
                        .await?
                        == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "product for physical good {id}"
                    )));
                }
                Ok(diff)
            })
        })
        .await
    }
}

fn diff_good(
    stored: &PhysicalGood,
    product: &Product,
    req: &UpdatePhysicalGood,
) -> PhysicalGoodDiff {
    let mut good = PhysicalGoodPatch::default();
    if let Some(v) = &req.good.name
        && *v != stored.name
    {
        good.name = Some(v.clone());
    }
    if let Some(v) = &req.good.short_description
        && *v != stored.short_description
    {
        good.short_description = Some(v.clone());
    }
    if let Some(v) = &req.good.description
        && stored.description.as_deref() != Some(v)
    {
        good.description = Some(v.clone());
    }
    if let Some(v) = &req.good.sku
        && *v != stored.sku
    {
        good.sku = Some(v.clone());
    }
    if let Some(v) = req.good.weight_grams
        && stored.weight_grams != Some(v)
    {
        good.weight_grams = Some(v);
    }

    let mut price = ProductPatch::default();
    if let Some(v) = req.price
        && v != product.price
    {
        price.price = Some(v);
    }

    PhysicalGoodDiff {
        physical_good: good,
        product: price,
    }
}
