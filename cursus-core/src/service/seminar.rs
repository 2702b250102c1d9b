use std::sync::Arc;

use chrono::Utc;
use cursus_model::{
    CatalogEntity, CreateSeminar, EntityId, Product, ProductPatch, Seminar,
    SeminarDiff, SeminarPatch, SeminarPrices, SeminarPricesPatch,
    UpdateSeminar, Visibility,
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

/// Catalog service for seminars, the one kind carrying a five-tier product
/// set.
pub struct SeminarService<S: Storage> {
    pub lifecycle: Lifecycle<S, Seminar, SeminarPatch>,
}

impl<S: Storage> std::fmt::Debug for SeminarService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeminarService")
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl SeminarService<PostgresStorage> {
    pub fn postgres(storage: Arc<PostgresStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(PostgresEntityRepository::<Seminar>::new()),
                Arc::new(PostgresProductRepository::new()),
                Arc::new(PostgresPartRepository::new()),
            ),
        }
    }
}

impl SeminarService<MemoryStorage> {
    pub fn in_memory(storage: Arc<MemoryStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(MemoryEntityRepository::<Seminar>::new()),
                Arc::new(MemoryProductRepository::new()),
                Arc::new(MemoryPartRepository::new()),
            ),
        }
    }
}

impl<S: Storage> SeminarService<S> {
    crate::service::delegate_lifecycle!(Seminar);

    /// Creates a seminar plus all five tier products, unpublished.
    pub async fn create(
        &self,
        req: CreateSeminar,
    ) -> Result<(Seminar, Vec<Product>)> {
        let now = Utc::now();
        validate::create_seminar(now, &req)?;
        let seminar = Seminar {
            id: EntityId::new(),
            name: req.name,
            short_description: req.short_description,
            description: req.description,
            topic: req.topic,
            speaker: req.speaker,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            payment_deadline: req.payment_deadline,
            images_count: 0,
            in_stock: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let details = seminar.details_ref();
        let products: Vec<Product> = req
            .prices
            .iter()
            .map(|(tier, price)| Product::new(details, tier, price))
            .collect();
        self.lifecycle
            .create_records(&seminar, products.clone())
            .await?;
        Ok((seminar, products))
    }

    /// Diffs the request against stored values, tier by tier for prices, and
    /// persists only what changed.
    pub async fn update(
        &self,
        raw_id: &str,
        req: UpdateSeminar,
    ) -> Result<SeminarDiff> {
        validate::update_seminar(Utc::now(), &req)?;
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.lifecycle.entities);
        let products = Arc::clone(&self.lifecycle.products);
        with_tx(&*self.lifecycle.storage, move |conn| {
            Box::pin(async move {
                let seminar = entities
                    .get(conn, id, Visibility::WithUnpublished)
                    .await?
                    .ok_or_else(|| {
                        CatalogError::NotFound(format!("seminar {id}"))
                    })?;
                let set = products
                    .list_by_details(
                        conn,
                        seminar.details_ref(),
                        Visibility::WithUnpublished,
                    )
                    .await?;

                let entity_patch = diff_seminar(&seminar, &req);
                let mut prices = SeminarPricesPatch::default();
                for tier in SeminarPrices::TIERS {
                    let Some(price) = req.prices.for_tier(tier) else {
                        continue;
                    };
                    let product = set
                        .iter()
                        .find(|p| p.tier == tier)
                        .ok_or_else(|| {
                            CatalogError::NotFound(format!(
                                "{tier} product for seminar {id}"
                            ))
                        })?;
                    if price != product.price {
                        prices.set_tier(tier, price);
                    }
                }

                if !entity_patch.is_empty()
                    && entities.update(conn, id, &entity_patch).await? == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "seminar {id}"
                    )));
                }
                for tier in SeminarPrices::TIERS {
                    let Some(price) = prices.for_tier(tier) else {
                        continue;
                    };
                    // Presence was checked while diffing.
                    if let Some(product) =
                        set.iter().find(|p| p.tier == tier)
                    {
                        let patch = ProductPatch { price: Some(price) };
                        if products.update(conn, product.id, &patch).await?
                            == 0
                        {
                            return Err(CatalogError::NotFound(format!(
                                "{tier} product for seminar {id}"
                            )));
                        }
                    }
                }
                Ok(SeminarDiff {
                    seminar: entity_patch,
                    products: prices,
                })
            })
        })
        .await
    }
}

fn diff_seminar(stored: &Seminar, req: &UpdateSeminar) -> SeminarPatch {
    let mut seminar = SeminarPatch::default();
    if let Some(v) = &req.seminar.name
        && *v != stored.name
    {
        seminar.name = Some(v.clone());
    }
    if let Some(v) = &req.seminar.short_description
        && *v != stored.short_description
    {
        seminar.short_description = Some(v.clone());
    }
    if let Some(v) = &req.seminar.description
        && stored.description.as_deref() != Some(v)
    {
        seminar.description = Some(v.clone());
    }
    if let Some(v) = &req.seminar.topic
        && *v != stored.topic
    {
        seminar.topic = Some(v.clone());
    }
    if let Some(v) = &req.seminar.speaker
        && stored.speaker.as_deref() != Some(v)
    {
        seminar.speaker = Some(v.clone());
    }
    if let Some(v) = req.seminar.starts_at
        && v != stored.starts_at
    {
        seminar.starts_at = Some(v);
    }
    if let Some(v) = req.seminar.ends_at
        && v != stored.ends_at
    {
        seminar.ends_at = Some(v);
    }
    if let Some(v) = req.seminar.payment_deadline
        && v != stored.payment_deadline
    {
        seminar.payment_deadline = Some(v);
    }
    seminar
}
