use std::sync::Arc;

use chrono::Utc;
use cursus_model::{
    CatalogEntity, CreateTrainingSession, EntityId, Product, ProductPatch,
    ProductTier, TrainingSession, TrainingSessionDiff, TrainingSessionPatch,
    UpdateTrainingSession, Visibility,
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

/// Catalog service for instructor-led training sessions.
pub struct TrainingSessionService<S: Storage> {
    pub lifecycle: Lifecycle<S, TrainingSession, TrainingSessionPatch>,
}

impl<S: Storage> std::fmt::Debug for TrainingSessionService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingSessionService")
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl TrainingSessionService<PostgresStorage> {
    pub fn postgres(storage: Arc<PostgresStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(PostgresEntityRepository::<TrainingSession>::new()),
                Arc::new(PostgresProductRepository::new()),
                Arc::new(PostgresPartRepository::new()),
            ),
        }
    }
}

impl TrainingSessionService<MemoryStorage> {
    pub fn in_memory(storage: Arc<MemoryStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(MemoryEntityRepository::<TrainingSession>::new()),
                Arc::new(MemoryProductRepository::new()),
                Arc::new(MemoryPartRepository::new()),
            ),
        }
    }
}

impl<S: Storage> TrainingSessionService<S> {
    crate::service::delegate_lifecycle!(TrainingSession);

    /// Creates a training session and its single product, unpublished.
    pub async fn create(
        &self,
        req: CreateTrainingSession,
    ) -> Result<(TrainingSession, Product)> {
        let now = Utc::now();
        validate::create_training_session(now, &req)?;
        let session = TrainingSession {
            id: EntityId::new(),
            name: req.name,
            short_description: req.short_description,
            description: req.description,
            starts_at: req.starts_at,
            ends_at: req.ends_at,
            payment_deadline: req.payment_deadline,
            capacity: req.capacity,
            images_count: 0,
            in_stock: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let product = Product::new(
            session.details_ref(),
            ProductTier::Standard,
            req.price,
        );
        self.lifecycle
            .create_records(&session, vec![product.clone()])
            .await?;
        Ok((session, product))
    }

    pub async fn update(
        &self,
        raw_id: &str,
        req: UpdateTrainingSession,
    ) -> Result<TrainingSessionDiff> {
        validate::update_training_session(Utc::now(), &req)?;
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.lifecycle.entities);
        let products = Arc::clone(&self.lifecycle.products);
        with_tx(&*self.lifecycle.storage, move |conn| {
            Box::pin(async move {
                let session = entities
                    .get(conn, id, Visibility::WithUnpublished)
                    .await?
                    .ok_or_else(|| {
                        CatalogError::NotFound(format!(
                            "training session {id}"
                        ))
                    })?;
                let set = products
                    .list_by_details(
                        conn,
                        session.details_ref(),
                        Visibility::WithUnpublished,
                    )
                    .await?;
                let product = set.first().ok_or_else(|| {
                    CatalogError::NotFound(format!(
                        "product for training session {id}"
                    ))
                })?;

                let diff = diff_session(&session, product, &req);
                if !diff.training_session.is_empty()
                    && entities
                        .update(conn, id, &diff.training_session)
                        .await?
                        == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "training session {id}"
                    )));
                }
                if !diff.product.is_empty()
                    && products
                        .update(conn, product.id, &diff.product)
                        .await?
                        == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "product for training session {id}"
                    )));
                }
                Ok(diff)
            })
        })
        .await
    }
}

fn diff_session(
    stored: &TrainingSession,
    product: &Product,
    req: &UpdateTrainingSession,
) -> TrainingSessionDiff {
    let mut session = TrainingSessionPatch::default();
    if let Some(v) = &req.session.name
        && *v != stored.name
    {
        session.name = Some(v.clone());
    }
    if let Some(v) = &req.session.short_description
        && *v != stored.short_description
    {
        session.short_description = Some(v.clone());
    }
    if let Some(v) = &req.session.description
        && stored.description.as_deref() != Some(v)
    {
        session.description = Some(v.clone());
    }
    if let Some(v) = req.session.starts_at
        && v != stored.starts_at
    {
        session.starts_at = Some(v);
    }
    if let Some(v) = req.session.ends_at
        && v != stored.ends_at
    {
        session.ends_at = Some(v);
    }
    if let Some(v) = req.session.payment_deadline
        && v != stored.payment_deadline
    {
        session.payment_deadline = Some(v);
    }
    if let Some(v) = req.session.capacity
        && stored.capacity != Some(v)
    {
        session.capacity = Some(v);
    }

    let mut price = ProductPatch::default();
    if let Some(v) = req.price
        && v != product.price
    {
        price.price = Some(v);
    }

    TrainingSessionDiff {
        training_session: session,
        product: price,
    }
}
