use std::collections::HashMap;
use std::sync::Arc;

use cursus_model::{CatalogEntity, EntityId, Page, Product, Visibility};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::ports::{
    EntityRepository, PartRepository, ProductRepository,
};
use crate::database::{Storage, with_tx};
use crate::error::{CatalogError, Result};

/// Kind-generic lifecycle orchestrator.
///
/// Owns the shared state transitions (publish, unpublish, delete, permanent
/// delete, restore) and the product-joining reads. Create and update stay in
/// the per-kind services because their request shapes differ; they reuse the
/// repositories held here.
pub struct Lifecycle<S, E, P>
where
    S: Storage,
    E: CatalogEntity,
    P: Send + Sync,
{
    pub(crate) storage: Arc<S>,
    pub(crate) entities: Arc<dyn EntityRepository<S, Entity = E, Patch = P>>,
    pub(crate) products: Arc<dyn ProductRepository<S>>,
    pub(crate) parts: Arc<dyn PartRepository<S>>,
}

impl<S, E, P> std::fmt::Debug for Lifecycle<S, E, P>
where
    S: Storage,
    E: CatalogEntity,
    P: Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lifecycle").field("kind", &E::KIND).finish()
    }
}

impl<S, E, P> Clone for Lifecycle<S, E, P>
where
    S: Storage,
    E: CatalogEntity,
    P: Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            entities: Arc::clone(&self.entities),
            products: Arc::clone(&self.products),
            parts: Arc::clone(&self.parts),
        }
    }
}

impl<S, E, P> Lifecycle<S, E, P>
where
    S: Storage,
    E: CatalogEntity,
    P: Send + Sync + 'static,
{
    pub fn new(
        storage: Arc<S>,
        entities: Arc<dyn EntityRepository<S, Entity = E, Patch = P>>,
        products: Arc<dyn ProductRepository<S>>,
        parts: Arc<dyn PartRepository<S>>,
    ) -> Self {
        Self {
            storage,
            entities,
            products,
            parts,
        }
    }

    fn not_found(id: EntityId) -> CatalogError {
        CatalogError::NotFound(format!("{} {id}", E::KIND))
    }

    /// Inserts a freshly built entity together with its complete product
    /// set, in one transaction. Requests are validated by the per-kind
    /// service before this runs.
    pub(crate) async fn create_records(
        &self,
        entity: &E,
        products: Vec<Product>,
    ) -> Result<()> {
        let entities = Arc::clone(&self.entities);
        let product_repo = Arc::clone(&self.products);
        let entity = entity.clone();
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                entities.insert(conn, &entity).await?;
                product_repo.insert_batch(conn, &products).await?;
                Ok(())
            })
        })
        .await?;
        debug!(kind = %E::KIND, "created catalog entity");
        Ok(())
    }

    /// Puts the entity and its whole product set on sale.
    pub async fn publish(&self, raw_id: &str) -> Result<()> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                if entities.set_in_stock(conn, id, true).await? == 0 {
                    return Err(Self::not_found(id));
                }
                let details = cursus_model::DetailsRef::new(id, E::KIND);
                if products
                    .set_in_stock_by_details(conn, details, true)
                    .await?
                    == 0
                {
                    return Err(Self::not_found(id));
                }
                Ok(())
            })
        })
        .await?;
        debug!(kind = %E::KIND, %id, "published");
        Ok(())
    }

    /// Takes the entity off sale; course parts unpublish along with it.
    pub async fn unpublish(&self, raw_id: &str) -> Result<()> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        let parts = Arc::clone(&self.parts);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                if entities.set_in_stock(conn, id, false).await? == 0 {
                    return Err(Self::not_found(id));
                }
                // Non-course kinds simply have no parts to touch.
                parts.set_published_by_owner(conn, id, false).await?;
                let details = cursus_model::DetailsRef::new(id, E::KIND);
                if products
                    .set_in_stock_by_details(conn, details, false)
                    .await?
                    == 0
                {
                    return Err(Self::not_found(id));
                }
                Ok(())
            })
        })
        .await?;
        debug!(kind = %E::KIND, %id, "unpublished");
        Ok(())
    }

    /// Soft delete: forces everything off sale, then stamps `deleted_at` on
    /// the entity, its products and its parts.
    pub async fn delete(&self, raw_id: &str) -> Result<()> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        let parts = Arc::clone(&self.parts);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                if entities.set_in_stock(conn, id, false).await? == 0 {
                    return Err(Self::not_found(id));
                }
                parts.set_published_by_owner(conn, id, false).await?;
                let details = cursus_model::DetailsRef::new(id, E::KIND);
                if products
                    .set_in_stock_by_details(conn, details, false)
                    .await?
                    == 0
                {
                    return Err(Self::not_found(id));
                }
                if entities.soft_delete(conn, id).await? == 0 {
                    return Err(Self::not_found(id));
                }
                products.soft_delete_by_details(conn, details).await?;
                parts.soft_delete_by_owner(conn, id).await?;
                Ok(())
            })
        })
        .await?;
        debug!(kind = %E::KIND, %id, "soft-deleted");
        Ok(())
    }

    /// Hard delete, regardless of soft-delete state. Irreversible.
    pub async fn delete_permanent(&self, raw_id: &str) -> Result<()> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        let parts = Arc::clone(&self.parts);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                if entities.delete_permanent(conn, id).await? == 0 {
                    return Err(Self::not_found(id));
                }
                let details = cursus_model::DetailsRef::new(id, E::KIND);
                if products
                    .delete_permanent_by_details(conn, details)
                    .await?
                    == 0
                {
                    return Err(Self::not_found(id));
                }
                parts.delete_permanent_by_owner(conn, id).await?;
                Ok(())
            })
        })
        .await?;
        debug!(kind = %E::KIND, %id, "permanently deleted");
        Ok(())
    }

    /// Clears the soft-delete mark. The entity comes back unpublished; a
    /// separate publish puts it on sale again.
    pub async fn restore(&self, raw_id: &str) -> Result<()> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        let parts = Arc::clone(&self.parts);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                if entities.restore(conn, id).await? == 0 {
                    return Err(Self::not_found(id));
                }
                let details = cursus_model::DetailsRef::new(id, E::KIND);
                if products.restore_by_details(conn, details).await? == 0 {
                    return Err(Self::not_found(id));
                }
                parts.restore_by_owner(conn, id).await?;
                Ok(())
            })
        })
        .await?;
        debug!(kind = %E::KIND, %id, "restored");
        Ok(())
    }

    /// Fetches the entity joined with its complete product set. An
    /// incomplete set is a data fault, not a miss.
    pub async fn get(
        &self,
        raw_id: &str,
        vis: Visibility,
    ) -> Result<(E, Vec<Product>)> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                let entity = entities
                    .get(conn, id, vis)
                    .await?
                    .ok_or_else(|| Self::not_found(id))?;
                let details = cursus_model::DetailsRef::new(id, E::KIND);
                let set =
                    products.list_by_details(conn, details, vis).await?;
                let expected = E::PRODUCT_TIERS.len();
                if set.len() < expected {
                    return Err(CatalogError::ProductsNotFound {
                        expected,
                        found: set.len(),
                    });
                }
                Ok((entity, set))
            })
        })
        .await
    }

    /// Fetches the entity alone, skipping the product join.
    pub async fn get_reduced(
        &self,
        raw_id: &str,
        vis: Visibility,
    ) -> Result<E> {
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.entities);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                entities
                    .get(conn, id, vis)
                    .await?
                    .ok_or_else(|| Self::not_found(id))
            })
        })
        .await
    }

    /// Lists one page of entities with their product sets. Entities whose
    /// set resolves incomplete are dropped from the page, not errors.
    pub async fn list(
        &self,
        vis: Visibility,
        page: Page,
    ) -> Result<Vec<(E, Vec<Product>)>> {
        let entities = Arc::clone(&self.entities);
        let products = Arc::clone(&self.products);
        let rows = with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                let page_rows = entities.list(conn, vis, page).await?;
                let ids: Vec<EntityId> =
                    page_rows.iter().map(|e| e.id()).collect();
                let set = products
                    .list_by_details_batch(conn, E::KIND, &ids, vis)
                    .await?;
                Ok((page_rows, set))
            })
        })
        .await?;
        let (page_rows, set) = rows;

        let mut by_owner: HashMap<Uuid, Vec<Product>> = HashMap::new();
        for product in set {
            by_owner
                .entry(product.details_id.to_uuid())
                .or_default()
                .push(product);
        }

        let expected = E::PRODUCT_TIERS.len();
        let mut out = Vec::with_capacity(page_rows.len());
        for entity in page_rows {
            let products = by_owner
                .remove(&entity.id().to_uuid())
                .unwrap_or_default();
            if products.len() < expected {
                warn!(
                    kind = %E::KIND,
                    id = %entity.id(),
                    expected,
                    found = products.len(),
                    "dropping entity with incomplete product set"
                );
                continue;
            }
            out.push((entity, products));
        }
        Ok(out)
    }

    pub async fn count(&self, vis: Visibility) -> Result<u64> {
        let entities = Arc::clone(&self.entities);
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move { entities.count(conn, vis).await })
        })
        .await
    }
}
