use std::sync::Arc;

use cursus_model::{
    EntityId, Image, MAX_IMAGES_PER_OWNER, MediaId, NewImage, Owner,
};
use tracing::debug;

use crate::database::{Storage, with_tx};
use crate::error::{CatalogError, Result};
use crate::image::adapter::OwnerAdapter;

/// Attachment rules over one owner kind.
///
/// Single-owner operations fail loudly (NotFound, ImageLimitExceeded,
/// ImageNotFoundOnOwner); batch operations skip owners that cannot take the
/// change and only fail when nothing resolves at all. Every public operation
/// is one transaction.
pub struct ImageEngine<S: Storage> {
    storage: Arc<S>,
    adapter: Arc<dyn OwnerAdapter<S>>,
}

impl<S: Storage> std::fmt::Debug for ImageEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageEngine")
            .field("kind", &self.adapter.kind())
            .finish()
    }
}

impl<S: Storage> ImageEngine<S> {
    pub fn new(storage: Arc<S>, adapter: Arc<dyn OwnerAdapter<S>>) -> Self {
        Self { storage, adapter }
    }

    /// Attaches an image to one owner, refusing past the ceiling.
    pub async fn add_image(
        &self,
        raw_owner_id: &str,
        image: NewImage,
    ) -> Result<Image> {
        let id = EntityId::parse(raw_owner_id)?;
        let adapter = Arc::clone(&self.adapter);
        let kind = self.adapter.kind();
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                let owner = adapter
                    .get_with_unpublished(conn, id)
                    .await?
                    .ok_or_else(|| {
                        CatalogError::NotFound(format!("{kind} {id}"))
                    })?;
                if owner.images_count() >= MAX_IMAGES_PER_OWNER {
                    return Err(CatalogError::ImageLimitExceeded {
                        owner: id,
                        max: MAX_IMAGES_PER_OWNER,
                    });
                }
                adapter.add_image(conn, &owner, &image).await
            })
        })
        .await
    }

    /// Detaches one media id from one owner.
    pub async fn delete_image(
        &self,
        raw_owner_id: &str,
        media: MediaId,
    ) -> Result<()> {
        let id = EntityId::parse(raw_owner_id)?;
        let adapter = Arc::clone(&self.adapter);
        let kind = self.adapter.kind();
        with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                let owner = adapter
                    .get_with_unpublished(conn, id)
                    .await?
                    .ok_or_else(|| {
                        CatalogError::NotFound(format!("{kind} {id}"))
                    })?;
                if adapter.delete_image(conn, &owner, media).await? == 0 {
                    return Err(CatalogError::ImageNotFoundOnOwner {
                        owner: id,
                        media,
                    });
                }
                adapter.decrement_image_count(conn, &[id]).await?;
                Ok(())
            })
        })
        .await
    }

    /// Attaches the same media to many owners. Owners that do not resolve,
    /// or that already sit at the ceiling, are skipped; the count of owners
    /// actually written comes back. Fails only when zero owners resolve.
    pub async fn add_image_batch(
        &self,
        raw_owner_ids: &[&str],
        image: NewImage,
    ) -> Result<u64> {
        let ids = parse_ids(raw_owner_ids)?;
        let adapter = Arc::clone(&self.adapter);
        let affected = with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                let owners = adapter
                    .list_with_unpublished_by_ids(conn, &ids)
                    .await?;
                if owners.is_empty() {
                    return Err(CatalogError::OwnersNotFound);
                }
                let eligible: Vec<Owner> = owners
                    .into_iter()
                    .filter(|o| o.images_count() < MAX_IMAGES_PER_OWNER)
                    .collect();
                if eligible.is_empty() {
                    return Ok(0);
                }
                adapter.add_image_batch(conn, &eligible, &image).await
            })
        })
        .await?;
        debug!(kind = %self.adapter.kind(), affected, "batch image attach");
        Ok(affected)
    }

    /// Detaches one media id from every owner currently holding it. Fails
    /// only when none of the candidates do.
    pub async fn delete_image_batch(
        &self,
        raw_owner_ids: &[&str],
        media: MediaId,
    ) -> Result<u64> {
        let ids = parse_ids(raw_owner_ids)?;
        let adapter = Arc::clone(&self.adapter);
        let affected = with_tx(&*self.storage, move |conn| {
            Box::pin(async move {
                let holders = adapter
                    .find_owner_ids_by_image_id(conn, media, &ids)
                    .await?;
                if holders.is_empty() {
                    return Err(CatalogError::OwnersNotFound);
                }
                adapter
                    .delete_image_batch(conn, media, &holders)
                    .await?;
                adapter.decrement_image_count(conn, &holders).await?;
                Ok(holders.len() as u64)
            })
        })
        .await?;
        debug!(kind = %self.adapter.kind(), affected, "batch image detach");
        Ok(affected)
    }
}

fn parse_ids(raw: &[&str]) -> Result<Vec<EntityId>> {
    raw.iter().map(|r| Ok(EntityId::parse(r)?)).collect()
}
