use std::sync::Arc;

use async_trait::async_trait;
use cursus_model::{
    EntityId, EntityKind, Image, MediaId, NewImage, OwnedEntity, Owner,
    OwnerFields,
};

use crate::database::Storage;
use crate::database::ports::{EntityRepository, ImageRepository};
use crate::error::{CatalogError, Result};

/// Kind-erased owner access used by the image engine.
///
/// One adapter serves one entity kind; every method runs on the caller's
/// transaction. The engine never sees concrete entity types, only the
/// [`Owner`] envelope.
#[async_trait]
pub trait OwnerAdapter<S: Storage>: Send + Sync {
    fn kind(&self) -> EntityKind;

    async fn get_with_unpublished(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
    ) -> Result<Option<Owner>>;

    async fn list_with_unpublished_by_ids(
        &self,
        conn: &mut S::Conn,
        ids: &[EntityId],
    ) -> Result<Vec<Owner>>;

    /// Attaches one image to one owner and bumps its `images_count`.
    async fn add_image(
        &self,
        conn: &mut S::Conn,
        owner: &Owner,
        image: &NewImage,
    ) -> Result<Image>;

    /// Attaches the same media to every listed owner in one pass.
    async fn add_image_batch(
        &self,
        conn: &mut S::Conn,
        owners: &[Owner],
        image: &NewImage,
    ) -> Result<u64>;

    /// Detaches one media id from one owner; zero means it was not there.
    async fn delete_image(
        &self,
        conn: &mut S::Conn,
        owner: &Owner,
        media: MediaId,
    ) -> Result<u64>;

    async fn delete_image_batch(
        &self,
        conn: &mut S::Conn,
        media: MediaId,
        owners: &[EntityId],
    ) -> Result<u64>;

    /// Writes back the masked owner columns from in-memory values.
    async fn batch_update(
        &self,
        conn: &mut S::Conn,
        owners: &[Owner],
        fields: OwnerFields,
    ) -> Result<u64>;

    /// Filters `candidates` down to owners actually holding `media`.
    async fn find_owner_ids_by_image_id(
        &self,
        conn: &mut S::Conn,
        media: MediaId,
        candidates: &[EntityId],
    ) -> Result<Vec<EntityId>>;

    async fn decrement_image_count(
        &self,
        conn: &mut S::Conn,
        ids: &[EntityId],
    ) -> Result<u64>;
}

/// Positions append after the owner's current maximum, so deleting an
/// earlier image never leads to a reused slot.
fn next_position(images: &[Image]) -> i16 {
    images.iter().map(|i| i.position).max().map_or(0, |p| p + 1)
}

/// [`OwnerAdapter`] over one entity repository plus the image repository.
pub struct EntityOwnerAdapter<S, E, P>
where
    S: Storage,
    E: OwnedEntity,
    P: Send + Sync,
{
    entities: Arc<dyn EntityRepository<S, Entity = E, Patch = P>>,
    images: Arc<dyn ImageRepository<S>>,
}

impl<S, E, P> std::fmt::Debug for EntityOwnerAdapter<S, E, P>
where
    S: Storage,
    E: OwnedEntity,
    P: Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityOwnerAdapter")
            .field("kind", &E::KIND)
            .finish()
    }
}

impl<S, E, P> EntityOwnerAdapter<S, E, P>
where
    S: Storage,
    E: OwnedEntity,
    P: Send + Sync,
{
    pub fn new(
        entities: Arc<dyn EntityRepository<S, Entity = E, Patch = P>>,
        images: Arc<dyn ImageRepository<S>>,
    ) -> Self {
        Self { entities, images }
    }

    /// Recovers the concrete kind from the envelope. The engine only hands
    /// an adapter owners that adapter produced, so a mismatch is a broken
    /// caller contract, not routine input.
    fn expect_kind<'o>(&self, owner: &'o Owner) -> Result<&'o E> {
        match E::from_owner(owner) {
            Some(entity) => Ok(entity),
            None => {
                debug_assert!(
                    false,
                    "owner kind {} routed to {} adapter",
                    owner.kind(),
                    E::KIND
                );
                Err(CatalogError::Internal(format!(
                    "owner kind {} routed to {} adapter",
                    owner.kind(),
                    E::KIND
                )))
            }
        }
    }
}

#[async_trait]
impl<S, E, P> OwnerAdapter<S> for EntityOwnerAdapter<S, E, P>
where
    S: Storage,
    E: OwnedEntity,
    P: Send + Sync + 'static,
{
    fn kind(&self) -> EntityKind {
        E::KIND
    }

    async fn get_with_unpublished(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
    ) -> Result<Option<Owner>> {
        let entity = self
            .entities
            .get(conn, id, cursus_model::Visibility::WithUnpublished)
            .await?;
        Ok(entity.map(OwnedEntity::into_owner))
    }

    async fn list_with_unpublished_by_ids(
        &self,
        conn: &mut S::Conn,
        ids: &[EntityId],
    ) -> Result<Vec<Owner>> {
        let entities = self
            .entities
            .list_by_ids(
                conn,
                ids,
                cursus_model::Visibility::WithUnpublished,
            )
            .await?;
        Ok(entities.into_iter().map(OwnedEntity::into_owner).collect())
    }

    async fn add_image(
        &self,
        conn: &mut S::Conn,
        owner: &Owner,
        image: &NewImage,
    ) -> Result<Image> {
        let entity = self.expect_kind(owner)?;
        let existing = self
            .images
            .list_by_owner(conn, entity.details_ref())
            .await?;
        let attached =
            image.attach(entity.details_ref(), next_position(&existing));
        self.images.insert(conn, &attached).await?;
        self.entities
            .adjust_images_count(conn, &[entity.id()], 1)
            .await?;
        Ok(attached)
    }

    async fn add_image_batch(
        &self,
        conn: &mut S::Conn,
        owners: &[Owner],
        image: &NewImage,
    ) -> Result<u64> {
        let mut rows = Vec::with_capacity(owners.len());
        let mut ids = Vec::with_capacity(owners.len());
        for owner in owners {
            let entity = self.expect_kind(owner)?;
            let existing = self
                .images
                .list_by_owner(conn, entity.details_ref())
                .await?;
            rows.push(
                image.attach(entity.details_ref(), next_position(&existing)),
            );
            ids.push(entity.id());
        }
        self.images.insert_batch(conn, &rows).await?;
        self.entities.adjust_images_count(conn, &ids, 1).await?;
        Ok(rows.len() as u64)
    }

    async fn delete_image(
        &self,
        conn: &mut S::Conn,
        owner: &Owner,
        media: MediaId,
    ) -> Result<u64> {
        let entity = self.expect_kind(owner)?;
        self.images
            .delete(conn, entity.details_ref(), media)
            .await
    }

    async fn delete_image_batch(
        &self,
        conn: &mut S::Conn,
        media: MediaId,
        owners: &[EntityId],
    ) -> Result<u64> {
        self.images
            .delete_by_media(conn, E::KIND, media, owners)
            .await
    }

    async fn batch_update(
        &self,
        conn: &mut S::Conn,
        owners: &[Owner],
        fields: OwnerFields,
    ) -> Result<u64> {
        let mut entities = Vec::with_capacity(owners.len());
        for owner in owners {
            entities.push(self.expect_kind(owner)?.clone());
        }
        self.entities
            .write_owner_fields(conn, &entities, fields)
            .await
    }

    async fn find_owner_ids_by_image_id(
        &self,
        conn: &mut S::Conn,
        media: MediaId,
        candidates: &[EntityId],
    ) -> Result<Vec<EntityId>> {
        self.images
            .owners_with_media(conn, E::KIND, media, candidates)
            .await
    }

    async fn decrement_image_count(
        &self,
        conn: &mut S::Conn,
        ids: &[EntityId],
    ) -> Result<u64> {
        self.entities.adjust_images_count(conn, ids, -1).await
    }
}
