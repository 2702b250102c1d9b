use std::collections::HashSet;

use async_trait::async_trait;
use cursus_model::{DetailsRef, EntityId, EntityKind, Image, MediaId};
use uuid::Uuid;

use crate::database::memory::{MemoryConn, MemoryStorage};
use crate::database::ports::ImageRepository;
use crate::error::Result;

/// In-memory adapter for image attachments.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageRepository;

impl MemoryImageRepository {
    pub fn new() -> Self {
        Self
    }
}

fn matches_owner(image: &Image, owner: DetailsRef) -> bool {
    image.owner_id == owner.id && image.owner_kind == owner.kind
}

#[async_trait]
impl ImageRepository<MemoryStorage> for MemoryImageRepository {
    async fn insert(&self, conn: &mut MemoryConn, image: &Image) -> Result<()> {
        conn.state_mut().images.push(image.clone());
        Ok(())
    }

    async fn insert_batch(
        &self,
        conn: &mut MemoryConn,
        images: &[Image],
    ) -> Result<()> {
        conn.state_mut().images.extend_from_slice(images);
        Ok(())
    }

    async fn delete(
        &self,
        conn: &mut MemoryConn,
        owner: DetailsRef,
        media: MediaId,
    ) -> Result<u64> {
        let images = &mut conn.state_mut().images;
        let before = images.len();
        images.retain(|i| !(matches_owner(i, owner) && i.media_id == media));
        Ok((before - images.len()) as u64)
    }

    async fn delete_by_media(
        &self,
        conn: &mut MemoryConn,
        kind: EntityKind,
        media: MediaId,
        owners: &[EntityId],
    ) -> Result<u64> {
        let wanted: HashSet<Uuid> =
            owners.iter().map(EntityId::to_uuid).collect();
        let images = &mut conn.state_mut().images;
        let before = images.len();
        images.retain(|i| {
            !(i.media_id == media
                && i.owner_kind == kind
                && wanted.contains(&i.owner_id.to_uuid()))
        });
        Ok((before - images.len()) as u64)
    }

    async fn list_by_owner(
        &self,
        conn: &mut MemoryConn,
        owner: DetailsRef,
    ) -> Result<Vec<Image>> {
        let mut rows: Vec<Image> = conn
            .state()
            .images
            .iter()
            .filter(|i| matches_owner(i, owner))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.media_id.cmp(&b.media_id))
        });
        Ok(rows)
    }

    async fn owners_with_media(
        &self,
        conn: &mut MemoryConn,
        kind: EntityKind,
        media: MediaId,
        candidates: &[EntityId],
    ) -> Result<Vec<EntityId>> {
        let wanted: HashSet<Uuid> =
            candidates.iter().map(EntityId::to_uuid).collect();
        let mut found: Vec<EntityId> = conn
            .state()
            .images
            .iter()
            .filter(|i| {
                i.media_id == media
                    && i.owner_kind == kind
                    && wanted.contains(&i.owner_id.to_uuid())
            })
            .map(|i| i.owner_id)
            .collect();
        found.sort();
        found.dedup();
        Ok(found)
    }
}
