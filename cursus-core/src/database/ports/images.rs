use async_trait::async_trait;
use cursus_model::{DetailsRef, EntityId, EntityKind, Image, MediaId};

use crate::database::Storage;
use crate::error::Result;

/// Persistence port for image attachments. Rows are keyed by the owner
/// reference plus the external media id; the per-owner ceiling is enforced
/// above this port, in the image engine.
#[async_trait]
pub trait ImageRepository<S: Storage>: Send + Sync {
    async fn insert(&self, conn: &mut S::Conn, image: &Image) -> Result<()>;

    async fn insert_batch(
        &self,
        conn: &mut S::Conn,
        images: &[Image],
    ) -> Result<()>;

    async fn delete(
        &self,
        conn: &mut S::Conn,
        owner: DetailsRef,
        media: MediaId,
    ) -> Result<u64>;

    /// Detaches one media id from every listed owner of the given kind.
    async fn delete_by_media(
        &self,
        conn: &mut S::Conn,
        kind: EntityKind,
        media: MediaId,
        owners: &[EntityId],
    ) -> Result<u64>;

    /// Rows for one owner, ordered by position. Attachment positions are
    /// derived from this.
    async fn list_by_owner(
        &self,
        conn: &mut S::Conn,
        owner: DetailsRef,
    ) -> Result<Vec<Image>>;

    /// Filters `candidates` down to the owners actually holding `media`.
    async fn owners_with_media(
        &self,
        conn: &mut S::Conn,
        kind: EntityKind,
        media: MediaId,
        candidates: &[EntityId],
    ) -> Result<Vec<EntityId>>;
}
