use async_trait::async_trait;
use cursus_model::{CatalogEntity, EntityId, OwnerFields, Page, Visibility};

use crate::database::Storage;
use crate::error::Result;

/// Per-kind persistence port for primary catalog records.
///
/// Mutating calls report affected-row counts; the orchestrator decides what
/// a zero means (NotFound on the primary record, tolerated on cascades).
/// Every method runs on the caller's transaction.
#[async_trait]
pub trait EntityRepository<S: Storage>: Send + Sync {
    type Entity: CatalogEntity;
    type Patch: Send + Sync;

    async fn insert(
        &self,
        conn: &mut S::Conn,
        entity: &Self::Entity,
    ) -> Result<()>;

    async fn get(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
        vis: Visibility,
    ) -> Result<Option<Self::Entity>>;

    async fn list(
        &self,
        conn: &mut S::Conn,
        vis: Visibility,
        page: Page,
    ) -> Result<Vec<Self::Entity>>;

    /// Batch fetch preserving only rows inside the tier; missing ids are
    /// simply absent from the result.
    async fn list_by_ids(
        &self,
        conn: &mut S::Conn,
        ids: &[EntityId],
        vis: Visibility,
    ) -> Result<Vec<Self::Entity>>;

    async fn count(&self, conn: &mut S::Conn, vis: Visibility)
    -> Result<u64>;

    /// Applies the non-empty fields of `patch` to a live (not soft-deleted)
    /// row.
    async fn update(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
        patch: &Self::Patch,
    ) -> Result<u64>;

    async fn set_in_stock(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
        in_stock: bool,
    ) -> Result<u64>;

    /// Shifts `images_count` by `delta` on every listed row, clamped at
    /// zero.
    async fn adjust_images_count(
        &self,
        conn: &mut S::Conn,
        ids: &[EntityId],
        delta: i16,
    ) -> Result<u64>;

    /// Writes back only the masked columns from in-memory owner values.
    async fn write_owner_fields(
        &self,
        conn: &mut S::Conn,
        owners: &[Self::Entity],
        fields: OwnerFields,
    ) -> Result<u64>;

    /// Soft delete: stamps `deleted_at` and forces `in_stock = false`.
    async fn soft_delete(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
    ) -> Result<u64>;

    async fn delete_permanent(
        &self,
        conn: &mut S::Conn,
        id: EntityId,
    ) -> Result<u64>;

    /// Clears `deleted_at`; the row stays unpublished.
    async fn restore(&self, conn: &mut S::Conn, id: EntityId) -> Result<u64>;
}
