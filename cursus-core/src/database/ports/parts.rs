use async_trait::async_trait;
use cursus_model::{CoursePart, EntityId};

use crate::database::Storage;
use crate::error::Result;

/// Persistence port for nested sub-items, always addressed through the
/// owning entity. Cascades tolerate owners without parts; every method just
/// reports how many rows it touched.
#[async_trait]
pub trait PartRepository<S: Storage>: Send + Sync {
    async fn insert(
        &self,
        conn: &mut S::Conn,
        part: &CoursePart,
    ) -> Result<()>;

    async fn list_by_owner(
        &self,
        conn: &mut S::Conn,
        owner: EntityId,
    ) -> Result<Vec<CoursePart>>;

    async fn set_published_by_owner(
        &self,
        conn: &mut S::Conn,
        owner: EntityId,
        published: bool,
    ) -> Result<u64>;

    async fn soft_delete_by_owner(
        &self,
        conn: &mut S::Conn,
        owner: EntityId,
    ) -> Result<u64>;

    async fn delete_permanent_by_owner(
        &self,
        conn: &mut S::Conn,
        owner: EntityId,
    ) -> Result<u64>;

    async fn restore_by_owner(
        &self,
        conn: &mut S::Conn,
        owner: EntityId,
    ) -> Result<u64>;
}
