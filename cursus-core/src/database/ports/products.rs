use async_trait::async_trait;
use cursus_model::{
    DetailsRef, EntityId, EntityKind, Product, ProductId, ProductPatch,
    Visibility,
};

use crate::database::Storage;
use crate::error::Result;

/// Persistence port for price points, keyed by the polymorphic
/// `(details_id, details_type)` reference to the owning entity.
#[async_trait]
pub trait ProductRepository<S: Storage>: Send + Sync {
    /// Inserts a complete product set; multi-product kinds pass all tiers
    /// at once.
    async fn insert_batch(
        &self,
        conn: &mut S::Conn,
        products: &[Product],
    ) -> Result<()>;

    async fn list_by_details(
        &self,
        conn: &mut S::Conn,
        details: DetailsRef,
        vis: Visibility,
    ) -> Result<Vec<Product>>;

    /// One round trip for a whole page of owners.
    async fn list_by_details_batch(
        &self,
        conn: &mut S::Conn,
        kind: EntityKind,
        ids: &[EntityId],
        vis: Visibility,
    ) -> Result<Vec<Product>>;

    async fn update(
        &self,
        conn: &mut S::Conn,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<u64>;

    async fn set_in_stock_by_details(
        &self,
        conn: &mut S::Conn,
        details: DetailsRef,
        in_stock: bool,
    ) -> Result<u64>;

    async fn soft_delete_by_details(
        &self,
        conn: &mut S::Conn,
        details: DetailsRef,
    ) -> Result<u64>;

    async fn delete_permanent_by_details(
        &self,
        conn: &mut S::Conn,
        details: DetailsRef,
    ) -> Result<u64>;

    async fn restore_by_details(
        &self,
        conn: &mut S::Conn,
        details: DetailsRef,
    ) -> Result<u64>;
}
