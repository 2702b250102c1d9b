use chrono::{DateTime, Utc};

use crate::ids::EntityId;
use crate::kind::EntityKind;
use crate::product::{DetailsRef, ProductTier};
use crate::state::LifecycleState;

/// Capability shared by every primary catalog record.
///
/// The lifecycle orchestrator and the owner adapter are generic over this
/// trait; concrete kinds only add their descriptive fields on top.
pub trait CatalogEntity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    /// Tier layout of a complete product set for this kind.
    const PRODUCT_TIERS: &'static [ProductTier];

    fn id(&self) -> EntityId;

    fn created_at(&self) -> DateTime<Utc>;

    fn in_stock(&self) -> bool;
    fn set_in_stock(&mut self, in_stock: bool);

    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);

    fn images_count(&self) -> i16;
    fn set_images_count(&mut self, count: i16);

    fn touch(&mut self, now: DateTime<Utc>);

    fn state(&self) -> LifecycleState {
        LifecycleState::from_flags(self.in_stock(), self.deleted_at().is_some())
    }

    fn details_ref(&self) -> DetailsRef {
        DetailsRef::new(self.id(), Self::KIND)
    }
}

/// Single-tier layout shared by every kind except seminars.
pub(crate) const STANDARD_TIERS: &[ProductTier] = &[ProductTier::Standard];
