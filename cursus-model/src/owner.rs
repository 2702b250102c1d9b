use crate::entity::CatalogEntity;
use crate::goods::{Course, PhysicalGood, Seminar, TrainingSession};
use crate::ids::EntityId;
use crate::kind::EntityKind;
use crate::product::DetailsRef;

/// Closed set of entity kinds able to hold images. Built per request by an
/// owner adapter and dispatched by pattern matching; there is no open-ended
/// downcasting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Owner {
    Course(Course),
    Seminar(Seminar),
    TrainingSession(TrainingSession),
    PhysicalGood(PhysicalGood),
}

impl Owner {
    pub fn id(&self) -> EntityId {
        match self {
            Owner::Course(c) => c.id(),
            Owner::Seminar(s) => s.id(),
            Owner::TrainingSession(t) => t.id(),
            Owner::PhysicalGood(g) => g.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Owner::Course(_) => EntityKind::Course,
            Owner::Seminar(_) => EntityKind::Seminar,
            Owner::TrainingSession(_) => EntityKind::TrainingSession,
            Owner::PhysicalGood(_) => EntityKind::PhysicalGood,
        }
    }

    pub fn images_count(&self) -> i16 {
        match self {
            Owner::Course(c) => c.images_count(),
            Owner::Seminar(s) => s.images_count(),
            Owner::TrainingSession(t) => t.images_count(),
            Owner::PhysicalGood(g) => g.images_count(),
        }
    }

    pub fn in_stock(&self) -> bool {
        match self {
            Owner::Course(c) => c.in_stock(),
            Owner::Seminar(s) => s.in_stock(),
            Owner::TrainingSession(t) => t.in_stock(),
            Owner::PhysicalGood(g) => g.in_stock(),
        }
    }

    pub fn details_ref(&self) -> DetailsRef {
        DetailsRef::new(self.id(), self.kind())
    }
}

/// Conversion between a concrete entity and the owner envelope. Adapters use
/// the reverse direction to recover their kind; a mismatch there is a broken
/// caller contract.
pub trait OwnedEntity: CatalogEntity {
    fn into_owner(self) -> Owner;
    fn as_owner_mut(owner: &mut Owner) -> Option<&mut Self>;
    fn from_owner(owner: &Owner) -> Option<&Self>;
}

macro_rules! impl_owned_entity {
    ($ty:ident, $variant:ident) => {
        impl OwnedEntity for $ty {
            fn into_owner(self) -> Owner {
                Owner::$variant(self)
            }

            fn as_owner_mut(owner: &mut Owner) -> Option<&mut Self> {
                match owner {
                    Owner::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_owner(owner: &Owner) -> Option<&Self> {
                match owner {
                    Owner::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_owned_entity!(Course, Course);
impl_owned_entity!(Seminar, Seminar);
impl_owned_entity!(TrainingSession, TrainingSession);
impl_owned_entity!(PhysicalGood, PhysicalGood);

/// Field mask for batch owner writes issued by the image engine. Only the
/// flagged columns are written back from the in-memory owner values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OwnerFields {
    pub images_count: bool,
    pub in_stock: bool,
}

impl OwnerFields {
    pub const IMAGES_COUNT: Self = Self {
        images_count: true,
        in_stock: false,
    };

    pub fn is_empty(&self) -> bool {
        !self.images_count && !self.in_stock
    }
}
