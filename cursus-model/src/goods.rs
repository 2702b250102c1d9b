use chrono::{DateTime, Utc};

use crate::entity::{CatalogEntity, STANDARD_TIERS};
use crate::ids::EntityId;
use crate::kind::EntityKind;
use crate::product::{ProductTier, SeminarPrices};

macro_rules! impl_catalog_entity {
    ($ty:ident, $kind:expr, $tiers:expr) => {
        impl CatalogEntity for $ty {
            const KIND: EntityKind = $kind;
            const PRODUCT_TIERS: &'static [ProductTier] = $tiers;

            fn id(&self) -> EntityId {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn in_stock(&self) -> bool {
                self.in_stock
            }

            fn set_in_stock(&mut self, in_stock: bool) {
                self.in_stock = in_stock;
            }

            fn deleted_at(&self) -> Option<DateTime<Utc>> {
                self.deleted_at
            }

            fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>) {
                self.deleted_at = at;
            }

            fn images_count(&self) -> i16 {
                self.images_count
            }

            fn set_images_count(&mut self, count: i16) {
                self.images_count = count;
            }

            fn touch(&mut self, now: DateTime<Utc>) {
                self.updated_at = now;
            }
        }
    };
}

/// Self-paced course. Owns one product and zero or more parts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Course {
    pub id: EntityId,
    pub name: String,
    pub short_description: String,
    pub description: Option<String>,
    pub topic: String,
    pub language: Option<String>,
    pub access_duration_days: i32,
    pub images_count: i16,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_catalog_entity!(Course, EntityKind::Course, STANDARD_TIERS);

/// Scheduled seminar. Owns five products, one per pricing tier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Seminar {
    pub id: EntityId,
    pub name: String,
    pub short_description: String,
    pub description: Option<String>,
    pub topic: String,
    pub speaker: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub payment_deadline: DateTime<Utc>,
    pub images_count: i16,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_catalog_entity!(
    Seminar,
    EntityKind::Seminar,
    &SeminarPrices::TIERS
);

/// Instructor-led training session with a single price point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TrainingSession {
    pub id: EntityId,
    pub name: String,
    pub short_description: String,
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub payment_deadline: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub images_count: i16,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_catalog_entity!(
    TrainingSession,
    EntityKind::TrainingSession,
    STANDARD_TIERS
);

/// Shippable physical good.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PhysicalGood {
    pub id: EntityId,
    pub name: String,
    pub short_description: String,
    pub description: Option<String>,
    pub sku: String,
    pub weight_grams: Option<i32>,
    pub images_count: i16,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_catalog_entity!(
    PhysicalGood,
    EntityKind::PhysicalGood,
    STANDARD_TIERS
);
