use chrono::{DateTime, Utc};

use crate::error::ModelError;
use crate::ids::{EntityId, ProductId};
use crate::kind::EntityKind;

/// Polymorphic foreign key tying a product (or image) to the entity that
/// owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailsRef {
    pub id: EntityId,
    pub kind: EntityKind,
}

impl DetailsRef {
    pub fn new(id: EntityId, kind: EntityKind) -> Self {
        Self { id, kind }
    }
}

/// Price-point role within an entity. Single-product kinds only ever use
/// `Standard`; seminars carry one product per remaining tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "product_tier", rename_all = "snake_case")
)]
pub enum ProductTier {
    Standard,
    Reservation,
    Early,
    Late,
    EarlySurcharge,
    LateSurcharge,
}

impl ProductTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductTier::Standard => "standard",
            ProductTier::Reservation => "reservation",
            ProductTier::Early => "early",
            ProductTier::Late => "late",
            ProductTier::EarlySurcharge => "early_surcharge",
            ProductTier::LateSurcharge => "late_surcharge",
        }
    }
}

impl std::fmt::Display for ProductTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductTier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ProductTier::Standard),
            "reservation" => Ok(ProductTier::Reservation),
            "early" => Ok(ProductTier::Early),
            "late" => Ok(ProductTier::Late),
            "early_surcharge" => Ok(ProductTier::EarlySurcharge),
            "late_surcharge" => Ok(ProductTier::LateSurcharge),
            other => Err(ModelError::UnknownTier(other.to_string())),
        }
    }
}

/// Purchasable price point. `in_stock` mirrors the owning entity after every
/// completed lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub tier: ProductTier,
    pub price: f64,
    pub in_stock: bool,
    pub details_id: EntityId,
    pub details_type: EntityKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn new(details: DetailsRef, tier: ProductTier, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            tier,
            price,
            in_stock: false,
            details_id: details.id,
            details_type: details.kind,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn details_ref(&self) -> DetailsRef {
        DetailsRef::new(self.details_id, self.details_type)
    }
}

/// The five seminar price points, in tier order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeminarPrices {
    pub reservation: f64,
    pub early: f64,
    pub late: f64,
    pub early_surcharge: f64,
    pub late_surcharge: f64,
}

impl SeminarPrices {
    pub const TIERS: [ProductTier; 5] = [
        ProductTier::Reservation,
        ProductTier::Early,
        ProductTier::Late,
        ProductTier::EarlySurcharge,
        ProductTier::LateSurcharge,
    ];

    pub fn for_tier(&self, tier: ProductTier) -> Option<f64> {
        match tier {
            ProductTier::Reservation => Some(self.reservation),
            ProductTier::Early => Some(self.early),
            ProductTier::Late => Some(self.late),
            ProductTier::EarlySurcharge => Some(self.early_surcharge),
            ProductTier::LateSurcharge => Some(self.late_surcharge),
            ProductTier::Standard => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProductTier, f64)> + '_ {
        Self::TIERS.iter().filter_map(|tier| {
            self.for_tier(*tier).map(|price| (*tier, price))
        })
    }
}
