//! Typed partial-update vocabulary.
//!
//! Each entity kind has an explicit patch struct naming the fields the
//! update operation may legally touch; diffs pair the entity patch with the
//! product patch(es) it belongs to. Empty sections drop out of the
//! serialized form, so a price-only update serializes as
//! `{"product":{"price":59.99}}`.

use crate::goods::{Course, PhysicalGood, Seminar, TrainingSession};
use crate::product::{Product, ProductTier};

macro_rules! option_fields_empty {
    ($self:ident, $($field:ident),+ $(,)?) => {
        $( $self.$field.is_none() )&&+
    };
}

/// Mutable descriptive fields of a course.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoursePatch {
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub short_description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub topic: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub language: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub access_duration_days: Option<i32>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        option_fields_empty!(
            self,
            name,
            short_description,
            description,
            topic,
            language,
            access_duration_days,
        )
    }

    pub fn apply_to(&self, course: &mut Course) {
        if let Some(v) = &self.name {
            course.name = v.clone();
        }
        if let Some(v) = &self.short_description {
            course.short_description = v.clone();
        }
        if let Some(v) = &self.description {
            course.description = Some(v.clone());
        }
        if let Some(v) = &self.topic {
            course.topic = v.clone();
        }
        if let Some(v) = &self.language {
            course.language = Some(v.clone());
        }
        if let Some(v) = self.access_duration_days {
            course.access_duration_days = v;
        }
    }
}

/// Mutable descriptive fields of a seminar.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeminarPatch {
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub short_description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub topic: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub speaker: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub payment_deadline: Option<chrono::DateTime<chrono::Utc>>,
}

impl SeminarPatch {
    pub fn is_empty(&self) -> bool {
        option_fields_empty!(
            self,
            name,
            short_description,
            description,
            topic,
            speaker,
            starts_at,
            ends_at,
            payment_deadline,
        )
    }

    pub fn apply_to(&self, seminar: &mut Seminar) {
        if let Some(v) = &self.name {
            seminar.name = v.clone();
        }
        if let Some(v) = &self.short_description {
            seminar.short_description = v.clone();
        }
        if let Some(v) = &self.description {
            seminar.description = Some(v.clone());
        }
        if let Some(v) = &self.topic {
            seminar.topic = v.clone();
        }
        if let Some(v) = &self.speaker {
            seminar.speaker = Some(v.clone());
        }
        if let Some(v) = self.starts_at {
            seminar.starts_at = v;
        }
        if let Some(v) = self.ends_at {
            seminar.ends_at = v;
        }
        if let Some(v) = self.payment_deadline {
            seminar.payment_deadline = v;
        }
    }
}

/// Mutable descriptive fields of a training session.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrainingSessionPatch {
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub short_description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub starts_at: Option<chrono::DateTime<chrono::Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub ends_at: Option<chrono::DateTime<chrono::Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub payment_deadline: Option<chrono::DateTime<chrono::Utc>>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub capacity: Option<i32>,
}

impl TrainingSessionPatch {
    pub fn is_empty(&self) -> bool {
        option_fields_empty!(
            self,
            name,
            short_description,
            description,
            starts_at,
            ends_at,
            payment_deadline,
            capacity,
        )
    }

    pub fn apply_to(&self, session: &mut TrainingSession) {
        if let Some(v) = &self.name {
            session.name = v.clone();
        }
        if let Some(v) = &self.short_description {
            session.short_description = v.clone();
        }
        if let Some(v) = &self.description {
            session.description = Some(v.clone());
        }
        if let Some(v) = self.starts_at {
            session.starts_at = v;
        }
        if let Some(v) = self.ends_at {
            session.ends_at = v;
        }
        if let Some(v) = self.payment_deadline {
            session.payment_deadline = v;
        }
        if let Some(v) = self.capacity {
            session.capacity = Some(v);
        }
    }
}

/// Mutable descriptive fields of a physical good.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicalGoodPatch {
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub short_description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub description: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub sku: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub weight_grams: Option<i32>,
}

impl PhysicalGoodPatch {
    pub fn is_empty(&self) -> bool {
        option_fields_empty!(
            self,
            name,
            short_description,
            description,
            sku,
            weight_grams,
        )
    }

    pub fn apply_to(&self, good: &mut PhysicalGood) {
        if let Some(v) = &self.name {
            good.name = v.clone();
        }
        if let Some(v) = &self.short_description {
            good.short_description = v.clone();
        }
        if let Some(v) = &self.description {
            good.description = Some(v.clone());
        }
        if let Some(v) = &self.sku {
            good.sku = v.clone();
        }
        if let Some(v) = self.weight_grams {
            good.weight_grams = Some(v);
        }
    }
}

/// Mutable fields of a single product.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductPatch {
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub price: Option<f64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.price.is_none()
    }

    pub fn apply_to(&self, product: &mut Product) {
        if let Some(v) = self.price {
            product.price = v;
        }
    }
}

/// Per-tier price changes for a seminar's five products.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeminarPricesPatch {
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub reservation: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub early: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub late: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub early_surcharge: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(skip_serializing_if = "Option::is_none", default)
    )]
    pub late_surcharge: Option<f64>,
}

impl SeminarPricesPatch {
    pub fn is_empty(&self) -> bool {
        option_fields_empty!(
            self,
            reservation,
            early,
            late,
            early_surcharge,
            late_surcharge,
        )
    }

    pub fn for_tier(&self, tier: ProductTier) -> Option<f64> {
        match tier {
            ProductTier::Reservation => self.reservation,
            ProductTier::Early => self.early,
            ProductTier::Late => self.late,
            ProductTier::EarlySurcharge => self.early_surcharge,
            ProductTier::LateSurcharge => self.late_surcharge,
            ProductTier::Standard => None,
        }
    }

    pub fn set_tier(&mut self, tier: ProductTier, price: f64) {
        match tier {
            ProductTier::Reservation => self.reservation = Some(price),
            ProductTier::Early => self.early = Some(price),
            ProductTier::Late => self.late = Some(price),
            ProductTier::EarlySurcharge => {
                self.early_surcharge = Some(price);
            }
            ProductTier::LateSurcharge => self.late_surcharge = Some(price),
            ProductTier::Standard => {}
        }
    }
}

macro_rules! entity_diff {
    ($(#[$doc:meta])* $name:ident, $entity_key:ident, $entity_patch:ty, $entity_empty:literal, $product_key:ident, $product_patch:ty, $product_empty:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub struct $name {
            #[cfg_attr(
                feature = "serde",
                serde(skip_serializing_if = $entity_empty)
            )]
            pub $entity_key: $entity_patch,
            #[cfg_attr(
                feature = "serde",
                serde(skip_serializing_if = $product_empty)
            )]
            pub $product_key: $product_patch,
        }

        impl $name {
            pub fn is_empty(&self) -> bool {
                self.$entity_key.is_empty() && self.$product_key.is_empty()
            }
        }
    };
}

entity_diff! {
    /// Field-level difference between an update request and the stored
    /// course + product pair.
    CourseDiff, course, CoursePatch, "CoursePatch::is_empty",
    product, ProductPatch, "ProductPatch::is_empty"
}

entity_diff! {
    /// Field-level difference for a seminar and its five products.
    SeminarDiff, seminar, SeminarPatch, "SeminarPatch::is_empty",
    products, SeminarPricesPatch, "SeminarPricesPatch::is_empty"
}

entity_diff! {
    /// Field-level difference for a training session.
    TrainingSessionDiff, training_session, TrainingSessionPatch,
    "TrainingSessionPatch::is_empty",
    product, ProductPatch, "ProductPatch::is_empty"
}

entity_diff! {
    /// Field-level difference for a physical good.
    PhysicalGoodDiff, physical_good, PhysicalGoodPatch,
    "PhysicalGoodPatch::is_empty",
    product, ProductPatch, "ProductPatch::is_empty"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_empty() {
        assert!(CoursePatch::default().is_empty());
        assert!(ProductPatch::default().is_empty());
        assert!(CourseDiff::default().is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn price_only_diff_serializes_product_section_only() {
        let diff = CourseDiff {
            course: CoursePatch::default(),
            product: ProductPatch {
                price: Some(59.99),
            },
        };
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json, serde_json::json!({"product": {"price": 59.99}}));
    }
}
