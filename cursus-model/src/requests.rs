//! Orchestrator-facing create and update requests.
//!
//! Transport adapters deserialize into these shapes; validation happens in
//! `cursus-core` before any transaction opens.

use chrono::{DateTime, Utc};

use crate::product::SeminarPrices;
use crate::update::{
    CoursePatch, PhysicalGoodPatch, SeminarPatch, SeminarPricesPatch,
    TrainingSessionPatch,
};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateCourse {
    pub name: String,
    pub short_description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub topic: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub language: Option<String>,
    pub price: f64,
    pub access_duration_days: i32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateSeminar {
    pub name: String,
    pub short_description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub topic: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub speaker: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub payment_deadline: DateTime<Utc>,
    pub prices: SeminarPrices,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTrainingSession {
    pub name: String,
    pub short_description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub payment_deadline: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub capacity: Option<i32>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatePhysicalGood {
    pub name: String,
    pub short_description: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    pub sku: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weight_grams: Option<i32>,
    pub price: f64,
}

/// Desired values for a course update; fields left `None` are untouched.
/// The orchestrator diffs these against storage and persists only what
/// actually changed.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateCourse {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub course: CoursePatch,
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateSeminar {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub seminar: SeminarPatch,
    #[cfg_attr(feature = "serde", serde(default))]
    pub prices: SeminarPricesPatch,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateTrainingSession {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub session: TrainingSessionPatch,
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdatePhysicalGood {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub good: PhysicalGoodPatch,
    #[cfg_attr(feature = "serde", serde(default))]
    pub price: Option<f64>,
}
