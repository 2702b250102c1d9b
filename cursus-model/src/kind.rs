use std::fmt::{Display, Formatter};

use crate::error::ModelError;

/// Closed discriminator for every sellable entity kind. Stored verbatim in
/// the polymorphic `details_type` column on products and images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "entity_kind", rename_all = "snake_case")
)]
pub enum EntityKind {
    Course,
    Seminar,
    TrainingSession,
    PhysicalGood,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::Seminar => "seminar",
            EntityKind::TrainingSession => "training_session",
            EntityKind::PhysicalGood => "physical_good",
        }
    }

    /// How many products a complete entity of this kind owns.
    pub fn product_count(&self) -> usize {
        match self {
            EntityKind::Seminar => 5,
            _ => 1,
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course" => Ok(EntityKind::Course),
            "seminar" => Ok(EntityKind::Seminar),
            "training_session" => Ok(EntityKind::TrainingSession),
            "physical_good" => Ok(EntityKind::PhysicalGood),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}
