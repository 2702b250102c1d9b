//! Core data model definitions shared across Cursus crates.

pub mod entity;
pub mod error;
pub mod goods;
pub mod ids;
pub mod image;
pub mod kind;
pub mod owner;
pub mod page;
pub mod part;
pub mod product;
pub mod requests;
pub mod state;
pub mod update;
pub mod visibility;

// Intentionally curated re-exports for downstream consumers.
pub use entity::CatalogEntity;
pub use error::{ModelError, Result as ModelResult};
pub use goods::{Course, PhysicalGood, Seminar, TrainingSession};
pub use ids::{EntityId, MediaId, PartId, ProductId};
pub use image::{Image, NewImage, MAX_IMAGES_PER_OWNER};
pub use kind::EntityKind;
pub use owner::{OwnedEntity, Owner, OwnerFields};
pub use page::Page;
pub use part::CoursePart;
pub use product::{DetailsRef, Product, ProductTier, SeminarPrices};
pub use requests::{
    CreateCourse, CreatePhysicalGood, CreateSeminar, CreateTrainingSession,
    UpdateCourse, UpdatePhysicalGood, UpdateSeminar, UpdateTrainingSession,
};
pub use state::LifecycleState;
pub use update::{
    CourseDiff, CoursePatch, PhysicalGoodDiff, PhysicalGoodPatch,
    ProductPatch, SeminarDiff, SeminarPatch, SeminarPricesPatch,
    TrainingSessionDiff, TrainingSessionPatch,
};
pub use visibility::Visibility;
