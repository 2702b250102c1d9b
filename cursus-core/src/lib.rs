//! Catalog core: lifecycle orchestration, image attachment rules and the
//! storage adapters behind them.
//!
//! Transport layers sit on top of the per-kind services and the image
//! engine; nothing in here knows about HTTP or message framing.

pub mod config;
pub mod database;
pub mod error;
pub mod image;
pub mod service;
pub mod validate;

/// Embedded schema migrations, applied via [`PostgresStorage::migrate`].
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use config::DatabaseConfig;
pub use database::Storage;
pub use database::memory::MemoryStorage;
pub use database::postgres::PostgresStorage;
pub use error::{CatalogError, Result};
pub use image::{EntityOwnerAdapter, ImageEngine, OwnerAdapter};
pub use service::{
    CourseService, Lifecycle, PhysicalGoodService, SeminarService,
    TrainingSessionService,
};
