//! Repository ports consumed by the lifecycle orchestrator and the image
//! subsystem. Infrastructure adapters (Postgres, in-memory) implement these;
//! the services never see a concrete engine.

pub mod entities;
pub mod images;
pub mod parts;
pub mod products;

pub use entities::EntityRepository;
pub use images::ImageRepository;
pub use parts::PartRepository;
pub use products::ProductRepository;
