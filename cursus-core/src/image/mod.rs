//! Image attachment subsystem.
//!
//! The engine enforces the per-owner ceiling and the resolve-or-fail rules;
//! the owner adapter hides which entity kind is behind an attachment and
//! keeps the `images_count` bookkeeping column in step with the image rows.

pub mod adapter;
pub mod engine;

pub use adapter::{EntityOwnerAdapter, OwnerAdapter};
pub use engine::ImageEngine;
