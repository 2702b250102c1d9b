use cursus_model::{EntityId, MediaId, ModelError};
use thiserror::Error;

/// Sentinel error kinds surfaced to the transport layer. Status-code and
/// wire mapping happen there; the core only classifies.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("incomplete data: {0}")]
    IncompleteData(String),

    #[error("products not found: expected {expected}, found {found}")]
    ProductsNotFound { expected: usize, found: usize },

    #[error("owner {owner} already holds the maximum of {max} images")]
    ImageLimitExceeded { owner: EntityId, max: i16 },

    #[error("image {media} is not attached to owner {owner}")]
    ImageNotFoundOnOwner { owner: EntityId, media: MediaId },

    #[error("none of the candidate owners resolved")]
    OwnersNotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ModelError> for CatalogError {
    fn from(err: ModelError) -> Self {
        CatalogError::InvalidArgument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
