use thiserror::Error;

/// Errors raised while constructing or converting model values.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("unknown product tier: {0}")]
    UnknownTier(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
