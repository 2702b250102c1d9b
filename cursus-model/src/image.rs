use chrono::{DateTime, Utc};

use crate::ids::{EntityId, MediaId};
use crate::kind::EntityKind;
use crate::product::DetailsRef;

/// Hard ceiling on images attached to a single owner.
pub const MAX_IMAGES_PER_OWNER: i16 = 5;

/// Image metadata attached to an owner. The media id references the
/// external media store; only bookkeeping lives here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Image {
    pub media_id: MediaId,
    pub owner_id: EntityId,
    pub owner_kind: EntityKind,
    pub url: String,
    pub secure_url: Option<String>,
    pub alt: Option<String>,
    pub position: i16,
    pub created_at: DateTime<Utc>,
}

impl Image {
    pub fn owner_ref(&self) -> DetailsRef {
        DetailsRef::new(self.owner_id, self.owner_kind)
    }
}

/// Attachment request carried into the image engine; the owner reference is
/// resolved by the engine, not the caller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NewImage {
    pub media_id: MediaId,
    pub url: String,
    pub secure_url: Option<String>,
    pub alt: Option<String>,
}

impl NewImage {
    /// Materializes the attachment for a resolved owner.
    pub fn attach(&self, owner: DetailsRef, position: i16) -> Image {
        Image {
            media_id: self.media_id,
            owner_id: owner.id,
            owner_kind: owner.kind,
            url: self.url.clone(),
            secure_url: self.secure_url.clone(),
            alt: self.alt.clone(),
            position,
            created_at: Utc::now(),
        }
    }
}
