use chrono::{DateTime, Utc};

use crate::ids::{EntityId, PartId};

/// Nested child of a course. Publication is subordinate to the owner: an
/// unpublished or soft-deleted course forces every part unpublished.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CoursePart {
    pub id: PartId,
    pub course_id: EntityId,
    pub position: i32,
    pub title: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CoursePart {
    pub fn new(course_id: EntityId, position: i32, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PartId::new(),
            course_id,
            position,
            title: title.into(),
            published: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
