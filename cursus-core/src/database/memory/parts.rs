use async_trait::async_trait;
use chrono::Utc;
use cursus_model::{CoursePart, EntityId};

use crate::database::memory::{MemoryConn, MemoryStorage};
use crate::database::ports::PartRepository;
use crate::error::Result;

/// In-memory adapter for course parts.
#[derive(Clone, Debug, Default)]
pub struct MemoryPartRepository;

impl MemoryPartRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PartRepository<MemoryStorage> for MemoryPartRepository {
    async fn insert(
        &self,
        conn: &mut MemoryConn,
        part: &CoursePart,
    ) -> Result<()> {
        conn.state_mut().parts.insert(part.id.to_uuid(), part.clone());
        Ok(())
    }

    async fn list_by_owner(
        &self,
        conn: &mut MemoryConn,
        owner: EntityId,
    ) -> Result<Vec<CoursePart>> {
        let mut rows: Vec<CoursePart> = conn
            .state()
            .parts
            .values()
            .filter(|p| p.course_id == owner && p.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id))
        });
        Ok(rows)
    }

    async fn set_published_by_owner(
        &self,
        conn: &mut MemoryConn,
        owner: EntityId,
        published: bool,
    ) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for part in conn.state_mut().parts.values_mut() {
            if part.course_id == owner && part.deleted_at.is_none() {
                part.published = published;
                part.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn soft_delete_by_owner(
        &self,
        conn: &mut MemoryConn,
        owner: EntityId,
    ) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for part in conn.state_mut().parts.values_mut() {
            if part.course_id == owner && part.deleted_at.is_none() {
                part.deleted_at = Some(now);
                part.published = false;
                part.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_permanent_by_owner(
        &self,
        conn: &mut MemoryConn,
        owner: EntityId,
    ) -> Result<u64> {
        let table = &mut conn.state_mut().parts;
        let before = table.len();
        table.retain(|_, p| p.course_id != owner);
        Ok((before - table.len()) as u64)
    }

    async fn restore_by_owner(
        &self,
        conn: &mut MemoryConn,
        owner: EntityId,
    ) -> Result<u64> {
        let now = Utc::now();
        let mut affected = 0;
        for part in conn.state_mut().parts.values_mut() {
            if part.course_id == owner && part.deleted_at.is_some() {
                part.deleted_at = None;
                part.updated_at = now;
                affected += 1;
            }
        }
        Ok(affected)
    }
}
