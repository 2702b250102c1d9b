use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use cursus_model::{
    CatalogEntity, Course, CoursePatch, EntityId, OwnerFields, Page,
    PhysicalGood, PhysicalGoodPatch, Seminar, SeminarPatch, TrainingSession,
    TrainingSessionPatch, Visibility,
};
use uuid::Uuid;

use crate::database::memory::{MemoryConn, MemoryState, MemoryStorage};
use crate::database::ports::EntityRepository;
use crate::error::Result;

/// Table access for one entity kind inside [`MemoryState`].
pub trait MemoryEntity: CatalogEntity {
    type Patch: Send + Sync;

    fn table(state: &MemoryState) -> &HashMap<Uuid, Self>;
    fn table_mut(state: &mut MemoryState) -> &mut HashMap<Uuid, Self>;
    fn apply_patch(patch: &Self::Patch, entity: &mut Self);
}

/// In-memory counterpart of the Postgres entity adapter, sharing the same
/// affected-row semantics.
#[derive(Debug)]
pub struct MemoryEntityRepository<E> {
    _kind: PhantomData<fn() -> E>,
}

impl<E> MemoryEntityRepository<E> {
    pub fn new() -> Self {
        Self { _kind: PhantomData }
    }
}

impl<E> Default for MemoryEntityRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_page<E: CatalogEntity>(mut rows: Vec<E>, page: Option<Page>) -> Vec<E> {
    rows.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(&b.id()))
    });
    match page {
        Some(page) => rows
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .collect(),
        None => rows,
    }
}

#[async_trait]
impl<E: MemoryEntity> EntityRepository<MemoryStorage>
    for MemoryEntityRepository<E>
{
    type Entity = E;
    type Patch = E::Patch;

    async fn insert(&self, conn: &mut MemoryConn, entity: &E) -> Result<()> {
        E::table_mut(conn.state_mut())
            .insert(entity.id().to_uuid(), entity.clone());
        Ok(())
    }

    async fn get(
        &self,
        conn: &mut MemoryConn,
        id: EntityId,
        vis: Visibility,
    ) -> Result<Option<E>> {
        Ok(E::table(conn.state())
            .get(&id.to_uuid())
            .filter(|e| vis.admits(e.in_stock(), e.deleted_at().is_some()))
            .cloned())
    }

    async fn list(
        &self,
        conn: &mut MemoryConn,
        vis: Visibility,
        page: Page,
    ) -> Result<Vec<E>> {
        let rows: Vec<E> = E::table(conn.state())
            .values()
            .filter(|e| vis.admits(e.in_stock(), e.deleted_at().is_some()))
            .cloned()
            .collect();
        Ok(sorted_page(rows, Some(page)))
    }

    async fn list_by_ids(
        &self,
        conn: &mut MemoryConn,
        ids: &[EntityId],
        vis: Visibility,
    ) -> Result<Vec<E>> {
        let wanted: HashSet<Uuid> =
            ids.iter().map(EntityId::to_uuid).collect();
        let rows: Vec<E> = E::table(conn.state())
            .values()
            .filter(|e| wanted.contains(&e.id().to_uuid()))
            .filter(|e| vis.admits(e.in_stock(), e.deleted_at().is_some()))
            .cloned()
            .collect();
        Ok(sorted_page(rows, None))
    }

    async fn count(
        &self,
        conn: &mut MemoryConn,
        vis: Visibility,
    ) -> Result<u64> {
        Ok(E::table(conn.state())
            .values()
            .filter(|e| vis.admits(e.in_stock(), e.deleted_at().is_some()))
            .count() as u64)
    }

    async fn update(
        &self,
        conn: &mut MemoryConn,
        id: EntityId,
        patch: &E::Patch,
    ) -> Result<u64> {
        match E::table_mut(conn.state_mut()).get_mut(&id.to_uuid()) {
            Some(entity) if entity.deleted_at().is_none() => {
                E::apply_patch(patch, entity);
                entity.touch(Utc::now());
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn set_in_stock(
        &self,
        conn: &mut MemoryConn,
        id: EntityId,
        in_stock: bool,
    ) -> Result<u64> {
        match E::table_mut(conn.state_mut()).get_mut(&id.to_uuid()) {
            Some(entity) if entity.deleted_at().is_none() => {
                entity.set_in_stock(in_stock);
                entity.touch(Utc::now());
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn adjust_images_count(
        &self,
        conn: &mut MemoryConn,
        ids: &[EntityId],
        delta: i16,
    ) -> Result<u64> {
        let table = E::table_mut(conn.state_mut());
        let mut affected = 0;
        for id in ids {
            if let Some(entity) = table.get_mut(&id.to_uuid()) {
                let next = (entity.images_count() + delta).max(0);
                entity.set_images_count(next);
                entity.touch(Utc::now());
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn write_owner_fields(
        &self,
        conn: &mut MemoryConn,
        owners: &[E],
        fields: OwnerFields,
    ) -> Result<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let table = E::table_mut(conn.state_mut());
        let mut affected = 0;
        for owner in owners {
            if let Some(entity) = table.get_mut(&owner.id().to_uuid()) {
                if fields.images_count {
                    entity.set_images_count(owner.images_count());
                }
                if fields.in_stock {
                    entity.set_in_stock(owner.in_stock());
                }
                entity.touch(Utc::now());
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn soft_delete(
        &self,
        conn: &mut MemoryConn,
        id: EntityId,
    ) -> Result<u64> {
        match E::table_mut(conn.state_mut()).get_mut(&id.to_uuid()) {
            Some(entity) if entity.deleted_at().is_none() => {
                let now = Utc::now();
                entity.set_deleted_at(Some(now));
                entity.set_in_stock(false);
                entity.touch(now);
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_permanent(
        &self,
        conn: &mut MemoryConn,
        id: EntityId,
    ) -> Result<u64> {
        match E::table_mut(conn.state_mut()).remove(&id.to_uuid()) {
            Some(_) => Ok(1),
            None => Ok(0),
        }
    }

    async fn restore(
        &self,
        conn: &mut MemoryConn,
        id: EntityId,
    ) -> Result<u64> {
        match E::table_mut(conn.state_mut()).get_mut(&id.to_uuid()) {
            Some(entity) if entity.deleted_at().is_some() => {
                entity.set_deleted_at(None);
                entity.touch(Utc::now());
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

macro_rules! impl_memory_entity {
    ($ty:ident, $patch:ty, $table:ident) => {
        impl MemoryEntity for $ty {
            type Patch = $patch;

            fn table(state: &MemoryState) -> &HashMap<Uuid, Self> {
                &state.$table
            }

            fn table_mut(
                state: &mut MemoryState,
            ) -> &mut HashMap<Uuid, Self> {
                &mut state.$table
            }

            fn apply_patch(patch: &Self::Patch, entity: &mut Self) {
                patch.apply_to(entity);
            }
        }
    };
}

impl_memory_entity!(Course, CoursePatch, courses);
impl_memory_entity!(Seminar, SeminarPatch, seminars);
impl_memory_entity!(TrainingSession, TrainingSessionPatch, training_sessions);
impl_memory_entity!(PhysicalGood, PhysicalGoodPatch, physical_goods);
