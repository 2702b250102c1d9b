use std::marker::PhantomData;

use async_trait::async_trait;
use cursus_model::{
    CatalogEntity, Course, CoursePatch, EntityId, OwnerFields, Page,
    PhysicalGood, PhysicalGoodPatch, Seminar, SeminarPatch, TrainingSession,
    TrainingSessionPatch, Visibility,
};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::database::Storage;
use crate::database::ports::EntityRepository;
use crate::database::postgres::{PostgresStorage, db_err, visibility_clause};
use crate::error::Result;

/// Row mapping for one entity kind. The generic repository below turns this
/// into a full [`EntityRepository`] implementation, so adding a kind means
/// one struct, one table, and one of these impls.
pub trait PgEntity:
    CatalogEntity + for<'r> sqlx::FromRow<'r, PgRow> + Unpin
{
    type Patch: Send + Sync;

    const TABLE: &'static str;
    const INSERT_COLUMNS: &'static str;

    /// Binds insert values in `INSERT_COLUMNS` order.
    fn push_insert_values(
        entity: &Self,
        values: &mut Separated<'_, '_, Postgres, &'static str>,
    );

    /// Appends `, column = <bind>` fragments for every set patch field.
    fn push_patch(patch: &Self::Patch, qb: &mut QueryBuilder<'_, Postgres>);
}

/// Generic Postgres adapter for any [`PgEntity`] kind.
#[derive(Debug)]
pub struct PostgresEntityRepository<E> {
    _kind: PhantomData<fn() -> E>,
}

impl<E> PostgresEntityRepository<E> {
    pub fn new() -> Self {
        Self { _kind: PhantomData }
    }
}

impl<E> Default for PostgresEntityRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: PgEntity> EntityRepository<PostgresStorage>
    for PostgresEntityRepository<E>
{
    type Entity = E;
    type Patch = E::Patch;

    async fn insert(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        entity: &E,
    ) -> Result<()> {
        let mut qb = QueryBuilder::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            E::TABLE,
            E::INSERT_COLUMNS
        ));
        {
            let mut values = qb.separated(", ");
            E::push_insert_values(entity, &mut values);
        }
        qb.push(")");
        qb.build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to insert entity", e))?;
        Ok(())
    }

    async fn get(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        id: EntityId,
        vis: Visibility,
    ) -> Result<Option<E>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE id = ",
            E::TABLE
        ));
        qb.push_bind(id.to_uuid());
        qb.push(visibility_clause(vis));
        qb.build_query_as::<E>()
            .fetch_optional(&mut **conn)
            .await
            .map_err(|e| db_err("failed to get entity", e))
    }

    async fn list(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        vis: Visibility,
        page: Page,
    ) -> Result<Vec<E>> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE 1 = 1",
            E::TABLE
        ));
        qb.push(visibility_clause(vis));
        qb.push(" ORDER BY created_at DESC, id LIMIT ");
        qb.push_bind(i64::from(page.limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(page.offset));
        qb.build_query_as::<E>()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to list entities", e))
    }

    async fn list_by_ids(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        ids: &[EntityId],
        vis: Visibility,
    ) -> Result<Vec<E>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(EntityId::to_uuid).collect();
        let mut qb = QueryBuilder::new(format!(
            "SELECT * FROM {} WHERE id = ANY(",
            E::TABLE
        ));
        qb.push_bind(uuids);
        qb.push(")");
        qb.push(visibility_clause(vis));
        qb.push(" ORDER BY created_at DESC, id");
        qb.build_query_as::<E>()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to list entities by ids", e))
    }

    async fn count(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        vis: Visibility,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT COUNT(*) FROM {} WHERE 1 = 1",
            E::TABLE
        ));
        qb.push(visibility_clause(vis));
        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(&mut **conn)
            .await
            .map_err(|e| db_err("failed to count entities", e))?;
        Ok(count.max(0) as u64)
    }

    async fn update(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        id: EntityId,
        patch: &E::Patch,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!(
            "UPDATE {} SET updated_at = NOW()",
            E::TABLE
        ));
        E::push_patch(patch, &mut qb);
        qb.push(" WHERE id = ");
        qb.push_bind(id.to_uuid());
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to update entity", e))?;
        Ok(result.rows_affected())
    }

    async fn set_in_stock(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        id: EntityId,
        in_stock: bool,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!(
            "UPDATE {} SET in_stock = ",
            E::TABLE
        ));
        qb.push_bind(in_stock);
        qb.push(", updated_at = NOW() WHERE id = ");
        qb.push_bind(id.to_uuid());
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to set entity in_stock", e))?;
        Ok(result.rows_affected())
    }

    async fn adjust_images_count(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        ids: &[EntityId],
        delta: i16,
    ) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let uuids: Vec<Uuid> = ids.iter().map(EntityId::to_uuid).collect();
        let mut qb = QueryBuilder::new(format!(
            "UPDATE {} SET images_count = GREATEST(images_count + ",
            E::TABLE
        ));
        qb.push_bind(delta);
        qb.push(", 0), updated_at = NOW() WHERE id = ANY(");
        qb.push_bind(uuids);
        qb.push(")");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to adjust images_count", e))?;
        Ok(result.rows_affected())
    }

    async fn write_owner_fields(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        owners: &[E],
        fields: OwnerFields,
    ) -> Result<u64> {
        if fields.is_empty() {
            return Ok(0);
        }
        let mut affected = 0;
        for owner in owners {
            let mut qb = QueryBuilder::new(format!(
                "UPDATE {} SET updated_at = NOW()",
                E::TABLE
            ));
            if fields.images_count {
                qb.push(", images_count = ");
                qb.push_bind(owner.images_count());
            }
            if fields.in_stock {
                qb.push(", in_stock = ");
                qb.push_bind(owner.in_stock());
            }
            qb.push(" WHERE id = ");
            qb.push_bind(owner.id().to_uuid());
            let result = qb
                .build()
                .execute(&mut **conn)
                .await
                .map_err(|e| db_err("failed to write owner fields", e))?;
            affected += result.rows_affected();
        }
        Ok(affected)
    }

    async fn soft_delete(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        id: EntityId,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!(
            "UPDATE {} SET deleted_at = NOW(), in_stock = FALSE, \
             updated_at = NOW() WHERE id = ",
            E::TABLE
        ));
        qb.push_bind(id.to_uuid());
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to soft-delete entity", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_permanent(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        id: EntityId,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!(
            "DELETE FROM {} WHERE id = ",
            E::TABLE
        ));
        qb.push_bind(id.to_uuid());
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to delete entity", e))?;
        Ok(result.rows_affected())
    }

    async fn restore(
        &self,
        conn: &mut <PostgresStorage as Storage>::Conn,
        id: EntityId,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(format!(
            "UPDATE {} SET deleted_at = NULL, updated_at = NOW() \
             WHERE id = ",
            E::TABLE
        ));
        qb.push_bind(id.to_uuid());
        qb.push(" AND deleted_at IS NOT NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to restore entity", e))?;
        Ok(result.rows_affected())
    }
}

fn push_opt_text(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    value: &Option<String>,
) {
    if let Some(v) = value {
        qb.push(format!(", {column} = "));
        qb.push_bind(v.clone());
    }
}

impl PgEntity for Course {
    type Patch = CoursePatch;

    const TABLE: &'static str = "courses";
    const INSERT_COLUMNS: &'static str = "id, name, short_description, \
        description, topic, language, access_duration_days, images_count, \
        in_stock, created_at, updated_at, deleted_at";

    fn push_insert_values(
        entity: &Self,
        values: &mut Separated<'_, '_, Postgres, &'static str>,
    ) {
        values
            .push_bind(entity.id.to_uuid())
            .push_bind(entity.name.clone())
            .push_bind(entity.short_description.clone())
            .push_bind(entity.description.clone())
            .push_bind(entity.topic.clone())
            .push_bind(entity.language.clone())
            .push_bind(entity.access_duration_days)
            .push_bind(entity.images_count)
            .push_bind(entity.in_stock)
            .push_bind(entity.created_at)
            .push_bind(entity.updated_at)
            .push_bind(entity.deleted_at);
    }

    fn push_patch(patch: &Self::Patch, qb: &mut QueryBuilder<'_, Postgres>) {
        push_opt_text(qb, "name", &patch.name);
        push_opt_text(qb, "short_description", &patch.short_description);
        push_opt_text(qb, "description", &patch.description);
        push_opt_text(qb, "topic", &patch.topic);
        push_opt_text(qb, "language", &patch.language);
        if let Some(days) = patch.access_duration_days {
            qb.push(", access_duration_days = ");
            qb.push_bind(days);
        }
    }
}

impl PgEntity for Seminar {
    type Patch = SeminarPatch;

    const TABLE: &'static str = "seminars";
    const INSERT_COLUMNS: &'static str = "id, name, short_description, \
        description, topic, speaker, starts_at, ends_at, payment_deadline, \
        images_count, in_stock, created_at, updated_at, deleted_at";

    fn push_insert_values(
        entity: &Self,
        values: &mut Separated<'_, '_, Postgres, &'static str>,
    ) {
        values
            .push_bind(entity.id.to_uuid())
            .push_bind(entity.name.clone())
            .push_bind(entity.short_description.clone())
            .push_bind(entity.description.clone())
            .push_bind(entity.topic.clone())
            .push_bind(entity.speaker.clone())
            .push_bind(entity.starts_at)
            .push_bind(entity.ends_at)
            .push_bind(entity.payment_deadline)
            .push_bind(entity.images_count)
            .push_bind(entity.in_stock)
            .push_bind(entity.created_at)
            .push_bind(entity.updated_at)
            .push_bind(entity.deleted_at);
    }

    fn push_patch(patch: &Self::Patch, qb: &mut QueryBuilder<'_, Postgres>) {
        push_opt_text(qb, "name", &patch.name);
        push_opt_text(qb, "short_description", &patch.short_description);
        push_opt_text(qb, "description", &patch.description);
        push_opt_text(qb, "topic", &patch.topic);
        push_opt_text(qb, "speaker", &patch.speaker);
        if let Some(v) = patch.starts_at {
            qb.push(", starts_at = ");
            qb.push_bind(v);
        }
        if let Some(v) = patch.ends_at {
            qb.push(", ends_at = ");
            qb.push_bind(v);
        }
        if let Some(v) = patch.payment_deadline {
            qb.push(", payment_deadline = ");
            qb.push_bind(v);
        }
    }
}

impl PgEntity for TrainingSession {
    type Patch = TrainingSessionPatch;

    const TABLE: &'static str = "training_sessions";
    const INSERT_COLUMNS: &'static str = "id, name, short_description, \
        description, starts_at, ends_at, payment_deadline, capacity, \
        images_count, in_stock, created_at, updated_at, deleted_at";

    fn push_insert_values(
        entity: &Self,
        values: &mut Separated<'_, '_, Postgres, &'static str>,
    ) {
        values
            .push_bind(entity.id.to_uuid())
            .push_bind(entity.name.clone())
            .push_bind(entity.short_description.clone())
            .push_bind(entity.description.clone())
            .push_bind(entity.starts_at)
            .push_bind(entity.ends_at)
            .push_bind(entity.payment_deadline)
            .push_bind(entity.capacity)
            .push_bind(entity.images_count)
            .push_bind(entity.in_stock)
            .push_bind(entity.created_at)
            .push_bind(entity.updated_at)
            .push_bind(entity.deleted_at);
    }

    fn push_patch(patch: &Self::Patch, qb: &mut QueryBuilder<'_, Postgres>) {
        push_opt_text(qb, "name", &patch.name);
        push_opt_text(qb, "short_description", &patch.short_description);
        push_opt_text(qb, "description", &patch.description);
        if let Some(v) = patch.starts_at {
            qb.push(", starts_at = ");
            qb.push_bind(v);
        }
        if let Some(v) = patch.ends_at {
            qb.push(", ends_at = ");
            qb.push_bind(v);
        }
        if let Some(v) = patch.payment_deadline {
            qb.push(", payment_deadline = ");
            qb.push_bind(v);
        }
        if let Some(v) = patch.capacity {
            qb.push(", capacity = ");
            qb.push_bind(v);
        }
    }
}

impl PgEntity for PhysicalGood {
    type Patch = PhysicalGoodPatch;

    const TABLE: &'static str = "physical_goods";
    const INSERT_COLUMNS: &'static str = "id, name, short_description, \
        description, sku, weight_grams, images_count, in_stock, created_at, \
        updated_at, deleted_at";

    fn push_insert_values(
        entity: &Self,
        values: &mut Separated<'_, '_, Postgres, &'static str>,
    ) {
        values
            .push_bind(entity.id.to_uuid())
            .push_bind(entity.name.clone())
            .push_bind(entity.short_description.clone())
            .push_bind(entity.description.clone())
            .push_bind(entity.sku.clone())
            .push_bind(entity.weight_grams)
            .push_bind(entity.images_count)
            .push_bind(entity.in_stock)
            .push_bind(entity.created_at)
            .push_bind(entity.updated_at)
            .push_bind(entity.deleted_at);
    }

    fn push_patch(patch: &Self::Patch, qb: &mut QueryBuilder<'_, Postgres>) {
        push_opt_text(qb, "name", &patch.name);
        push_opt_text(qb, "short_description", &patch.short_description);
        push_opt_text(qb, "description", &patch.description);
        push_opt_text(qb, "sku", &patch.sku);
        if let Some(v) = patch.weight_grams {
            qb.push(", weight_grams = ");
            qb.push_bind(v);
        }
    }
}
