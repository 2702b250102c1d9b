use async_trait::async_trait;
use cursus_model::{CoursePart, EntityId};
use sqlx::QueryBuilder;

use crate::database::Storage;
use crate::database::ports::PartRepository;
use crate::database::postgres::{PostgresStorage, db_err};
use crate::error::Result;

type PgConn = <PostgresStorage as Storage>::Conn;

/// Postgres adapter for course parts. Everything is addressed by the owning
/// course id; cascades that match zero rows are the caller's business.
#[derive(Clone, Debug, Default)]
pub struct PostgresPartRepository;

impl PostgresPartRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PartRepository<PostgresStorage> for PostgresPartRepository {
    async fn insert(
        &self,
        conn: &mut PgConn,
        part: &CoursePart,
    ) -> Result<()> {
        let mut qb = QueryBuilder::new(
            "INSERT INTO course_parts (id, course_id, position, title, \
             published, created_at, updated_at, deleted_at) VALUES (",
        );
        {
            let mut values = qb.separated(", ");
            values
                .push_bind(part.id.to_uuid())
                .push_bind(part.course_id.to_uuid())
                .push_bind(part.position)
                .push_bind(part.title.clone())
                .push_bind(part.published)
                .push_bind(part.created_at)
                .push_bind(part.updated_at)
                .push_bind(part.deleted_at);
        }
        qb.push(")");
        qb.build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to insert course part", e))?;
        Ok(())
    }

    async fn list_by_owner(
        &self,
        conn: &mut PgConn,
        owner: EntityId,
    ) -> Result<Vec<CoursePart>> {
        let mut qb = QueryBuilder::new(
            "SELECT * FROM course_parts WHERE course_id = ",
        );
        qb.push_bind(owner.to_uuid());
        qb.push(" AND deleted_at IS NULL ORDER BY position, id");
        qb.build_query_as::<CoursePart>()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to list course parts", e))
    }

    async fn set_published_by_owner(
        &self,
        conn: &mut PgConn,
        owner: EntityId,
        published: bool,
    ) -> Result<u64> {
        let mut qb =
            QueryBuilder::new("UPDATE course_parts SET published = ");
        qb.push_bind(published);
        qb.push(", updated_at = NOW() WHERE course_id = ");
        qb.push_bind(owner.to_uuid());
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to set parts published", e))?;
        Ok(result.rows_affected())
    }

    async fn soft_delete_by_owner(
        &self,
        conn: &mut PgConn,
        owner: EntityId,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(
            "UPDATE course_parts SET deleted_at = NOW(), published = FALSE, \
             updated_at = NOW() WHERE course_id = ",
        );
        qb.push_bind(owner.to_uuid());
        qb.push(" AND deleted_at IS NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to soft-delete course parts", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_permanent_by_owner(
        &self,
        conn: &mut PgConn,
        owner: EntityId,
    ) -> Result<u64> {
        let mut qb =
            QueryBuilder::new("DELETE FROM course_parts WHERE course_id = ");
        qb.push_bind(owner.to_uuid());
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to delete course parts", e))?;
        Ok(result.rows_affected())
    }

    async fn restore_by_owner(
        &self,
        conn: &mut PgConn,
        owner: EntityId,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new(
            "UPDATE course_parts SET deleted_at = NULL, updated_at = NOW() \
             WHERE course_id = ",
        );
        qb.push_bind(owner.to_uuid());
        qb.push(" AND deleted_at IS NOT NULL");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to restore course parts", e))?;
        Ok(result.rows_affected())
    }
}
