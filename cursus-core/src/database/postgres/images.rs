use async_trait::async_trait;
use cursus_model::{DetailsRef, EntityId, EntityKind, Image, MediaId};
use sqlx::QueryBuilder;
use uuid::Uuid;

use crate::database::Storage;
use crate::database::ports::ImageRepository;
use crate::database::postgres::{PostgresStorage, db_err};
use crate::error::Result;

type PgConn = <PostgresStorage as Storage>::Conn;

/// Postgres adapter for image attachments, keyed by the polymorphic owner
/// reference.
#[derive(Clone, Debug, Default)]
pub struct PostgresImageRepository;

impl PostgresImageRepository {
    pub fn new() -> Self {
        Self
    }
}

fn push_owner(qb: &mut QueryBuilder<'_, sqlx::Postgres>, owner: DetailsRef) {
    qb.push(" WHERE owner_id = ");
    qb.push_bind(owner.id.to_uuid());
    qb.push(" AND owner_kind = ");
    qb.push_bind(owner.kind);
}

#[async_trait]
impl ImageRepository<PostgresStorage> for PostgresImageRepository {
    async fn insert(&self, conn: &mut PgConn, image: &Image) -> Result<()> {
        self.insert_batch(conn, std::slice::from_ref(image)).await
    }

    async fn insert_batch(
        &self,
        conn: &mut PgConn,
        images: &[Image],
    ) -> Result<()> {
        if images.is_empty() {
            return Ok(());
        }
        let mut qb = QueryBuilder::new(
            "INSERT INTO images (media_id, owner_id, owner_kind, url, \
             secure_url, alt, position, created_at) ",
        );
        qb.push_values(images, |mut row, image| {
            row.push_bind(image.media_id.to_uuid())
                .push_bind(image.owner_id.to_uuid())
                .push_bind(image.owner_kind)
                .push_bind(image.url.clone())
                .push_bind(image.secure_url.clone())
                .push_bind(image.alt.clone())
                .push_bind(image.position)
                .push_bind(image.created_at);
        });
        qb.build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to insert images", e))?;
        Ok(())
    }

    async fn delete(
        &self,
        conn: &mut PgConn,
        owner: DetailsRef,
        media: MediaId,
    ) -> Result<u64> {
        let mut qb = QueryBuilder::new("DELETE FROM images");
        push_owner(&mut qb, owner);
        qb.push(" AND media_id = ");
        qb.push_bind(media.to_uuid());
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to delete image", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_by_media(
        &self,
        conn: &mut PgConn,
        kind: EntityKind,
        media: MediaId,
        owners: &[EntityId],
    ) -> Result<u64> {
        if owners.is_empty() {
            return Ok(0);
        }
        let uuids: Vec<Uuid> = owners.iter().map(EntityId::to_uuid).collect();
        let mut qb = QueryBuilder::new("DELETE FROM images WHERE media_id = ");
        qb.push_bind(media.to_uuid());
        qb.push(" AND owner_kind = ");
        qb.push_bind(kind);
        qb.push(" AND owner_id = ANY(");
        qb.push_bind(uuids);
        qb.push(")");
        let result = qb
            .build()
            .execute(&mut **conn)
            .await
            .map_err(|e| db_err("failed to delete images by media", e))?;
        Ok(result.rows_affected())
    }

    async fn list_by_owner(
        &self,
        conn: &mut PgConn,
        owner: DetailsRef,
    ) -> Result<Vec<Image>> {
        let mut qb = QueryBuilder::new("SELECT * FROM images");
        push_owner(&mut qb, owner);
        qb.push(" ORDER BY position, media_id");
        qb.build_query_as::<Image>()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to list images", e))
    }

    async fn owners_with_media(
        &self,
        conn: &mut PgConn,
        kind: EntityKind,
        media: MediaId,
        candidates: &[EntityId],
    ) -> Result<Vec<EntityId>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> =
            candidates.iter().map(EntityId::to_uuid).collect();
        let mut qb = QueryBuilder::new(
            "SELECT owner_id FROM images WHERE media_id = ",
        );
        qb.push_bind(media.to_uuid());
        qb.push(" AND owner_kind = ");
        qb.push_bind(kind);
        qb.push(" AND owner_id = ANY(");
        qb.push_bind(uuids);
        qb.push(")");
        let ids: Vec<Uuid> = qb
            .build_query_scalar()
            .fetch_all(&mut **conn)
            .await
            .map_err(|e| db_err("failed to find owners by media", e))?;
        Ok(ids.into_iter().map(EntityId::from).collect())
    }
}
