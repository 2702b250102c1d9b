use std::sync::Arc;

use chrono::Utc;
use cursus_model::{
    CatalogEntity, Course, CourseDiff, CoursePart, CoursePatch, CreateCourse,
    EntityId, Product, ProductPatch, ProductTier, UpdateCourse, Visibility,
};

use crate::database::memory::{
    MemoryEntityRepository, MemoryPartRepository, MemoryProductRepository,
    MemoryStorage,
};
use crate::database::postgres::{
    PostgresEntityRepository, PostgresPartRepository,
    PostgresProductRepository, PostgresStorage,
};
use crate::database::{Storage, with_tx};
use crate::error::{CatalogError, Result};
use crate::service::Lifecycle;
use crate::validate;

/// Catalog service for self-paced courses.
pub struct CourseService<S: Storage> {
    pub lifecycle: Lifecycle<S, Course, CoursePatch>,
}

impl<S: Storage> std::fmt::Debug for CourseService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseService")
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl CourseService<PostgresStorage> {
    pub fn postgres(storage: Arc<PostgresStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(PostgresEntityRepository::<Course>::new()),
                Arc::new(PostgresProductRepository::new()),
                Arc::new(PostgresPartRepository::new()),
            ),
        }
    }
}

impl CourseService<MemoryStorage> {
    pub fn in_memory(storage: Arc<MemoryStorage>) -> Self {
        Self {
            lifecycle: Lifecycle::new(
                storage,
                Arc::new(MemoryEntityRepository::<Course>::new()),
                Arc::new(MemoryProductRepository::new()),
                Arc::new(MemoryPartRepository::new()),
            ),
        }
    }
}

impl<S: Storage> CourseService<S> {
    crate::service::delegate_lifecycle!(Course);

    /// Creates a course and its single standard-tier product, unpublished.
    pub async fn create(
        &self,
        req: CreateCourse,
    ) -> Result<(Course, Product)> {
        validate::create_course(&req)?;
        let now = Utc::now();
        let course = Course {
            id: EntityId::new(),
            name: req.name,
            short_description: req.short_description,
            description: req.description,
            topic: req.topic,
            language: req.language,
            access_duration_days: req.access_duration_days,
            images_count: 0,
            in_stock: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let product = Product::new(
            course.details_ref(),
            ProductTier::Standard,
            req.price,
        );
        self.lifecycle
            .create_records(&course, vec![product.clone()])
            .await?;
        Ok((course, product))
    }

    /// Diffs the request against stored values and persists only the fields
    /// that actually change. An empty diff is a no-op, not an error.
    pub async fn update(
        &self,
        raw_id: &str,
        req: UpdateCourse,
    ) -> Result<CourseDiff> {
        validate::update_course(&req)?;
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.lifecycle.entities);
        let products = Arc::clone(&self.lifecycle.products);
        with_tx(&*self.lifecycle.storage, move |conn| {
            Box::pin(async move {
                let course = entities
                    .get(conn, id, Visibility::WithUnpublished)
                    .await?
                    .ok_or_else(|| {
                        CatalogError::NotFound(format!("course {id}"))
                    })?;
                let set = products
                    .list_by_details(
                        conn,
                        course.details_ref(),
                        Visibility::WithUnpublished,
                    )
                    .await?;
                let product = set.first().ok_or_else(|| {
                    CatalogError::NotFound(format!(
                        "product for course {id}"
                    ))
                })?;

                let diff = diff_course(&course, product, &req);
                if !diff.course.is_empty()
                    && entities.update(conn, id, &diff.course).await? == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "course {id}"
                    )));
                }
                if !diff.product.is_empty()
                    && products
                        .update(conn, product.id, &diff.product)
                        .await?
                        == 0
                {
                    return Err(CatalogError::NotFound(format!(
                        "product for course {id}"
                    )));
                }
                Ok(diff)
            })
        })
        .await
    }

    /// Appends a part to a course, positioned after the existing ones.
    /// Inherits nothing from the course's lifecycle state; new parts start
    /// unpublished.
    pub async fn add_part(
        &self,
        raw_id: &str,
        title: String,
    ) -> Result<CoursePart> {
        if title.trim().is_empty() {
            return Err(CatalogError::InvalidArgument(
                "title is required".to_string(),
            ));
        }
        let id = EntityId::parse(raw_id)?;
        let entities = Arc::clone(&self.lifecycle.entities);
        let parts = Arc::clone(&self.lifecycle.parts);
        with_tx(&*self.lifecycle.storage, move |conn| {
            Box::pin(async move {
                if entities
                    .get(conn, id, Visibility::WithUnpublished)
                    .await?
                    .is_none()
                {
                    return Err(CatalogError::NotFound(format!(
                        "course {id}"
                    )));
                }
                let position =
                    parts.list_by_owner(conn, id).await?.len() as i32;
                let part = CoursePart::new(id, position, title);
                parts.insert(conn, &part).await?;
                Ok(part)
            })
        })
        .await
    }
}

fn diff_course(
    stored: &Course,
    product: &Product,
    req: &UpdateCourse,
) -> CourseDiff {
    let mut course = CoursePatch::default();
    if let Some(v) = &req.course.name
        && *v != stored.name
    {
        course.name = Some(v.clone());
    }
    if let Some(v) = &req.course.short_description
        && *v != stored.short_description
    {
        course.short_description = Some(v.clone());
    }
    if let Some(v) = &req.course.description
        && stored.description.as_deref() != Some(v)
    {
        course.description = Some(v.clone());
    }
    if let Some(v) = &req.course.topic
        && *v != stored.topic
    {
        course.topic = Some(v.clone());
    }
    if let Some(v) = &req.course.language
        && stored.language.as_deref() != Some(v)
    {
        course.language = Some(v.clone());
    }
    if let Some(v) = req.course.access_duration_days
        && v != stored.access_duration_days
    {
        course.access_duration_days = Some(v);
    }

    let mut price = ProductPatch::default();
    if let Some(v) = req.price
        && v != product.price
    {
        price.price = Some(v);
    }

    CourseDiff {
        course,
        product: price,
    }
}
