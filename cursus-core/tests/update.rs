mod support;

use chrono::Duration;
use cursus_core::CatalogError;
use cursus_model::{
    CoursePatch, SeminarPricesPatch, UpdateCourse, UpdateSeminar,
    Visibility,
};

use support::{TestCatalog, course_request, seminar_request};

#[tokio::test]
async fn price_only_update_serializes_product_section_only() {
    let catalog = TestCatalog::new();
    let (course, _) = catalog
        .courses
        .create(course_request("Rust Basics"))
        .await
        .unwrap();

    let diff = catalog
        .courses
        .update(
            &course.id.to_string(),
            UpdateCourse {
                course: CoursePatch::default(),
                price: Some(59.99),
            },
        )
        .await
        .unwrap();

    let json = serde_json::to_value(&diff).unwrap();
    assert_eq!(json, serde_json::json!({"product": {"price": 59.99}}));

    let (_, products) = catalog
        .courses
        .get(&course.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(products[0].price, 59.99);
}

#[tokio::test]
async fn update_persists_only_changed_fields() {
    let catalog = TestCatalog::new();
    let req = course_request("Rust Basics");
    let (course, _) = catalog.courses.create(req.clone()).await.unwrap();

    let diff = catalog
        .courses
        .update(
            &course.id.to_string(),
            UpdateCourse {
                course: CoursePatch {
                    name: Some("Rust Fundamentals".to_string()),
                    // Same value as stored; must not appear in the diff.
                    topic: Some(req.topic.clone()),
                    ..Default::default()
                },
                price: Some(req.price),
            },
        )
        .await
        .unwrap();

    assert_eq!(diff.course.name.as_deref(), Some("Rust Fundamentals"));
    assert!(diff.course.topic.is_none());
    assert!(diff.product.price.is_none());

    let (updated, _) = catalog
        .courses
        .get(&course.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(updated.name, "Rust Fundamentals");
    assert_eq!(updated.topic, req.topic);
    assert!(updated.updated_at > course.updated_at);
}

#[tokio::test]
async fn identical_update_yields_empty_diff() {
    let catalog = TestCatalog::new();
    let req = course_request("Rust Basics");
    let (course, _) = catalog.courses.create(req.clone()).await.unwrap();

    let diff = catalog
        .courses
        .update(
            &course.id.to_string(),
            UpdateCourse {
                course: CoursePatch {
                    name: Some(req.name.clone()),
                    ..Default::default()
                },
                price: Some(req.price),
            },
        )
        .await
        .unwrap();

    assert!(diff.is_empty());
    assert_eq!(serde_json::to_value(&diff).unwrap(), serde_json::json!({}));
}

#[tokio::test]
async fn update_unknown_course_is_not_found() {
    let catalog = TestCatalog::new();
    let err = catalog
        .courses
        .update(
            &uuid::Uuid::now_v7().to_string(),
            UpdateCourse {
                course: CoursePatch {
                    name: Some("anything".to_string()),
                    ..Default::default()
                },
                price: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn seminar_update_diffs_prices_per_tier() {
    let catalog = TestCatalog::new();
    let req = seminar_request("Event Storming");
    let (seminar, _) = catalog.seminars.create(req.clone()).await.unwrap();

    let diff = catalog
        .seminars
        .update(
            &seminar.id.to_string(),
            UpdateSeminar {
                seminar: Default::default(),
                prices: SeminarPricesPatch {
                    late: Some(150.0),
                    // Unchanged value; must drop out of the diff.
                    early: Some(req.prices.early),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

    assert!(diff.seminar.is_empty());
    assert_eq!(diff.products.late, Some(150.0));
    assert!(diff.products.early.is_none());

    let (_, products) = catalog
        .seminars
        .get(&seminar.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap();
    let late = products
        .iter()
        .find(|p| p.tier == cursus_model::ProductTier::Late)
        .unwrap();
    assert_eq!(late.price, 150.0);
    let early = products
        .iter()
        .find(|p| p.tier == cursus_model::ProductTier::Early)
        .unwrap();
    assert_eq!(early.price, req.prices.early);
}

#[tokio::test]
async fn seminar_reschedule_requires_full_triple() {
    let catalog = TestCatalog::new();
    let req = seminar_request("Event Storming");
    let (seminar, _) = catalog.seminars.create(req.clone()).await.unwrap();

    let err = catalog
        .seminars
        .update(
            &seminar.id.to_string(),
            UpdateSeminar {
                seminar: cursus_model::SeminarPatch {
                    starts_at: Some(req.starts_at + Duration::hours(24)),
                    ..Default::default()
                },
                prices: Default::default(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));

    // Nothing moved.
    let (stored, _) = catalog
        .seminars
        .get(&seminar.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(stored.starts_at, req.starts_at);
}

#[tokio::test]
async fn update_rejects_invalid_field_values() {
    let catalog = TestCatalog::new();
    let (course, _) = catalog
        .courses
        .create(course_request("Rust Basics"))
        .await
        .unwrap();

    let err = catalog
        .courses
        .update(
            &course.id.to_string(),
            UpdateCourse {
                course: CoursePatch::default(),
                price: Some(-5.0),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));
}
