mod support;

use cursus_core::database::memory::{
    MemoryPartRepository, MemoryProductRepository,
};
use cursus_core::database::ports::{PartRepository, ProductRepository};
use cursus_core::{CatalogError, Storage};
use cursus_model::{
    CatalogEntity, LifecycleState, Page, ProductTier, Visibility,
};

use support::{
    TestCatalog, course_request, good_request, seminar_request,
    session_request,
};

#[tokio::test]
async fn create_starts_unpublished_with_matching_fields() {
    let catalog = TestCatalog::new();
    let req = course_request("Rust Basics");
    let (created, product) =
        catalog.courses.create(req.clone()).await.unwrap();

    assert!(!created.in_stock);
    assert_eq!(created.state(), LifecycleState::Unpublished);
    assert_eq!(product.tier, ProductTier::Standard);
    assert_eq!(product.price, req.price);
    assert!(!product.in_stock);

    // Not visible in the listed tier until published.
    let id = created.id.to_string();
    let err = catalog
        .courses
        .get(&id, Visibility::Listed)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let (fetched, products) = catalog
        .courses
        .get(&id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(fetched, created);
    assert_eq!(products.len(), 1);
}

#[tokio::test]
async fn seminar_create_mints_all_five_tiers() {
    let catalog = TestCatalog::new();
    let req = seminar_request("Event Storming");
    let (seminar, products) = catalog.seminars.create(req).await.unwrap();

    assert_eq!(products.len(), 5);
    let tiers: Vec<ProductTier> =
        products.iter().map(|p| p.tier).collect();
    assert_eq!(
        tiers,
        vec![
            ProductTier::Reservation,
            ProductTier::Early,
            ProductTier::Late,
            ProductTier::EarlySurcharge,
            ProductTier::LateSurcharge,
        ]
    );

    let (_, fetched) = catalog
        .seminars
        .get(&seminar.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(fetched.len(), 5);
}

#[tokio::test]
async fn publish_mirrors_in_stock_onto_products() {
    let catalog = TestCatalog::new();
    let (seminar, _) = catalog
        .seminars
        .create(seminar_request("Scaling"))
        .await
        .unwrap();
    let id = seminar.id.to_string();

    catalog.seminars.publish(&id).await.unwrap();

    let (fetched, products) =
        catalog.seminars.get(&id, Visibility::Listed).await.unwrap();
    assert!(fetched.in_stock);
    assert_eq!(fetched.state(), LifecycleState::Published);
    assert!(products.iter().all(|p| p.in_stock));
}

#[tokio::test]
async fn unpublish_mirrors_and_cascades_to_parts() {
    let catalog = TestCatalog::new();
    let (course, _) = catalog
        .courses
        .create(course_request("Async Rust"))
        .await
        .unwrap();
    let id = course.id.to_string();
    catalog.courses.add_part(&id, "Intro".to_string()).await.unwrap();
    catalog
        .courses
        .add_part(&id, "Futures".to_string())
        .await
        .unwrap();
    catalog.courses.publish(&id).await.unwrap();

    // Parts are published out of band; publish does not touch them.
    let parts_repo = MemoryPartRepository::new();
    let mut conn = catalog.storage.begin().await.unwrap();
    parts_repo
        .set_published_by_owner(&mut conn, course.id, true)
        .await
        .unwrap();
    catalog.storage.commit(conn).await.unwrap();

    catalog.courses.unpublish(&id).await.unwrap();

    let (fetched, products) = catalog
        .courses
        .get(&id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert!(!fetched.in_stock);
    assert!(products.iter().all(|p| !p.in_stock));

    let snapshot = catalog.storage.snapshot();
    assert!(snapshot.parts.values().all(|p| !p.published));
}

#[tokio::test]
async fn delete_is_soft_and_restorable() {
    let catalog = TestCatalog::new();
    let (course, _) = catalog
        .courses
        .create(course_request("Borrowing"))
        .await
        .unwrap();
    let id = course.id.to_string();
    catalog.courses.add_part(&id, "Part 1".to_string()).await.unwrap();
    catalog.courses.publish(&id).await.unwrap();

    catalog.courses.delete(&id).await.unwrap();

    let err = catalog
        .courses
        .get(&id, Visibility::WithUnpublished)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let (deleted, products) = catalog
        .courses
        .get(&id, Visibility::WithDeleted)
        .await
        .unwrap();
    assert_eq!(deleted.state(), LifecycleState::Deleted);
    assert!(deleted.deleted_at.is_some());
    assert!(products.iter().all(|p| p.deleted_at.is_some()));

    let snapshot = catalog.storage.snapshot();
    assert!(snapshot.parts.values().all(|p| p.deleted_at.is_some()));

    // Restore lands unpublished, never back on sale.
    catalog.courses.restore(&id).await.unwrap();
    let (restored, products) = catalog
        .courses
        .get(&id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(restored.state(), LifecycleState::Unpublished);
    assert!(restored.deleted_at.is_none());
    assert!(products.iter().all(|p| p.deleted_at.is_none()));
    assert!(products.iter().all(|p| !p.in_stock));

    let snapshot = catalog.storage.snapshot();
    assert!(snapshot.parts.values().all(|p| p.deleted_at.is_none()));
}

#[tokio::test]
async fn delete_permanent_removes_all_records() {
    let catalog = TestCatalog::new();
    let (course, _) = catalog
        .courses
        .create(course_request("Unsafe Rust"))
        .await
        .unwrap();
    let id = course.id.to_string();
    catalog.courses.add_part(&id, "Part 1".to_string()).await.unwrap();
    catalog.courses.delete(&id).await.unwrap();

    catalog.courses.delete_permanent(&id).await.unwrap();

    let err = catalog
        .courses
        .get(&id, Visibility::WithDeleted)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let snapshot = catalog.storage.snapshot();
    assert!(snapshot.courses.is_empty());
    assert!(snapshot.products.is_empty());
    assert!(snapshot.parts.is_empty());
}

#[tokio::test]
async fn lifecycle_rejects_unknown_and_malformed_ids() {
    let catalog = TestCatalog::new();

    let missing = uuid::Uuid::now_v7().to_string();
    for err in [
        catalog.goods.publish(&missing).await.unwrap_err(),
        catalog.goods.unpublish(&missing).await.unwrap_err(),
        catalog.goods.delete(&missing).await.unwrap_err(),
        catalog.goods.delete_permanent(&missing).await.unwrap_err(),
        catalog.goods.restore(&missing).await.unwrap_err(),
    ] {
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    let err = catalog.goods.publish("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));
}

#[tokio::test]
async fn restore_requires_a_deleted_record() {
    let catalog = TestCatalog::new();
    let (session, _) = catalog
        .sessions
        .create(session_request("Kickoff"))
        .await
        .unwrap();

    let err = catalog
        .sessions
        .restore(&session.id.to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn incomplete_product_set_fails_get_and_drops_from_list() {
    let catalog = TestCatalog::new();
    let (intact, _) = catalog
        .goods
        .create(good_request("Poster"))
        .await
        .unwrap();
    let (broken, _) = catalog
        .goods
        .create(good_request("Sticker Pack"))
        .await
        .unwrap();

    // Orphan the second good by ripping out its product row.
    let products_repo = MemoryProductRepository::new();
    let mut conn = catalog.storage.begin().await.unwrap();
    products_repo
        .delete_permanent_by_details(&mut conn, broken.details_ref())
        .await
        .unwrap();
    catalog.storage.commit(conn).await.unwrap();

    let err = catalog
        .goods
        .get(&broken.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::ProductsNotFound {
            expected: 1,
            found: 0
        }
    ));

    let page = catalog
        .goods
        .list(Visibility::WithUnpublished, Page::default())
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].0.id, intact.id);

    // The reduced read skips the join and still resolves.
    let reduced = catalog
        .goods
        .get_reduced(&broken.id.to_string(), Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(reduced.id, broken.id);

    // Count is visibility-scoped only; it does not join products.
    let count = catalog
        .goods
        .count(Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn list_respects_visibility_and_pagination() {
    let catalog = TestCatalog::new();
    let mut ids = Vec::new();
    for i in 0..3 {
        let (good, _) = catalog
            .goods
            .create(good_request(&format!("Good {i}")))
            .await
            .unwrap();
        ids.push(good.id);
    }
    catalog.goods.publish(&ids[0].to_string()).await.unwrap();

    let listed = catalog
        .goods
        .list(Visibility::Listed, Page::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0.id, ids[0]);

    let all = catalog
        .goods
        .list(Visibility::WithUnpublished, Page::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let second_page = catalog
        .goods
        .list(Visibility::WithUnpublished, Page::new(2, 2))
        .await
        .unwrap();
    assert_eq!(second_page.len(), 1);
}
