mod support;

use cursus_core::{CatalogError, OwnerAdapter, Storage};
use cursus_model::{
    Course, MAX_IMAGES_PER_OWNER, MediaId, OwnedEntity, OwnerFields,
    Visibility,
};

use support::{
    TestCatalog, course_owner_adapter, course_request, new_image,
    seminar_request,
};

#[tokio::test]
async fn add_image_enforces_the_per_owner_ceiling() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();
    let (course, _) = catalog
        .courses
        .create(course_request("Rust Basics"))
        .await
        .unwrap();
    let id = course.id.to_string();

    for position in 0..MAX_IMAGES_PER_OWNER {
        let image = engine.add_image(&id, new_image()).await.unwrap();
        assert_eq!(image.position, position);
    }

    let err = engine.add_image(&id, new_image()).await.unwrap_err();
    assert!(matches!(
        err,
        CatalogError::ImageLimitExceeded { owner, max: 5 } if owner == course.id
    ));

    let stored = catalog
        .courses
        .get_reduced(&id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(stored.images_count, MAX_IMAGES_PER_OWNER);
    assert_eq!(
        catalog.storage.snapshot().images.len(),
        MAX_IMAGES_PER_OWNER as usize
    );
}

#[tokio::test]
async fn add_image_requires_a_resolvable_owner() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();

    let err = engine
        .add_image(&uuid::Uuid::now_v7().to_string(), new_image())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let err = engine.add_image("garbage", new_image()).await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidArgument(_)));
}

#[tokio::test]
async fn delete_image_detaches_and_decrements() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();
    let (course, _) = catalog
        .courses
        .create(course_request("Rust Basics"))
        .await
        .unwrap();
    let id = course.id.to_string();

    let image = engine.add_image(&id, new_image()).await.unwrap();
    engine.add_image(&id, new_image()).await.unwrap();

    engine.delete_image(&id, image.media_id).await.unwrap();

    let stored = catalog
        .courses
        .get_reduced(&id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(stored.images_count, 1);
    assert_eq!(catalog.storage.snapshot().images.len(), 1);

    // Deleting the same media again is a miss, not a no-op.
    let err = engine
        .delete_image(&id, image.media_id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CatalogError::ImageNotFoundOnOwner { owner, media }
            if owner == course.id && media == image.media_id
    ));
}

#[tokio::test]
async fn batch_add_skips_full_and_unknown_owners() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();
    let (open, _) = catalog
        .courses
        .create(course_request("Course A"))
        .await
        .unwrap();
    let (full, _) = catalog
        .courses
        .create(course_request("Course B"))
        .await
        .unwrap();
    let full_id = full.id.to_string();
    for _ in 0..MAX_IMAGES_PER_OWNER {
        engine.add_image(&full_id, new_image()).await.unwrap();
    }

    let missing = uuid::Uuid::now_v7().to_string();
    let open_id = open.id.to_string();
    let ids = [open_id.as_str(), full_id.as_str(), missing.as_str()];

    let affected =
        engine.add_image_batch(&ids, new_image()).await.unwrap();
    assert_eq!(affected, 1);

    let stored = catalog
        .courses
        .get_reduced(&open_id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(stored.images_count, 1);
    let stored_full = catalog
        .courses
        .get_reduced(&full_id, Visibility::WithUnpublished)
        .await
        .unwrap();
    assert_eq!(stored_full.images_count, MAX_IMAGES_PER_OWNER);
}

#[tokio::test]
async fn batch_add_fails_when_nothing_resolves() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();

    let a = uuid::Uuid::now_v7().to_string();
    let b = uuid::Uuid::now_v7().to_string();
    let err = engine
        .add_image_batch(&[a.as_str(), b.as_str()], new_image())
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::OwnersNotFound));
}

#[tokio::test]
async fn batch_delete_detaches_from_actual_holders_only() {
    let catalog = TestCatalog::new();
    let engine = catalog.seminar_images();
    let mut ids = Vec::new();
    for name in ["Seminar A", "Seminar B", "Seminar C"] {
        let (seminar, _) = catalog
            .seminars
            .create(seminar_request(name))
            .await
            .unwrap();
        ids.push(seminar.id.to_string());
    }

    let shared = new_image();
    engine
        .add_image_batch(&[ids[0].as_str(), ids[1].as_str()], shared.clone())
        .await
        .unwrap();

    let all: Vec<&str> = ids.iter().map(String::as_str).collect();
    let affected = engine
        .delete_image_batch(&all, shared.media_id)
        .await
        .unwrap();
    assert_eq!(affected, 2);

    for (idx, id) in ids.iter().enumerate() {
        let stored = catalog
            .seminars
            .get_reduced(id, Visibility::WithUnpublished)
            .await
            .unwrap();
        assert_eq!(stored.images_count, 0, "seminar {idx}");
    }
    assert!(catalog.storage.snapshot().images.is_empty());
}

#[tokio::test]
async fn batch_delete_fails_when_no_owner_holds_the_media() {
    let catalog = TestCatalog::new();
    let engine = catalog.seminar_images();
    let (seminar, _) = catalog
        .seminars
        .create(seminar_request("Seminar A"))
        .await
        .unwrap();

    let err = engine
        .delete_image_batch(
            &[seminar.id.to_string().as_str()],
            MediaId::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::OwnersNotFound));
}

#[tokio::test]
async fn positions_stay_unique_after_a_gap_is_left_behind() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();
    let (course, _) = catalog
        .courses
        .create(course_request("Rust Basics"))
        .await
        .unwrap();
    let id = course.id.to_string();

    let first = engine.add_image(&id, new_image()).await.unwrap();
    engine.add_image(&id, new_image()).await.unwrap();
    engine.add_image(&id, new_image()).await.unwrap();
    engine.delete_image(&id, first.media_id).await.unwrap();

    // The freed slot is never reused; the next attach appends.
    let replacement = engine.add_image(&id, new_image()).await.unwrap();
    assert_eq!(replacement.position, 3);

    let snapshot = catalog.storage.snapshot();
    let mut positions: Vec<i16> =
        snapshot.images.iter().map(|i| i.position).collect();
    positions.sort_unstable();
    let total = positions.len();
    positions.dedup();
    assert_eq!(positions.len(), total);
}

#[tokio::test]
async fn batch_update_writes_only_masked_owner_columns() {
    let catalog = TestCatalog::new();
    let adapter = course_owner_adapter();
    let (a, _) = catalog
        .courses
        .create(course_request("Course A"))
        .await
        .unwrap();
    let (b, _) = catalog
        .courses
        .create(course_request("Course B"))
        .await
        .unwrap();

    let mut conn = catalog.storage.begin().await.unwrap();
    let mut owners = adapter
        .list_with_unpublished_by_ids(&mut conn, &[a.id, b.id])
        .await
        .unwrap();
    for owner in &mut owners {
        let course = Course::as_owner_mut(owner).unwrap();
        course.images_count = 3;
        course.in_stock = true;
    }

    // An empty mask writes nothing.
    let affected = adapter
        .batch_update(&mut conn, &owners, OwnerFields::default())
        .await
        .unwrap();
    assert_eq!(affected, 0);

    let affected = adapter
        .batch_update(&mut conn, &owners, OwnerFields::IMAGES_COUNT)
        .await
        .unwrap();
    assert_eq!(affected, 2);
    catalog.storage.commit(conn).await.unwrap();

    let snapshot = catalog.storage.snapshot();
    for course in snapshot.courses.values() {
        assert_eq!(course.images_count, 3);
        // The unmasked column stays untouched.
        assert!(!course.in_stock);
    }

    let mut conn = catalog.storage.begin().await.unwrap();
    let affected = adapter
        .batch_update(
            &mut conn,
            &owners,
            OwnerFields {
                images_count: false,
                in_stock: true,
            },
        )
        .await
        .unwrap();
    assert_eq!(affected, 2);
    catalog.storage.commit(conn).await.unwrap();

    let snapshot = catalog.storage.snapshot();
    assert!(snapshot.courses.values().all(|c| c.in_stock));
}

#[tokio::test]
async fn images_attach_to_unpublished_and_published_owners_alike() {
    let catalog = TestCatalog::new();
    let engine = catalog.course_images();
    let (course, _) = catalog
        .courses
        .create(course_request("Rust Basics"))
        .await
        .unwrap();
    let id = course.id.to_string();

    engine.add_image(&id, new_image()).await.unwrap();
    catalog.courses.publish(&id).await.unwrap();
    engine.add_image(&id, new_image()).await.unwrap();

    let stored = catalog
        .courses
        .get_reduced(&id, Visibility::Listed)
        .await
        .unwrap();
    assert_eq!(stored.images_count, 2);
}
