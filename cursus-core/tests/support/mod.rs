#![allow(dead_code)]

use std::sync::{Arc, Once};

use chrono::{Duration, Utc};
use cursus_core::database::memory::{
    MemoryEntityRepository, MemoryImageRepository, MemoryStorage,
};
use cursus_core::{
    CourseService, EntityOwnerAdapter, ImageEngine, PhysicalGoodService,
    SeminarService, TrainingSessionService,
};
use cursus_model::{
    Course, CoursePatch, CreateCourse, CreatePhysicalGood, CreateSeminar,
    CreateTrainingSession, MediaId, NewImage, Seminar, SeminarPatch,
    SeminarPrices,
};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per binary; `RUST_LOG` controls
/// the filter.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// All four kind services over one shared in-memory store.
pub struct TestCatalog {
    pub storage: Arc<MemoryStorage>,
    pub courses: CourseService<MemoryStorage>,
    pub seminars: SeminarService<MemoryStorage>,
    pub sessions: TrainingSessionService<MemoryStorage>,
    pub goods: PhysicalGoodService<MemoryStorage>,
}

impl TestCatalog {
    pub fn new() -> Self {
        init_tracing();
        let storage = Arc::new(MemoryStorage::new());
        Self {
            courses: CourseService::in_memory(Arc::clone(&storage)),
            seminars: SeminarService::in_memory(Arc::clone(&storage)),
            sessions: TrainingSessionService::in_memory(Arc::clone(&storage)),
            goods: PhysicalGoodService::in_memory(Arc::clone(&storage)),
            storage,
        }
    }

    pub fn course_images(&self) -> ImageEngine<MemoryStorage> {
        ImageEngine::new(
            Arc::clone(&self.storage),
            Arc::new(EntityOwnerAdapter::<
                MemoryStorage,
                Course,
                CoursePatch,
            >::new(
                Arc::new(MemoryEntityRepository::<Course>::new()),
                Arc::new(MemoryImageRepository::new()),
            )),
        )
    }

    pub fn seminar_images(&self) -> ImageEngine<MemoryStorage> {
        ImageEngine::new(
            Arc::clone(&self.storage),
            Arc::new(EntityOwnerAdapter::<
                MemoryStorage,
                Seminar,
                SeminarPatch,
            >::new(
                Arc::new(MemoryEntityRepository::<Seminar>::new()),
                Arc::new(MemoryImageRepository::new()),
            )),
        )
    }
}

/// Bare course owner adapter, for driving the adapter surface directly.
pub fn course_owner_adapter()
-> EntityOwnerAdapter<MemoryStorage, Course, CoursePatch> {
    EntityOwnerAdapter::new(
        Arc::new(MemoryEntityRepository::<Course>::new()),
        Arc::new(MemoryImageRepository::new()),
    )
}

pub fn course_request(name: &str) -> CreateCourse {
    CreateCourse {
        name: name.to_string(),
        short_description: "short blurb".to_string(),
        description: Some("long form description".to_string()),
        topic: "rust".to_string(),
        language: Some("en".to_string()),
        price: 49.99,
        access_duration_days: 90,
    }
}

pub fn seminar_request(name: &str) -> CreateSeminar {
    let starts = Utc::now() + Duration::hours(72);
    CreateSeminar {
        name: name.to_string(),
        short_description: "short blurb".to_string(),
        description: None,
        topic: "architecture".to_string(),
        speaker: Some("Alex Doe".to_string()),
        starts_at: starts,
        ends_at: starts + Duration::hours(4),
        payment_deadline: starts - Duration::hours(30),
        prices: SeminarPrices {
            reservation: 10.0,
            early: 80.0,
            late: 120.0,
            early_surcharge: 15.0,
            late_surcharge: 25.0,
        },
    }
}

pub fn session_request(name: &str) -> CreateTrainingSession {
    let starts = Utc::now() + Duration::hours(96);
    CreateTrainingSession {
        name: name.to_string(),
        short_description: "short blurb".to_string(),
        description: None,
        starts_at: starts,
        ends_at: starts + Duration::hours(8),
        payment_deadline: starts - Duration::hours(30),
        capacity: Some(12),
        price: 299.0,
    }
}

pub fn good_request(name: &str) -> CreatePhysicalGood {
    CreatePhysicalGood {
        name: name.to_string(),
        short_description: "short blurb".to_string(),
        description: None,
        sku: "SKU-0001".to_string(),
        weight_grams: Some(450),
        price: 19.5,
    }
}

pub fn new_image() -> NewImage {
    NewImage {
        media_id: MediaId::new(),
        url: "http://media.local/img.jpg".to_string(),
        secure_url: Some("https://media.local/img.jpg".to_string()),
        alt: Some("cover".to_string()),
    }
}
