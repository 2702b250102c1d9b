//! In-memory implementation of the storage abstraction and all repository
//! ports. Transactions are snapshot-based: `begin` clones the shared state,
//! repositories mutate the clone, and `commit` publishes it back
//! (last-writer-wins). Good enough for unit tests and demos; real isolation
//! belongs to Postgres.

pub mod entities;
pub mod images;
pub mod parts;
pub mod products;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use cursus_model::{
    Course, CoursePart, Image, PhysicalGood, Product, Seminar,
    TrainingSession,
};
use uuid::Uuid;

use crate::database::Storage;
use crate::error::Result;

pub use entities::{MemoryEntity, MemoryEntityRepository};
pub use images::MemoryImageRepository;
pub use parts::MemoryPartRepository;
pub use products::MemoryProductRepository;

/// Whole-catalog table set. Cloned per transaction.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    pub courses: HashMap<Uuid, Course>,
    pub seminars: HashMap<Uuid, Seminar>,
    pub training_sessions: HashMap<Uuid, TrainingSession>,
    pub physical_goods: HashMap<Uuid, PhysicalGood>,
    pub products: HashMap<Uuid, Product>,
    pub parts: HashMap<Uuid, CoursePart>,
    pub images: Vec<Image>,
}

/// One open snapshot transaction.
#[derive(Debug)]
pub struct MemoryConn {
    working: MemoryState,
}

impl MemoryConn {
    pub(crate) fn state(&self) -> &MemoryState {
        &self.working
    }

    pub(crate) fn state_mut(&mut self) -> &mut MemoryState {
        &mut self.working
    }
}

/// Shared in-memory storage engine.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    shared: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        match self.shared.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Committed view, for test assertions outside any transaction.
    pub fn snapshot(&self) -> MemoryState {
        self.lock().clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    type Conn = MemoryConn;

    async fn begin(&self) -> Result<MemoryConn> {
        Ok(MemoryConn {
            working: self.lock().clone(),
        })
    }

    async fn commit(&self, conn: MemoryConn) -> Result<()> {
        *self.lock() = conn.working;
        Ok(())
    }

    async fn rollback(&self, conn: MemoryConn) -> Result<()> {
        drop(conn);
        Ok(())
    }
}
