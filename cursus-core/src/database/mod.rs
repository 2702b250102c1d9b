//! Storage abstraction and repository ports.
//!
//! Every public lifecycle and image operation acquires exactly one unit of
//! work from [`Storage`] and threads its connection through the repository
//! ports; commit and rollback stay with the caller that opened it.

pub mod memory;
pub mod ports;
pub mod postgres;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;

/// Transactional unit-of-work factory over the underlying engine.
///
/// `Conn` is one open transaction; all repository calls made with it either
/// commit together or roll back together. Cancellation is the caller's
/// concern: dropping an operation future aborts the in-flight query and the
/// transaction is never committed.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    type Conn: Send;

    async fn begin(&self) -> Result<Self::Conn>;
    async fn commit(&self, conn: Self::Conn) -> Result<()>;
    async fn rollback(&self, conn: Self::Conn) -> Result<()>;
}

/// Runs `op` inside one transaction; commits on success, rolls back on any
/// error. A rollback failure is logged and swallowed so the original error
/// keeps propagating.
pub(crate) async fn with_tx<S, T, F>(storage: &S, op: F) -> Result<T>
where
    S: Storage,
    F: for<'c> FnOnce(&'c mut S::Conn) -> BoxFuture<'c, Result<T>> + Send,
{
    let mut conn = storage.begin().await?;
    match op(&mut conn).await {
        Ok(value) => {
            storage.commit(conn).await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = storage.rollback(conn).await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}
