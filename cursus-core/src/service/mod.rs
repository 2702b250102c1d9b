//! Per-kind catalog services.
//!
//! Each service pairs the kind-generic [`Lifecycle`] orchestrator with the
//! kind's own create and update flows. Construction picks the storage
//! backend; everything else is backend-agnostic.

pub mod course;
pub mod lifecycle;
pub mod physical;
pub mod seminar;
pub mod training;

pub use course::CourseService;
pub use lifecycle::Lifecycle;
pub use physical::PhysicalGoodService;
pub use seminar::SeminarService;
pub use training::TrainingSessionService;

/// Forwards the shared lifecycle surface of a kind service to its inner
/// [`Lifecycle`].
macro_rules! delegate_lifecycle {
    ($entity:ty) => {
        pub async fn publish(&self, id: &str) -> crate::error::Result<()> {
            self.lifecycle.publish(id).await
        }

        pub async fn unpublish(&self, id: &str) -> crate::error::Result<()> {
            self.lifecycle.unpublish(id).await
        }

        pub async fn delete(&self, id: &str) -> crate::error::Result<()> {
            self.lifecycle.delete(id).await
        }

        pub async fn delete_permanent(
            &self,
            id: &str,
        ) -> crate::error::Result<()> {
            self.lifecycle.delete_permanent(id).await
        }

        pub async fn restore(&self, id: &str) -> crate::error::Result<()> {
            self.lifecycle.restore(id).await
        }

        pub async fn get(
            &self,
            id: &str,
            vis: cursus_model::Visibility,
        ) -> crate::error::Result<($entity, Vec<cursus_model::Product>)> {
            self.lifecycle.get(id, vis).await
        }

        pub async fn get_reduced(
            &self,
            id: &str,
            vis: cursus_model::Visibility,
        ) -> crate::error::Result<$entity> {
            self.lifecycle.get_reduced(id, vis).await
        }

        pub async fn list(
            &self,
            vis: cursus_model::Visibility,
            page: cursus_model::Page,
        ) -> crate::error::Result<Vec<($entity, Vec<cursus_model::Product>)>>
        {
            self.lifecycle.list(vis, page).await
        }

        pub async fn count(
            &self,
            vis: cursus_model::Visibility,
        ) -> crate::error::Result<u64> {
            self.lifecycle.count(vis).await
        }
    };
}

pub(crate) use delegate_lifecycle;
