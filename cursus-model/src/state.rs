/// Lifecycle position derived from the two persisted flags.
///
/// The stored form keeps two columns (`in_stock`, `deleted_at`); Draft and
/// Archived share the `Unpublished` variant because they are identical on
/// disk. Soft deletion always forces `in_stock = false`, so the
/// published-and-deleted combination never occurs after a completed
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LifecycleState {
    /// Draft or Archived: visible only through the unpublished tier.
    Unpublished,
    /// In the default catalog tier.
    Published,
    /// Soft-deleted; only the deleted tier sees it.
    Deleted,
}

impl LifecycleState {
    pub fn from_flags(in_stock: bool, deleted: bool) -> Self {
        if deleted {
            LifecycleState::Deleted
        } else if in_stock {
            LifecycleState::Published
        } else {
            LifecycleState::Unpublished
        }
    }

    /// Publish is legal from Draft/Archived only.
    pub fn can_publish(&self) -> bool {
        matches!(self, LifecycleState::Unpublished)
    }

    /// Soft delete accepts anything that still has a live row.
    pub fn can_delete(&self) -> bool {
        !matches!(self, LifecycleState::Deleted)
    }

    /// Restore only applies to soft-deleted entities and always lands on
    /// Archived, never back on Published.
    pub fn can_restore(&self) -> bool {
        matches!(self, LifecycleState::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_wins_over_in_stock() {
        // The combination should not persist, but derivation still has to
        // pick a side.
        assert_eq!(
            LifecycleState::from_flags(true, true),
            LifecycleState::Deleted
        );
    }

    #[test]
    fn transition_guards() {
        assert!(LifecycleState::Unpublished.can_publish());
        assert!(!LifecycleState::Published.can_publish());
        assert!(!LifecycleState::Deleted.can_publish());
        assert!(LifecycleState::Published.can_delete());
        assert!(LifecycleState::Deleted.can_restore());
        assert!(!LifecycleState::Unpublished.can_restore());
    }
}
