/// Read-side visibility tier applied symmetrically to entities and their
/// products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Visibility {
    /// Published and not soft-deleted. The storefront view.
    #[default]
    Listed,
    /// Everything, soft-deleted rows included. Soft-deleted rows are always
    /// unpublished, so this tier subsumes the other two.
    WithDeleted,
    /// Unpublished rows included, soft-deleted rows excluded. The back
    /// office view.
    WithUnpublished,
}

impl Visibility {
    /// Whether a row with the given flags is inside this tier.
    pub fn admits(&self, in_stock: bool, deleted: bool) -> bool {
        match self {
            Visibility::Listed => in_stock && !deleted,
            Visibility::WithDeleted => true,
            Visibility::WithUnpublished => !deleted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_membership() {
        assert!(Visibility::Listed.admits(true, false));
        assert!(!Visibility::Listed.admits(false, false));
        assert!(!Visibility::Listed.admits(false, true));

        assert!(Visibility::WithUnpublished.admits(false, false));
        assert!(!Visibility::WithUnpublished.admits(false, true));

        assert!(Visibility::WithDeleted.admits(false, true));
        assert!(Visibility::WithDeleted.admits(true, false));
    }
}
