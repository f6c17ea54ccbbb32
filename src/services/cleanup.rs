use std::fmt::Display;

use serde::Serialize;

use crate::{db::FavoriteStore, error::AppResult};

/// Outcome of a cleanup pass
///
/// `deleted` may differ from `found` when records change between the count
/// and the delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub found: u64,
    pub deleted: u64,
}

impl Display for CleanupReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.found == 0 {
            return write!(f, "No guest favorites found - database is clean");
        }
        write!(
            f,
            "Found {} guest favorites, deleted {}",
            self.found, self.deleted
        )
    }
}

/// Deletes every favorite whose owner was stored as a bare string.
///
/// This does not consult reconciliation, so favorites with a real owner in
/// the legacy shape are deleted too: run the migration first.
pub async fn cleanup_guest_favorites(
    store: &dyn FavoriteStore,
    dry_run: bool,
) -> AppResult<CleanupReport> {
    let found = store.count_legacy_shaped().await?;
    tracing::info!(found, "Found guest favorites to remove");

    if found == 0 || dry_run {
        return Ok(CleanupReport { found, deleted: 0 });
    }

    let deleted = store.delete_legacy_shaped().await?;
    if deleted != found {
        tracing::warn!(found, deleted, "Deleted count differs from found count");
    }
    tracing::info!(deleted, "Deleted guest favorites");

    Ok(CleanupReport { found, deleted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockFavoriteStore;

    #[tokio::test]
    async fn test_cleanup_skips_delete_when_clean() {
        let mut store = MockFavoriteStore::new();
        store.expect_count_legacy_shaped().returning(|| Ok(0));
        store.expect_delete_legacy_shaped().never();

        let report = cleanup_guest_favorites(&store, false).await.unwrap();
        assert_eq!(report, CleanupReport::default());
        assert!(report.to_string().contains("clean"));
    }

    #[tokio::test]
    async fn test_cleanup_dry_run_only_counts() {
        let mut store = MockFavoriteStore::new();
        store.expect_count_legacy_shaped().returning(|| Ok(4));
        store.expect_delete_legacy_shaped().never();

        let report = cleanup_guest_favorites(&store, true).await.unwrap();
        assert_eq!(report.found, 4);
        assert_eq!(report.deleted, 0);
    }

    #[tokio::test]
    async fn test_cleanup_reports_actual_deleted_count() {
        let mut store = MockFavoriteStore::new();
        store.expect_count_legacy_shaped().returning(|| Ok(3));
        store
            .expect_delete_legacy_shaped()
            .times(1)
            .returning(|| Ok(2));

        let report = cleanup_guest_favorites(&store, false).await.unwrap();
        assert_eq!(report, CleanupReport { found: 3, deleted: 2 });
    }
}
