pub mod cleanup;
pub mod guest;
pub mod read_repair;
pub mod reconcile;

pub use cleanup::{cleanup_guest_favorites, CleanupReport};
pub use guest::{is_guest, is_legacy_shaped};
pub use read_repair::FavoritesClient;
pub use reconcile::{migrate_favorites, plan_migration, reconcile, MigrationReport, Reconciliation};
