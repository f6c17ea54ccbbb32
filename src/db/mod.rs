use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{Favorite, Interaction, InteractionKey, ItemType, NewFavorite, NewInteraction},
};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryFavoriteStore, MemoryInteractionStore};
pub use postgres::{create_pool, run_migrations, PgFavoriteStore, PgInteractionStore};

/// Persisted collection of legacy favorites
///
/// Favorites are unique on (owner reference, item id, item type), where the
/// owner reference includes its storage shape.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Every favorite, in the store's natural read order
    async fn list_all(&self) -> AppResult<Vec<Favorite>>;

    /// Favorites owned by an authenticated user, newest first
    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Favorite>>;

    /// Stores a favorite. A duplicate triple fails with `AppError::Conflict`.
    async fn insert(&self, favorite: NewFavorite) -> AppResult<Favorite>;

    /// Removes one of an authenticated user's favorites; `false` if absent
    async fn delete_for_user(
        &self,
        user_id: &str,
        item_type: ItemType,
        item_id: &str,
    ) -> AppResult<bool>;

    /// Number of favorites whose owner is stored as a bare string
    async fn count_legacy_shaped(&self) -> AppResult<u64>;

    /// Deletes every favorite whose owner is stored as a bare string
    async fn delete_legacy_shaped(&self) -> AppResult<u64>;
}

/// Persisted collection of canonical interactions
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    async fn find_by_key(&self, key: &InteractionKey) -> AppResult<Option<Interaction>>;

    async fn insert(&self, interaction: NewInteraction) -> AppResult<Interaction>;

    /// Keys of every stored `like` interaction
    async fn like_keys(&self) -> AppResult<HashSet<InteractionKey>>;
}
