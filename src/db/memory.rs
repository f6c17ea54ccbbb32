use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FavoriteStore, InteractionStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Favorite, Interaction, InteractionKey, InteractionType, ItemType, NewFavorite,
        NewInteraction, UserIdRef,
    },
    services::guest::is_legacy_shaped,
};

/// In-process favorite store with the same uniqueness rules as the table
#[derive(Clone, Default)]
pub struct MemoryFavoriteStore {
    records: Arc<RwLock<Vec<Favorite>>>,
}

impl MemoryFavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing records, kept in the given order
    pub fn with_favorites(favorites: Vec<Favorite>) -> Self {
        Self {
            records: Arc::new(RwLock::new(favorites)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Favorite> {
        self.records.read().await.clone()
    }
}

fn owned_by(favorite: &Favorite, user_id: &str) -> bool {
    matches!(&favorite.user_id, Some(UserIdRef::Authenticated(id)) if id == user_id)
}

#[async_trait::async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn list_all(&self) -> AppResult<Vec<Favorite>> {
        Ok(self.snapshot().await)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        let records = self.records.read().await;
        let mut favorites: Vec<Favorite> = records
            .iter()
            .filter(|f| owned_by(f, user_id))
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    async fn insert(&self, favorite: NewFavorite) -> AppResult<Favorite> {
        let mut records = self.records.write().await;

        let owner = Some(favorite.user_id);
        let duplicate = records.iter().any(|f| {
            f.user_id == owner && f.item_id == favorite.item_id && f.item_type == favorite.item_type
        });
        if duplicate {
            return Err(AppError::Conflict("Favorite already exists".to_string()));
        }

        let now = Utc::now();
        let stored = Favorite {
            id: Uuid::new_v4(),
            user_id: owner,
            item_id: favorite.item_id,
            item_type: favorite.item_type,
            display: favorite.display,
            created_at: Some(now),
            updated_at: Some(now),
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn delete_for_user(
        &self,
        user_id: &str,
        item_type: ItemType,
        item_id: &str,
    ) -> AppResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|f| !(owned_by(f, user_id) && f.item_type == item_type && f.item_id == item_id));
        Ok(records.len() < before)
    }

    async fn count_legacy_shaped(&self) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|f| is_legacy_shaped(f)).count() as u64)
    }

    async fn delete_legacy_shaped(&self) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|f| !is_legacy_shaped(f));
        Ok((before - records.len()) as u64)
    }
}

/// In-process interaction store
///
/// Like the table, it does not enforce key uniqueness on insert.
#[derive(Clone, Default)]
pub struct MemoryInteractionStore {
    records: Arc<RwLock<Vec<Interaction>>>,
}

impl MemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interactions(interactions: Vec<Interaction>) -> Self {
        Self {
            records: Arc::new(RwLock::new(interactions)),
        }
    }

    pub async fn snapshot(&self) -> Vec<Interaction> {
        self.records.read().await.clone()
    }
}

#[async_trait::async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn find_by_key(&self, key: &InteractionKey) -> AppResult<Option<Interaction>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|i| &i.key() == key).cloned())
    }

    async fn insert(&self, interaction: NewInteraction) -> AppResult<Interaction> {
        let key = interaction.key;
        let stored = Interaction {
            id: Uuid::new_v4(),
            user: key.user,
            item_id: key.item_id,
            item_type: key.item_type,
            interaction_type: key.interaction_type,
            created_at: interaction.created_at,
        };
        self.records.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn like_keys(&self) -> AppResult<HashSet<InteractionKey>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|i| i.interaction_type == InteractionType::Like)
            .map(Interaction::key)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayFields;

    fn new_favorite(user: UserIdRef, item_id: &str) -> NewFavorite {
        NewFavorite {
            user_id: user,
            item_id: item_id.to_string(),
            item_type: ItemType::Movie,
            display: DisplayFields::default(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_favorite_conflicts() {
        let store = MemoryFavoriteStore::new();
        let owner = UserIdRef::Authenticated("u1".to_string());

        store.insert(new_favorite(owner.clone(), "m1")).await.unwrap();
        let second = store.insert(new_favorite(owner, "m1")).await;

        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_same_id_in_different_shapes_is_not_duplicate() {
        let store = MemoryFavoriteStore::new();

        store
            .insert(new_favorite(UserIdRef::Authenticated("u1".to_string()), "m1"))
            .await
            .unwrap();
        store
            .insert(new_favorite(UserIdRef::Legacy("u1".to_string()), "m1"))
            .await
            .unwrap();

        assert_eq!(store.snapshot().await.len(), 2);
        assert_eq!(store.list_for_user("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_for_user_only_touches_owner() {
        let store = MemoryFavoriteStore::new();
        store
            .insert(new_favorite(UserIdRef::Authenticated("u1".to_string()), "m1"))
            .await
            .unwrap();
        store
            .insert(new_favorite(UserIdRef::Authenticated("u2".to_string()), "m1"))
            .await
            .unwrap();

        assert!(store.delete_for_user("u1", ItemType::Movie, "m1").await.unwrap());
        assert!(!store.delete_for_user("u1", ItemType::Movie, "m1").await.unwrap());
        assert_eq!(store.list_for_user("u2").await.unwrap().len(), 1);
    }
}
