use std::sync::Arc;

use crate::db::{FavoriteStore, MemoryFavoriteStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub favorites: Arc<dyn FavoriteStore>,
}

impl AppState {
    pub fn new(favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { favorites }
    }

    /// State backed by an empty in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryFavoriteStore::new()))
    }
}
