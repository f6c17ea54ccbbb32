use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ItemType;

// ============================================================================
// Favorites API client types
// ============================================================================

/// Movie record returned by `GET /api/movies/{id}`
///
/// Only `_id` and `title` are read; every other field is carried through
/// untouched in `extra`, including the `id` virtual some serializers add.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Movie {
    /// `_id`, falling back to a plain `id` field
    pub fn id(&self) -> Option<&str> {
        self.object_id
            .as_deref()
            .or_else(|| self.extra.get("id").and_then(Value::as_str))
    }
}

/// Item populated inline by the favorites API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Reference to a favorited item: a bare id, or the item expanded in place
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ItemRef {
    Id(String),
    Expanded(ItemSummary),
}

impl ItemRef {
    pub fn id(&self) -> &str {
        match self {
            ItemRef::Id(id) => id,
            ItemRef::Expanded(item) => &item.id,
        }
    }
}

/// A favorite as seen by API consumers.
///
/// `item_id` stays raw until the entry is known to be a movie: populated
/// references to deleted items come back as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    #[serde(default)]
    pub item_id: Value,
    #[serde(default)]
    pub item_type: Option<String>,
}

impl FavoriteEntry {
    /// Exact, case-sensitive match on `"Movie"`
    pub fn is_movie(&self) -> bool {
        self.item_type.as_deref() == Some(ItemType::Movie.as_str())
    }

    /// The item reference, if `item_id` holds a bare id or an expanded item
    pub fn item_ref(&self) -> Option<ItemRef> {
        ItemRef::deserialize(&self.item_id).ok()
    }
}

/// `GET /api/favorites` body: either wrapped in `favorites` or a bare list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FavoritesPayload {
    Wrapped { favorites: Vec<FavoriteEntry> },
    Bare(Vec<FavoriteEntry>),
}

impl FavoritesPayload {
    pub fn into_entries(self) -> Vec<FavoriteEntry> {
        match self {
            FavoritesPayload::Wrapped { favorites } => favorites,
            FavoritesPayload::Bare(favorites) => favorites,
        }
    }
}
