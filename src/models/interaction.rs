use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::ItemType;
use crate::error::AppError;

/// Item kind as recorded on interactions (always lower-case)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InteractionItemType {
    Movie,
    Music,
}

impl InteractionItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionItemType::Movie => "movie",
            InteractionItemType::Music => "music",
        }
    }
}

impl From<ItemType> for InteractionItemType {
    fn from(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Movie => InteractionItemType::Movie,
            ItemType::Music => InteractionItemType::Music,
        }
    }
}

impl Display for InteractionItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InteractionItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(InteractionItemType::Movie),
            "music" => Ok(InteractionItemType::Music),
            _ => Err(AppError::Internal(format!(
                "Unknown interaction item type: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Like,
    Dislike,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Like => "like",
            InteractionType::Dislike => "dislike",
        }
    }
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(InteractionType::Like),
            "dislike" => Ok(InteractionType::Dislike),
            _ => Err(AppError::Internal(format!("Unknown interaction type: {}", s))),
        }
    }
}

/// Identity of an interaction; at most one record exists per key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InteractionKey {
    pub user: String,
    pub item_id: String,
    pub item_type: InteractionItemType,
    pub interaction_type: InteractionType,
}

impl InteractionKey {
    pub fn like(user: impl Into<String>, item_id: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            user: user.into(),
            item_id: item_id.into(),
            item_type: item_type.into(),
            interaction_type: InteractionType::Like,
        }
    }
}

/// Canonical per-user engagement record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user: String,
    pub item_id: String,
    pub item_type: InteractionItemType,
    pub interaction_type: InteractionType,
    pub created_at: DateTime<Utc>,
}

impl Interaction {
    pub fn key(&self) -> InteractionKey {
        InteractionKey {
            user: self.user.clone(),
            item_id: self.item_id.clone(),
            item_type: self.item_type,
            interaction_type: self.interaction_type,
        }
    }
}

/// An interaction about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub key: InteractionKey,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_is_lowercased() {
        let converted: InteractionItemType = ItemType::Movie.into();
        assert_eq!(converted.as_str(), "movie");
        assert_eq!(serde_json::to_string(&converted).unwrap(), "\"movie\"");
    }

    #[test]
    fn test_like_key() {
        let key = InteractionKey::like("u1", "m1", ItemType::Music);
        assert_eq!(key.item_type, InteractionItemType::Music);
        assert_eq!(key.interaction_type, InteractionType::Like);
    }

    #[test]
    fn test_stored_labels_parse() {
        assert_eq!("like".parse::<InteractionType>().unwrap(), InteractionType::Like);
        assert_eq!(
            "music".parse::<InteractionItemType>().unwrap(),
            InteractionItemType::Music
        );
        assert!("Movie".parse::<InteractionItemType>().is_err());
    }
}
