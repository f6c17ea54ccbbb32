use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use crate::error::AppError;

/// Field name carrying the typed identifier inside a stored owner reference
pub const OID_FIELD: &str = "$oid";

/// Kind of item a favorite points at
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ItemType {
    Movie,
    Music,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Movie => "Movie",
            ItemType::Music => "Music",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("movie") {
            Ok(ItemType::Movie)
        } else if s.eq_ignore_ascii_case("music") {
            Ok(ItemType::Music)
        } else {
            Err(AppError::InvalidInput(format!("Unknown item type: {}", s)))
        }
    }
}

/// Owner reference of a favorite, classified by how it was stored
///
/// Records written before authentication existed carry a bare string
/// (`Legacy`); records written by the authenticated API carry a typed
/// identifier (`Authenticated`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserIdRef {
    Legacy(String),
    Authenticated(String),
}

impl UserIdRef {
    /// The identifier value, regardless of storage shape
    pub fn as_str(&self) -> &str {
        match self {
            UserIdRef::Legacy(id) | UserIdRef::Authenticated(id) => id,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, UserIdRef::Legacy(_))
    }

    /// Decodes a stored owner reference. SQL/JSON null means no owner.
    ///
    /// Any non-string shape counts as typed; an object without `$oid`
    /// keeps its JSON text as the identifier.
    pub fn from_stored(value: Option<Value>) -> Option<Self> {
        match value? {
            Value::Null => None,
            Value::String(id) => Some(UserIdRef::Legacy(id)),
            Value::Object(map) => {
                let oid = map.get(OID_FIELD).and_then(Value::as_str).map(str::to_string);
                Some(UserIdRef::Authenticated(
                    oid.unwrap_or_else(|| Value::Object(map).to_string()),
                ))
            }
            other => Some(UserIdRef::Authenticated(other.to_string())),
        }
    }

    /// Encodes the reference in its stored shape
    pub fn to_stored(&self) -> Value {
        match self {
            UserIdRef::Legacy(id) => Value::String(id.clone()),
            UserIdRef::Authenticated(id) => json!({ "$oid": id }),
        }
    }
}

impl Display for UserIdRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for UserIdRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Display fields copied onto a favorite when it is created
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    /// Music only
    #[serde(default)]
    pub artist: Option<String>,
}

/// Legacy favorite record, one per (user, item, item type)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Option<UserIdRef>,
    pub item_id: String,
    pub item_type: ItemType,
    #[serde(flatten)]
    pub display: DisplayFields,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Favorite {
    /// Owner identifier, if any, without regard to storage shape
    pub fn owner(&self) -> Option<&str> {
        self.user_id.as_ref().map(UserIdRef::as_str)
    }
}

/// A favorite about to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewFavorite {
    pub user_id: UserIdRef,
    pub item_id: String,
    pub item_type: ItemType,
    pub display: DisplayFields,
}
