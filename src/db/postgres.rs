use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use super::{FavoriteStore, InteractionStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        DisplayFields, Favorite, Interaction, InteractionKey, InteractionType, ItemType,
        NewFavorite, NewInteraction, UserIdRef,
    },
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled schema migrations
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn map_unique_violation(err: sqlx::Error, what: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(format!("{} already exists", what));
        }
    }
    AppError::Database(err)
}

// ============================================================================
// Favorites
// ============================================================================

#[derive(Debug, FromRow)]
struct FavoriteRow {
    id: Uuid,
    user_id: Option<Value>,
    item_id: String,
    item_type: String,
    title: Option<String>,
    poster_path: Option<String>,
    rating: Option<f64>,
    release_date: Option<String>,
    artist: Option<String>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = AppError;

    fn try_from(row: FavoriteRow) -> Result<Self, Self::Error> {
        let item_type = row.item_type.parse::<ItemType>().map_err(|_| {
            AppError::Internal(format!(
                "Favorite {} has unknown item type {}",
                row.id, row.item_type
            ))
        })?;

        Ok(Favorite {
            id: row.id,
            user_id: UserIdRef::from_stored(row.user_id),
            item_id: row.item_id,
            item_type,
            display: DisplayFields {
                title: row.title,
                poster_path: row.poster_path,
                rating: row.rating,
                release_date: row.release_date,
                artist: row.artist,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_favorites(rows: Vec<FavoriteRow>) -> AppResult<Vec<Favorite>> {
    rows.into_iter().map(Favorite::try_from).collect()
}

/// Favorite store backed by the `favorites` table
#[derive(Clone)]
pub struct PgFavoriteStore {
    pool: PgPool,
}

impl PgFavoriteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FavoriteStore for PgFavoriteStore {
    async fn list_all(&self) -> AppResult<Vec<Favorite>> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT id, user_id, item_id, item_type, title, poster_path, rating,
                   release_date, artist, created_at, updated_at
            FROM favorites
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        into_favorites(rows)
    }

    async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        let owner = UserIdRef::Authenticated(user_id.to_string()).to_stored();
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT id, user_id, item_id, item_type, title, poster_path, rating,
                   release_date, artist, created_at, updated_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC NULLS LAST
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        into_favorites(rows)
    }

    async fn insert(&self, favorite: NewFavorite) -> AppResult<Favorite> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites (id, user_id, item_id, item_type, title, poster_path,
                                   rating, release_date, artist, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id, user_id, item_id, item_type, title, poster_path, rating,
                      release_date, artist, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(favorite.user_id.to_stored())
        .bind(&favorite.item_id)
        .bind(favorite.item_type.as_str())
        .bind(&favorite.display.title)
        .bind(&favorite.display.poster_path)
        .bind(favorite.display.rating)
        .bind(&favorite.display.release_date)
        .bind(&favorite.display.artist)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Favorite"))?;

        Favorite::try_from(row)
    }

    async fn delete_for_user(
        &self,
        user_id: &str,
        item_type: ItemType,
        item_id: &str,
    ) -> AppResult<bool> {
        let owner = UserIdRef::Authenticated(user_id.to_string()).to_stored();
        let result = sqlx::query(
            "DELETE FROM favorites WHERE user_id = $1 AND item_type = $2 AND item_id = $3",
        )
        .bind(owner)
        .bind(item_type.as_str())
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_legacy_shaped(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM favorites WHERE jsonb_typeof(user_id) = 'string'",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn delete_legacy_shaped(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM favorites WHERE jsonb_typeof(user_id) = 'string'")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Interactions
// ============================================================================

#[derive(Debug, FromRow)]
struct InteractionRow {
    id: Uuid,
    user_id: String,
    item_id: String,
    item_type: String,
    interaction_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InteractionRow> for Interaction {
    type Error = AppError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        Ok(Interaction {
            id: row.id,
            user: row.user_id,
            item_id: row.item_id,
            item_type: row.item_type.parse()?,
            interaction_type: row.interaction_type.parse()?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct InteractionKeyRow {
    user_id: String,
    item_id: String,
    item_type: String,
}

/// Interaction store backed by the `user_interactions` table
#[derive(Clone)]
pub struct PgInteractionStore {
    pool: PgPool,
}

impl PgInteractionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InteractionStore for PgInteractionStore {
    async fn find_by_key(&self, key: &InteractionKey) -> AppResult<Option<Interaction>> {
        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            SELECT id, user_id, item_id, item_type, interaction_type, created_at
            FROM user_interactions
            WHERE user_id = $1 AND item_id = $2 AND item_type = $3 AND interaction_type = $4
            LIMIT 1
            "#,
        )
        .bind(&key.user)
        .bind(&key.item_id)
        .bind(key.item_type.as_str())
        .bind(key.interaction_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Interaction::try_from).transpose()
    }

    async fn insert(&self, interaction: NewInteraction) -> AppResult<Interaction> {
        let key = &interaction.key;
        let row = sqlx::query_as::<_, InteractionRow>(
            r#"
            INSERT INTO user_interactions (id, user_id, item_id, item_type, interaction_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, item_id, item_type, interaction_type, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&key.user)
        .bind(&key.item_id)
        .bind(key.item_type.as_str())
        .bind(key.interaction_type.as_str())
        .bind(interaction.created_at)
        .fetch_one(&self.pool)
        .await?;

        Interaction::try_from(row)
    }

    async fn like_keys(&self) -> AppResult<HashSet<InteractionKey>> {
        let rows = sqlx::query_as::<_, InteractionKeyRow>(
            "SELECT user_id, item_id, item_type FROM user_interactions WHERE interaction_type = $1",
        )
        .bind(InteractionType::Like.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> AppResult<InteractionKey> {
                Ok(InteractionKey {
                    user: row.user_id,
                    item_id: row.item_id,
                    item_type: row.item_type.parse()?,
                    interaction_type: InteractionType::Like,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(user_id: Option<Value>, item_type: &str) -> FavoriteRow {
        FavoriteRow {
            id: Uuid::new_v4(),
            user_id,
            item_id: "m1".to_string(),
            item_type: item_type.to_string(),
            title: Some("Heat".to_string()),
            poster_path: None,
            rating: Some(8.3),
            release_date: None,
            artist: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_jsonb_string_owner_decodes_as_legacy() {
        let favorite = Favorite::try_from(row(Some(json!("guest")), "Movie")).unwrap();
        assert_eq!(favorite.user_id, Some(UserIdRef::Legacy("guest".to_string())));
        assert_eq!(favorite.display.title.as_deref(), Some("Heat"));
    }

    #[test]
    fn test_jsonb_oid_owner_decodes_as_authenticated() {
        let favorite = Favorite::try_from(row(Some(json!({ "$oid": "u1" })), "Music")).unwrap();
        assert_eq!(favorite.user_id, Some(UserIdRef::Authenticated("u1".to_string())));
        assert_eq!(favorite.item_type, ItemType::Music);
    }

    #[test]
    fn test_sql_null_and_json_null_owner_decode_as_absent() {
        let favorite = Favorite::try_from(row(None, "Movie")).unwrap();
        assert!(favorite.user_id.is_none());

        let favorite = Favorite::try_from(row(Some(Value::Null), "Movie")).unwrap();
        assert!(favorite.user_id.is_none());
    }

    #[test]
    fn test_unknown_item_type_is_internal_error() {
        let result = Favorite::try_from(row(None, "Podcast"));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_interaction_row_requires_known_types() {
        let interaction_row = InteractionRow {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            item_id: "m1".to_string(),
            item_type: "movie".to_string(),
            interaction_type: "like".to_string(),
            created_at: Utc::now(),
        };
        let interaction = Interaction::try_from(interaction_row).unwrap();
        assert_eq!(interaction.interaction_type, InteractionType::Like);

        let interaction_row = InteractionRow {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            item_id: "m1".to_string(),
            item_type: "Movie".to_string(),
            interaction_type: "like".to_string(),
            created_at: Utc::now(),
        };
        assert!(Interaction::try_from(interaction_row).is_err());
    }
}
