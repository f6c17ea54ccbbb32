//! Favorites API client with a read-repair fallback for liked movies
//!
//! Interaction data can lag behind the favorites collection. The helper here
//! rebuilds the liked-movie list straight from favorites, hydrating each movie
//! with its own request.

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    middleware::caller::USER_ID_HEADER,
    models::{FavoriteEntry, FavoritesPayload, Movie},
};

#[derive(Clone)]
pub struct FavoritesClient {
    http_client: HttpClient,
    base_url: String,
    user_id: String,
}

impl FavoritesClient {
    /// Creates a client acting on behalf of `user_id`
    pub fn new(base_url: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_http_client(HttpClient::new(), base_url, user_id)
    }

    pub fn with_http_client(
        http_client: HttpClient,
        base_url: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http_client
            .get(&url)
            .header(USER_ID_HEADER, &self.user_id)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "GET {} returned status {}: {}",
                path, status, body
            )));
        }

        Ok(response.json().await?)
    }

    /// `GET /api/favorites`, accepting a wrapped or bare list
    pub async fn fetch_favorites(&self) -> AppResult<Vec<FavoriteEntry>> {
        let payload: FavoritesPayload = self.get_json("/api/favorites").await?;
        Ok(payload.into_entries())
    }

    /// `GET /api/movies/{id}`, returned as served
    pub async fn fetch_movie(&self, movie_id: &str) -> AppResult<Movie> {
        self.get_json(&format!("/api/movies/{}", movie_id)).await
    }

    /// Liked movies rebuilt from the caller's favorites.
    ///
    /// Never fails: if the favorites list cannot be fetched the result is
    /// empty, and movies whose details cannot be fetched are left out.
    pub async fn liked_movies_from_favorites(&self) -> Vec<Movie> {
        let favorites = match self.fetch_favorites().await {
            Ok(favorites) => favorites,
            Err(e) => {
                tracing::error!(error = %e, "Error getting liked movies from favorites");
                return Vec::new();
            }
        };

        let ids = movie_ids(&favorites);
        tracing::debug!(favorites = favorites.len(), movies = ids.len(), "Resolved movie favorites");

        if ids.is_empty() {
            return Vec::new();
        }

        let mut tasks = Vec::new();
        for movie_id in ids {
            let client = self.clone();
            let task = tokio::spawn(async move {
                let result = client.fetch_movie(&movie_id).await;
                (movie_id, result)
            });
            tasks.push(task);
        }

        let mut movies = Vec::new();
        for task in tasks {
            match task.await {
                Ok((_, Ok(movie))) => movies.push(movie),
                Ok((movie_id, Err(e))) => {
                    tracing::error!(movie_id = %movie_id, error = %e, "Error fetching movie");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                }
            }
        }

        tracing::info!(count = movies.len(), "Hydrated liked movies from favorites");
        movies
    }
}

/// Ids of the movie favorites, in order, whether the item is expanded or not.
///
/// The item reference is only looked at once the entry is known to be a
/// movie; movie entries without a usable reference are skipped.
pub fn movie_ids(favorites: &[FavoriteEntry]) -> Vec<String> {
    favorites
        .iter()
        .filter(|favorite| favorite.is_movie())
        .filter_map(|favorite| match favorite.item_ref() {
            Some(item) => Some(item.id().to_string()),
            None => {
                tracing::warn!(
                    item_id = %favorite.item_id,
                    "Skipping movie favorite without a usable item reference"
                );
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn entry(item_id: Value, item_type: &str) -> FavoriteEntry {
        FavoriteEntry {
            item_id,
            item_type: Some(item_type.to_string()),
        }
    }

    #[test]
    fn test_movie_ids_keeps_only_movies_in_order() {
        let favorites = vec![
            entry(json!("m1"), "Movie"),
            entry(json!("s1"), "Music"),
            entry(json!({ "_id": "m2", "title": "Alien" }), "Movie"),
        ];

        assert_eq!(movie_ids(&favorites), vec!["m1", "m2"]);
    }

    #[test]
    fn test_movie_ids_is_case_sensitive_on_type() {
        let favorites = vec![entry(json!("m1"), "movie")];
        assert!(movie_ids(&favorites).is_empty());
    }

    #[test]
    fn test_movie_ids_ignores_unresolvable_refs() {
        let favorites = vec![
            entry(json!("m1"), "Movie"),
            entry(Value::Null, "Music"),
            entry(Value::Null, "Movie"),
            entry(json!({ "title": "No id" }), "Movie"),
            entry(json!("m2"), "Movie"),
        ];

        assert_eq!(movie_ids(&favorites), vec!["m1", "m2"]);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = FavoritesClient::new("http://localhost:3000/", "u1");
        assert_eq!(client.base_url, "http://localhost:3000");
    }
}
