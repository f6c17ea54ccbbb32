use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{CallerId, RequestId},
    models::{DisplayFields, Favorite, ItemType, NewFavorite, UserIdRef},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavoriteRequest {
    pub item_id: String,
    pub item_type: ItemType,
    #[serde(flatten)]
    pub display: DisplayFields,
}

#[derive(Debug, Serialize)]
pub struct FavoritesResponse {
    pub favorites: Vec<Favorite>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List the caller's favorites, newest first
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerId,
) -> AppResult<Json<FavoritesResponse>> {
    let favorites = state.favorites.list_for_user(caller.as_str()).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %caller,
        count = favorites.len(),
        "Listed favorites"
    );

    Ok(Json(FavoritesResponse { favorites }))
}

/// Favorite an item for the caller
pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerId,
    Json(request): Json<CreateFavoriteRequest>,
) -> AppResult<(StatusCode, Json<Favorite>)> {
    if request.item_id.trim().is_empty() {
        return Err(AppError::InvalidInput("itemId cannot be empty".to_string()));
    }

    let favorite = state
        .favorites
        .insert(NewFavorite {
            user_id: UserIdRef::Authenticated(caller.0.clone()),
            item_id: request.item_id,
            item_type: request.item_type,
            display: request.display,
        })
        .await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %caller,
        item_type = %favorite.item_type,
        item_id = %favorite.item_id,
        "Favorite created"
    );

    Ok((StatusCode::CREATED, Json(favorite)))
}

/// Remove one of the caller's favorites
pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    caller: CallerId,
    Path((item_type, item_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let item_type: ItemType = item_type.parse()?;

    let removed = state
        .favorites
        .delete_for_user(caller.as_str(), item_type, &item_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!(
            "No {} favorite for item {}",
            item_type, item_id
        )));
    }

    tracing::info!(
        request_id = %request_id,
        user_id = %caller,
        item_type = %item_type,
        item_id = %item_id,
        "Favorite removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
