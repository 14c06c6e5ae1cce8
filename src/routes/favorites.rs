use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::success;
use crate::{
    error::AppError,
    models::{auth::AuthenticatedUser, favorite::AddFavoriteRequest},
    services::favorites::FavoriteService,
    AppState,
};

/// GET /favorites
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let dishes =
        FavoriteService::list(state.favorites.as_ref(), state.dishes.as_ref(), user.user_id).await?;
    success(None, dishes)
}

/// POST /favorites { dishId }
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<AddFavoriteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = body?;
    let dish = FavoriteService::add(
        state.favorites.as_ref(),
        state.dishes.as_ref(),
        user.user_id,
        body.dish_id,
    )
    .await?;
    Ok((StatusCode::CREATED, success(Some("Added to favorites"), dish)?))
}

/// DELETE /favorites/{dish_id}
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    dish_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(dish_id) = dish_id.map_err(|_| AppError::NotFound("Dish is not in favorites".into()))?;
    FavoriteService::remove(state.favorites.as_ref(), user.user_id, dish_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "message": "Removed from favorites" })))
}
