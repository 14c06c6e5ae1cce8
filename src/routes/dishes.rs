use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use super::success;
use crate::{
    error::AppError, models::dish::DishListQuery, services::dishes::DishService, AppState,
};

/// GET /dishes?limit=
pub async fn list_dishes(
    State(state): State<AppState>,
    Query(query): Query<DishListQuery>,
) -> Result<Json<Value>, AppError> {
    let dishes = DishService::list_available(state.dishes.as_ref(), &query).await?;
    success(None, dishes)
}

/// GET /dishes/suggestions
pub async fn suggestions(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let dishes = DishService::suggestions(state.dishes.as_ref()).await?;
    success(Some("Random dish suggestions"), dishes)
}

/// GET /dishes/{id}
pub async fn get_dish(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(id) = id.map_err(|_| AppError::NotFound("Dish not found".into()))?;
    let dish = DishService::get(state.dishes.as_ref(), id).await?;
    success(None, dish)
}
