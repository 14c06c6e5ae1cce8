use axum::{extract::State, Json};
use serde_json::Value;

use super::success;
use crate::{error::AppError, services::categories::CategoryService, AppState};

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let categories = CategoryService::list(state.categories.as_ref()).await?;
    success(None, categories)
}
