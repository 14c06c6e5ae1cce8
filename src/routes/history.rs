use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::success;
use crate::{
    error::AppError,
    models::{auth::AuthenticatedUser, order::CreateOrderRequest},
    services::orders::OrderService,
    AppState,
};

/// GET /history
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, AppError> {
    let orders = OrderService::history(state.orders.as_ref(), state.dishes.as_ref(), user.user_id).await?;
    success(None, orders)
}

/// POST /history { dishId, price? }
pub async fn record_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(body) = body?;
    let order =
        OrderService::record(state.orders.as_ref(), state.dishes.as_ref(), user.user_id, &body).await?;
    Ok((StatusCode::CREATED, success(Some("Order saved to history"), order)?))
}
