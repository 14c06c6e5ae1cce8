pub mod categories;
pub mod dishes;
pub mod favorites;
pub mod health;
pub mod history;
pub mod lunch_schedule;

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::{error::AppError, middleware::auth::JwtSecret, AppState};

/// Every route, with the JWT secret and request tracing layered on.
pub fn build_router(state: AppState) -> Router {
    let jwt_secret = JwtSecret(state.config.jwt_secret.clone());

    Router::new()
        .route("/health", get(health::health_check))
        // Dish catalog (public)
        .route("/dishes", get(dishes::list_dishes))
        .route("/dishes/suggestions", get(dishes::suggestions))
        .route("/dishes/{id}", get(dishes::get_dish))
        .route("/categories", get(categories::list_categories))
        // Favorites
        .route("/favorites", get(favorites::list_favorites).post(favorites::add_favorite))
        .route("/favorites/{dish_id}", delete(favorites::remove_favorite))
        // Order history
        .route("/history", get(history::list_history).post(history::record_order))
        // Weekly lunch schedule
        .route(
            "/lunch-schedule",
            get(lunch_schedule::list_schedules).post(lunch_schedule::save_schedule),
        )
        .route("/lunch-schedule/week", get(lunch_schedule::get_week))
        .route("/lunch-schedule/generate", post(lunch_schedule::generate_schedule))
        .route("/lunch-schedule/{schedule_id}", delete(lunch_schedule::delete_schedule))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `{ "success": true, "message"?: ..., "data": ... }`
pub(crate) fn success<T: Serialize>(message: Option<&str>, data: T) -> Result<Json<Value>, AppError> {
    let data = serde_json::to_value(data).map_err(anyhow::Error::from)?;
    let mut body = json!({ "success": true, "data": data });
    if let Some(message) = message {
        body["message"] = json!(message);
    }
    Ok(Json(body))
}
