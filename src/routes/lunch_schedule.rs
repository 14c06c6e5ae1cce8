use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use super::success;
use crate::{
    error::AppError,
    models::{
        auth::AuthenticatedUser,
        lunch_schedule::{
            GenerateScheduleRequest, ScheduleListQuery, ScheduleWeekQuery, UpsertScheduleRequest,
        },
    },
    services::lunch_schedule::{GenerateOutcome, LunchScheduleService},
    AppState,
};

/// POST /lunch-schedule — create or replace the caller's plan for a week
pub async fn save_schedule(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<UpsertScheduleRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let schedule = LunchScheduleService::save(
        state.schedules.as_ref(),
        state.dishes.as_ref(),
        user.user_id,
        &body,
    )
    .await?;
    success(Some("Lunch schedule saved"), schedule)
}

/// GET /lunch-schedule/week?weekStartDate=YYYY-MM-DD
pub async fn get_week(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<ScheduleWeekQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let schedule = LunchScheduleService::get_week(
        state.schedules.as_ref(),
        state.dishes.as_ref(),
        user.user_id,
        query.week_start_date.as_deref(),
    )
    .await?;
    match schedule {
        Some(schedule) => success(None, schedule),
        None => success(Some("No schedule for this week yet"), Value::Null),
    }
}

/// GET /lunch-schedule?page=&limit=
pub async fn list_schedules(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<ScheduleListQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(query) = query?;
    let list = LunchScheduleService::list(
        state.schedules.as_ref(),
        state.dishes.as_ref(),
        user.user_id,
        &query,
    )
    .await?;
    success(None, list)
}

/// POST /lunch-schedule/generate — fill a week from the caller's favorites
pub async fn generate_schedule(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    body: Result<Json<GenerateScheduleRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = body?;
    let outcome = LunchScheduleService::generate(
        state.schedules.as_ref(),
        state.dishes.as_ref(),
        state.favorites.as_ref(),
        user.user_id,
        body.week_start_date.as_deref(),
    )
    .await?;
    match outcome {
        GenerateOutcome::Generated(schedule) => {
            success(Some("Lunch schedule generated from your favorites"), schedule)
        }
        GenerateOutcome::NoHistory => success(
            Some("No favorites yet. Add some favorite dishes first."),
            Value::Null,
        ),
    }
}

/// DELETE /lunch-schedule/{schedule_id} — soft delete, owner only
pub async fn delete_schedule(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    schedule_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    // A malformed id gets the same answer as a missing one.
    let Path(schedule_id) =
        schedule_id.map_err(|_| AppError::NotFound("Lunch schedule not found".into()))?;
    LunchScheduleService::delete(state.schedules.as_ref(), user.user_id, schedule_id).await?;
    Ok(Json(json!({ "success": true, "message": "Lunch schedule deleted" })))
}
