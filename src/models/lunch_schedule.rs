use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::dish::Dish;

/// Maximum length of a meal slot's notes, in characters.
pub const MAX_NOTES_CHARS: usize = 500;

/// Number of days covered by one schedule.
pub const DAYS_PER_WEEK: i64 = 7;

/// One day's entry inside a schedule. Stored as an element of the `meals` JSONB array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealSlot {
    pub date: NaiveDate,
    pub dish_id: Option<Uuid>,
    #[serde(default)]
    pub notes: String,
}

/// A user's plan for one week, keyed by (user_id, week_start_date).
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start_date: NaiveDate,
    pub week_end_date: NaiveDate,
    pub meals: Vec<MealSlot>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reference to a dish as clients send it: a bare id, an inline dish object
/// (as returned by the read endpoints), or a blank string meaning "no dish".
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DishRef {
    Id(Uuid),
    Inline(InlineDish),
    Raw(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct InlineDish {
    #[serde(alias = "_id")]
    pub id: Uuid,
}

/// A meal slot as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    pub date: Option<String>,
    #[serde(default, alias = "dish_id")]
    pub dish_id: Option<DishRef>,
    pub notes: Option<String>,
}

/// Body for POST /lunch-schedule.
/// `meals` stays untyped so a non-array value is reported as a validation error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertScheduleRequest {
    pub week_start_date: Option<String>,
    pub meals: Option<Value>,
}

/// Body for POST /lunch-schedule/generate.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateScheduleRequest {
    pub week_start_date: Option<String>,
}

/// Query params for GET /lunch-schedule/week.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWeekQuery {
    /// Any date or timestamp; its UTC calendar day is the week key.
    pub week_start_date: Option<String>,
}

/// Query params for GET /lunch-schedule. Non-numeric values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Meal slot as returned to clients, with the dish inlined when it still exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSlotView {
    pub date: DateTime<Utc>,
    pub dish_id: Option<Uuid>,
    pub dish: Option<Dish>,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start_date: DateTime<Utc>,
    pub week_end_date: DateTime<Utc>,
    pub meals: Vec<MealSlotView>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleListView {
    pub schedules: Vec<ScheduleView>,
    pub pagination: Pagination,
}
