use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A catalog entry. Read-only from the scheduler's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image: String,
    pub rating: f64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Number of dishes returned by GET /dishes/suggestions.
pub const SUGGESTION_COUNT: usize = 3;

/// Query params for GET /dishes.
#[derive(Debug, Deserialize)]
pub struct DishListQuery {
    pub limit: Option<String>,
}
