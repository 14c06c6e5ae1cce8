use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::dish::Dish;

/// One recorded order in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dish_id: Uuid,
    pub price: f64,
    pub order_date: DateTime<Utc>,
}

/// Body for POST /history. `price` defaults to the dish's current price.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub dish_id: Uuid,
    pub price: Option<f64>,
}

/// An order with its dish inlined; `dish` is null once the dish is gone.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub dish_id: Uuid,
    pub dish: Option<Dish>,
    pub price: f64,
    pub order_date: DateTime<Utc>,
}
