//! Persistence seams for schedules, the dish catalog, favorites, categories
//! and order history.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    category::Category,
    dish::Dish,
    lunch_schedule::{MealSlot, Schedule},
    order::Order,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate key in {0}")]
    Duplicate(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Weekly lunch schedules, at most one row per (user, week start).
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Replaces the meals and week end of the row matching (user, week start),
    /// active or not, or inserts a new active row. Activation state is never
    /// changed by an update. A concurrent insert for the same key fails with
    /// `StoreError::Duplicate`.
    async fn create_or_update(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
        meals: Vec<MealSlot>,
    ) -> StoreResult<Schedule>;

    /// Active schedule for exactly this week start, if any.
    async fn find_active_by_week(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> StoreResult<Option<Schedule>>;

    /// Marks the schedule inactive. Returns false when it does not exist or
    /// belongs to someone else.
    async fn soft_delete(&self, schedule_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    /// Active schedules, newest week first, plus the total active count.
    async fn list_active(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Schedule>, i64)>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Read-only view of the dish catalog.
#[async_trait]
pub trait DishCatalog: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Dish>>;

    /// Batched lookup. Unknown ids are simply absent from the result.
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Dish>>;

    async fn list_available(&self, limit: i64) -> StoreResult<Vec<Dish>>;

    async fn random_available(&self, count: usize) -> StoreResult<Vec<Dish>>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Favorite dish ids, most recently added first.
    async fn list_dish_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>>;

    /// Fails with `StoreError::Duplicate` if the dish is already a favorite.
    async fn add(&self, user_id: Uuid, dish_id: Uuid) -> StoreResult<()>;

    async fn remove(&self, user_id: Uuid, dish_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Every category, sorted by name.
    async fn list_by_name(&self) -> StoreResult<Vec<Category>>;
}

/// Append-only order history.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn record(&self, user_id: Uuid, dish_id: Uuid, price: f64) -> StoreResult<Order>;

    /// The user's orders, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>>;
}
