use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{
    CategoryStore, DishCatalog, FavoriteStore, OrderStore, ScheduleStore, StoreError, StoreResult,
};
use crate::models::{
    category::Category,
    dish::Dish,
    lunch_schedule::{MealSlot, Schedule},
    order::Order,
};

const SCHEDULE_COLUMNS: &str =
    "id, user_id, week_start_date, week_end_date, meals, is_active, created_at, updated_at";

const DISH_COLUMNS: &str =
    "id, name, description, price, image, rating, is_available, created_at, updated_at";

const ORDER_COLUMNS: &str = "id, user_id, dish_id, price, order_date";

/// PostgreSQL-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ScheduleRow {
    id: Uuid,
    user_id: Uuid,
    week_start_date: NaiveDate,
    week_end_date: NaiveDate,
    meals: Json<Vec<MealSlot>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        Schedule {
            id: row.id,
            user_id: row.user_id,
            week_start_date: row.week_start_date,
            week_end_date: row.week_end_date,
            meals: row.meals.0,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn classify(e: sqlx::Error, table: &str) -> StoreError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate(table.to_string());
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn create_or_update(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
        meals: Vec<MealSlot>,
    ) -> StoreResult<Schedule> {
        let existing: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM lunch_schedules WHERE user_id = $1 AND week_start_date = $2",
        )
        .bind(user_id)
        .bind(week_start)
        .fetch_optional(&self.pool)
        .await?;

        let row = match existing {
            Some(id) => sqlx::query_as::<_, ScheduleRow>(&format!(
                r#"UPDATE lunch_schedules
                   SET week_end_date = $2,
                       meals = $3,
                       updated_at = NOW()
                   WHERE id = $1
                   RETURNING {SCHEDULE_COLUMNS}"#
            ))
            .bind(id)
            .bind(week_end)
            .bind(Json(&meals))
            .fetch_one(&self.pool)
            .await?,
            None => sqlx::query_as::<_, ScheduleRow>(&format!(
                r#"INSERT INTO lunch_schedules (user_id, week_start_date, week_end_date, meals)
                   VALUES ($1, $2, $3, $4)
                   RETURNING {SCHEDULE_COLUMNS}"#
            ))
            .bind(user_id)
            .bind(week_start)
            .bind(week_end)
            .bind(Json(&meals))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "lunch_schedules"))?,
        };
        Ok(row.into())
    }

    async fn find_active_by_week(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> StoreResult<Option<Schedule>> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"SELECT {SCHEDULE_COLUMNS}
               FROM lunch_schedules
               WHERE user_id = $1 AND week_start_date = $2 AND is_active = TRUE"#
        ))
        .bind(user_id)
        .bind(week_start)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn soft_delete(&self, schedule_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"UPDATE lunch_schedules
               SET is_active = FALSE, updated_at = NOW()
               WHERE id = $1 AND user_id = $2"#,
        )
        .bind(schedule_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Schedule>, i64)> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"SELECT {SCHEDULE_COLUMNS}
               FROM lunch_schedules
               WHERE user_id = $1 AND is_active = TRUE
               ORDER BY week_start_date DESC
               LIMIT $2 OFFSET $3"#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lunch_schedules WHERE user_id = $1 AND is_active = TRUE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DishCatalog for PgStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Dish>> {
        let dish = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(dish)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Dish>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let dishes = sqlx::query_as::<_, Dish>(&format!(
            "SELECT {DISH_COLUMNS} FROM dishes WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }

    async fn list_available(&self, limit: i64) -> StoreResult<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(&format!(
            r#"SELECT {DISH_COLUMNS} FROM dishes
               WHERE is_available = TRUE
               ORDER BY name
               LIMIT $1"#
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }

    async fn random_available(&self, count: usize) -> StoreResult<Vec<Dish>> {
        let dishes = sqlx::query_as::<_, Dish>(&format!(
            r#"SELECT {DISH_COLUMNS} FROM dishes
               WHERE is_available = TRUE
               ORDER BY random()
               LIMIT $1"#
        ))
        .bind(count as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(dishes)
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    async fn list_dish_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let ids = sqlx::query_scalar(
            "SELECT dish_id FROM favorite_dishes WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn add(&self, user_id: Uuid, dish_id: Uuid) -> StoreResult<()> {
        sqlx::query("INSERT INTO favorite_dishes (user_id, dish_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(dish_id)
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "favorite_dishes"))?;
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, dish_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM favorite_dishes WHERE user_id = $1 AND dish_id = $2")
            .bind(user_id)
            .bind(dish_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn list_by_name(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, description, image, is_active, created_at, updated_at
               FROM categories
               ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn record(&self, user_id: Uuid, dish_id: Uuid, price: f64) -> StoreResult<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"INSERT INTO orders (user_id, dish_id, price)
               VALUES ($1, $2, $3)
               RETURNING {ORDER_COLUMNS}"#
        ))
        .bind(user_id)
        .bind(dish_id)
        .bind(price)
        .fetch_one(&self.pool)
        .await?;
        Ok(order)
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"SELECT {ORDER_COLUMNS} FROM orders
               WHERE user_id = $1
               ORDER BY order_date DESC"#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }
}
