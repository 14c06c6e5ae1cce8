//! In-memory store for tests and local experiments.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::seq::SliceRandom;
use tokio::sync::RwLock;
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

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    schedules: Arc<RwLock<HashMap<Uuid, Schedule>>>,
    dishes: Arc<RwLock<HashMap<Uuid, Dish>>>,
    // (user_id, dish_id) in insertion order
    favorites: Arc<RwLock<Vec<(Uuid, Uuid)>>>,
    categories: Arc<RwLock<Vec<Category>>>,
    // append order
    orders: Arc<RwLock<Vec<Order>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_dish(&self, dish: Dish) {
        self.dishes.write().await.insert(dish.id, dish);
    }

    pub async fn insert_category(&self, category: Category) {
        self.categories.write().await.push(category);
    }

    pub async fn remove_dish(&self, id: Uuid) {
        self.dishes.write().await.remove(&id);
        self.favorites.write().await.retain(|(_, dish_id)| *dish_id != id);
    }

    /// Every stored schedule for the user, active or not.
    pub async fn schedules_for(&self, user_id: Uuid) -> Vec<Schedule> {
        self.schedules
            .read()
            .await
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Inserts a row without the existence check, the way a racing writer
    /// that already observed "not found" would.
    pub async fn insert_schedule(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
        meals: Vec<MealSlot>,
    ) -> StoreResult<Schedule> {
        let mut schedules = self.schedules.write().await;
        if schedules
            .values()
            .any(|s| s.user_id == user_id && s.week_start_date == week_start)
        {
            return Err(StoreError::Duplicate("lunch_schedules".into()));
        }
        let now = Utc::now();
        let schedule = Schedule {
            id: Uuid::new_v4(),
            user_id,
            week_start_date: week_start,
            week_end_date: week_end,
            meals,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn create_or_update(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
        week_end: NaiveDate,
        meals: Vec<MealSlot>,
    ) -> StoreResult<Schedule> {
        {
            let mut schedules = self.schedules.write().await;
            if let Some(existing) = schedules
                .values_mut()
                .find(|s| s.user_id == user_id && s.week_start_date == week_start)
            {
                existing.week_end_date = week_end;
                existing.meals = meals;
                existing.updated_at = Utc::now();
                return Ok(existing.clone());
            }
        }
        self.insert_schedule(user_id, week_start, week_end, meals).await
    }

    async fn find_active_by_week(
        &self,
        user_id: Uuid,
        week_start: NaiveDate,
    ) -> StoreResult<Option<Schedule>> {
        let schedules = self.schedules.read().await;
        Ok(schedules
            .values()
            .find(|s| s.user_id == user_id && s.week_start_date == week_start && s.is_active)
            .cloned())
    }

    async fn soft_delete(&self, schedule_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut schedules = self.schedules.write().await;
        match schedules.get_mut(&schedule_id) {
            Some(s) if s.user_id == user_id => {
                s.is_active = false;
                s.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_active(
        &self,
        user_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Schedule>, i64)> {
        let schedules = self.schedules.read().await;
        let mut active: Vec<Schedule> = schedules
            .values()
            .filter(|s| s.user_id == user_id && s.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| b.week_start_date.cmp(&a.week_start_date));

        let total = active.len() as i64;
        let page = active
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();
        Ok((page, total))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl DishCatalog for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Dish>> {
        Ok(self.dishes.read().await.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Dish>> {
        let dishes = self.dishes.read().await;
        Ok(ids.iter().filter_map(|id| dishes.get(id).cloned()).collect())
    }

    async fn list_available(&self, limit: i64) -> StoreResult<Vec<Dish>> {
        let dishes = self.dishes.read().await;
        let mut available: Vec<Dish> = dishes.values().filter(|d| d.is_available).cloned().collect();
        available.sort_by(|a, b| a.name.cmp(&b.name));
        available.truncate(limit.max(0) as usize);
        Ok(available)
    }

    async fn random_available(&self, count: usize) -> StoreResult<Vec<Dish>> {
        let available: Vec<Dish> = {
            let dishes = self.dishes.read().await;
            dishes.values().filter(|d| d.is_available).cloned().collect()
        };
        let mut rng = rand::thread_rng();
        Ok(available.choose_multiple(&mut rng, count).cloned().collect())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn list_dish_ids(&self, user_id: Uuid) -> StoreResult<Vec<Uuid>> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .iter()
            .rev()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, dish_id)| *dish_id)
            .collect())
    }

    async fn add(&self, user_id: Uuid, dish_id: Uuid) -> StoreResult<()> {
        let mut favorites = self.favorites.write().await;
        if favorites.contains(&(user_id, dish_id)) {
            return Err(StoreError::Duplicate("favorite_dishes".into()));
        }
        favorites.push((user_id, dish_id));
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, dish_id: Uuid) -> StoreResult<bool> {
        let mut favorites = self.favorites.write().await;
        let before = favorites.len();
        favorites.retain(|entry| *entry != (user_id, dish_id));
        Ok(favorites.len() != before)
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_by_name(&self) -> StoreResult<Vec<Category>> {
        let mut categories = self.categories.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn record(&self, user_id: Uuid, dish_id: Uuid, price: f64) -> StoreResult<Order> {
        let order = Order { id: Uuid::new_v4(), user_id, dish_id, price, order_date: Utc::now() };
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn list_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().rev().filter(|o| o.user_id == user_id).cloned().collect())
    }
}
