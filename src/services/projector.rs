//! Builds the client-facing schedule shape with dish details inlined.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    models::{
        dish::Dish,
        lunch_schedule::{MealSlotView, Schedule, ScheduleView},
    },
    services::week_key::to_utc_midnight,
    store::{DishCatalog, StoreResult},
};

pub async fn project(catalog: &dyn DishCatalog, schedule: Schedule) -> StoreResult<ScheduleView> {
    let mut views = project_many(catalog, vec![schedule]).await?;
    Ok(views.remove(0))
}

/// Projects several schedules with a single catalog lookup for all their dishes.
pub async fn project_many(
    catalog: &dyn DishCatalog,
    schedules: Vec<Schedule>,
) -> StoreResult<Vec<ScheduleView>> {
    let mut ids: Vec<Uuid> = Vec::new();
    for id in schedules.iter().flat_map(|s| s.meals.iter().filter_map(|m| m.dish_id)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    let dishes: HashMap<Uuid, Dish> = catalog
        .find_by_ids(&ids)
        .await?
        .into_iter()
        .map(|d| (d.id, d))
        .collect();

    Ok(schedules.into_iter().map(|s| view_with(s, &dishes)).collect())
}

/// Dishes missing from `dishes` come out as `None`.
pub fn view_with(schedule: Schedule, dishes: &HashMap<Uuid, Dish>) -> ScheduleView {
    let meals = schedule
        .meals
        .into_iter()
        .map(|slot| MealSlotView {
            date: to_utc_midnight(slot.date),
            dish: slot.dish_id.and_then(|id| dishes.get(&id).cloned()),
            dish_id: slot.dish_id,
            notes: slot.notes,
        })
        .collect();

    ScheduleView {
        id: schedule.id,
        user_id: schedule.user_id,
        week_start_date: to_utc_midnight(schedule.week_start_date),
        week_end_date: to_utc_midnight(schedule.week_end_date),
        meals,
        is_active: schedule.is_active,
        created_at: schedule.created_at,
        updated_at: schedule.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use super::*;
    use crate::models::lunch_schedule::MealSlot;

    /// Counts lookups so tests can assert batching.
    struct CountingCatalog {
        dishes: Vec<Dish>,
        batch_calls: AtomicUsize,
    }

    #[async_trait]
    impl DishCatalog for CountingCatalog {
        async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Dish>> {
            Ok(self.dishes.iter().find(|d| d.id == id).cloned())
        }

        async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Dish>> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.dishes.iter().filter(|d| ids.contains(&d.id)).cloned().collect())
        }

        async fn list_available(&self, _limit: i64) -> StoreResult<Vec<Dish>> {
            Ok(self.dishes.clone())
        }

        async fn random_available(&self, _count: usize) -> StoreResult<Vec<Dish>> {
            Ok(self.dishes.clone())
        }
    }

    fn dish(name: &str) -> Dish {
        Dish {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            price: 35000.0,
            image: format!("/img/{name}.jpg"),
            rating: 4.0,
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn schedule(start: &str, meals: Vec<MealSlot>) -> Schedule {
        let start: NaiveDate = start.parse().unwrap();
        Schedule {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            week_start_date: start,
            week_end_date: start + chrono::Duration::days(6),
            meals,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn slot(date: &str, dish_id: Option<Uuid>) -> MealSlot {
        MealSlot { date: date.parse().unwrap(), dish_id, notes: String::new() }
    }

    #[tokio::test]
    async fn dishes_are_inlined_with_one_lookup() {
        let bun_cha = dish("bun-cha");
        let com_tam = dish("com-tam");
        let catalog = CountingCatalog {
            dishes: vec![bun_cha.clone(), com_tam.clone()],
            batch_calls: AtomicUsize::new(0),
        };
        let schedules = vec![
            schedule("2024-01-15", vec![slot("2024-01-15", Some(bun_cha.id)), slot("2024-01-16", None)]),
            schedule("2024-01-08", vec![slot("2024-01-08", Some(com_tam.id)), slot("2024-01-09", Some(bun_cha.id))]),
        ];

        let views = project_many(&catalog, schedules).await.unwrap();

        assert_eq!(catalog.batch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(views[0].meals[0].dish.as_ref(), Some(&bun_cha));
        assert!(views[0].meals[1].dish.is_none());
        assert_eq!(views[1].meals[0].dish.as_ref(), Some(&com_tam));
        assert_eq!(views[1].meals[1].dish.as_ref(), Some(&bun_cha));
    }

    #[test]
    fn deleted_dish_projects_to_null() {
        let gone = Uuid::new_v4();
        let view = view_with(schedule("2024-01-15", vec![slot("2024-01-15", Some(gone))]), &HashMap::new());

        assert_eq!(view.meals[0].dish_id, Some(gone));
        assert!(view.meals[0].dish.is_none());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["meals"][0]["dish"], serde_json::Value::Null);
        assert_eq!(json["weekStartDate"], "2024-01-15T00:00:00Z");
        assert_eq!(json["weekEndDate"], "2024-01-21T00:00:00Z");
    }
}
