use chrono::NaiveDate;
use rand::{seq::SliceRandom, Rng};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::lunch_schedule::{
        CandidateSlot, DishRef, Pagination, ScheduleListQuery, ScheduleListView, ScheduleView,
        UpsertScheduleRequest,
    },
    services::{meal_slots, projector, week_key},
    store::{DishCatalog, FavoriteStore, ScheduleStore},
};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Result of auto-generating a week from favorites.
#[derive(Debug)]
pub enum GenerateOutcome {
    Generated(ScheduleView),
    /// The user has no favorites to draw from.
    NoHistory,
}

pub struct LunchScheduleService;

impl LunchScheduleService {
    /// Create or replace the caller's schedule for the submitted week.
    pub async fn save(
        schedules: &dyn ScheduleStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
        req: &UpsertScheduleRequest,
    ) -> Result<ScheduleView, AppError> {
        let week_start = week_key::required_date(req.week_start_date.as_deref(), "weekStartDate")?;
        let candidates = meal_slots::parse_candidates(req.meals.as_ref())?;
        Self::store_week(schedules, catalog, user_id, week_start, candidates).await
    }

    async fn store_week(
        schedules: &dyn ScheduleStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
        week_start: NaiveDate,
        candidates: Vec<CandidateSlot>,
    ) -> Result<ScheduleView, AppError> {
        let meals = meal_slots::validate(catalog, candidates).await?;
        let meal_count = meals.len();

        let schedule = schedules
            .create_or_update(user_id, week_start, week_key::week_end(week_start), meals)
            .await
            .map_err(|e| {
                warn!(%user_id, %week_start, "schedule write failed: {e}");
                AppError::from(e)
            })?;
        info!(%user_id, %week_start, schedule_id = %schedule.id, meal_count, "lunch schedule saved");

        Ok(projector::project(catalog, schedule).await?)
    }

    /// The active schedule for the week containing `week_start_date`'s day, if one exists.
    pub async fn get_week(
        schedules: &dyn ScheduleStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
        week_start_date: Option<&str>,
    ) -> Result<Option<ScheduleView>, AppError> {
        let week_start = week_key::required_date(week_start_date, "weekStartDate")?;
        match schedules.find_active_by_week(user_id, week_start).await? {
            Some(schedule) => Ok(Some(projector::project(catalog, schedule).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(
        schedules: &dyn ScheduleStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
        query: &ScheduleListQuery,
    ) -> Result<ScheduleListView, AppError> {
        let (page, limit) = page_params(query);
        let offset = (page - 1).saturating_mul(limit);
        let (rows, total) = schedules.list_active(user_id, offset, limit).await?;
        Ok(ScheduleListView {
            schedules: projector::project_many(catalog, rows).await?,
            pagination: pagination(page, limit, total),
        })
    }

    /// Fill the week with random picks from the caller's favorites and save it
    /// through the same path as a manual submission.
    pub async fn generate(
        schedules: &dyn ScheduleStore,
        catalog: &dyn DishCatalog,
        favorites: &dyn FavoriteStore,
        user_id: Uuid,
        week_start_date: Option<&str>,
    ) -> Result<GenerateOutcome, AppError> {
        let week_start = week_key::required_date(week_start_date, "weekStartDate")?;
        let favorite_ids = favorites.list_dish_ids(user_id).await?;

        let candidates =
            match generate_candidates(week_start, &favorite_ids, &mut rand::thread_rng()) {
                Some(candidates) => candidates,
                None => {
                    info!(%user_id, %week_start, "no favorites to generate a schedule from");
                    return Ok(GenerateOutcome::NoHistory);
                }
            };

        let view = Self::store_week(schedules, catalog, user_id, week_start, candidates).await?;
        Ok(GenerateOutcome::Generated(view))
    }

    /// Soft delete. A schedule owned by someone else is reported exactly like a missing one.
    pub async fn delete(
        schedules: &dyn ScheduleStore,
        user_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<(), AppError> {
        if !schedules.soft_delete(schedule_id, user_id).await? {
            return Err(AppError::NotFound("Lunch schedule not found".into()));
        }
        info!(%user_id, %schedule_id, "lunch schedule deactivated");
        Ok(())
    }
}

/// Seven slots starting at `week_start`, each with a favorite picked uniformly
/// at random (with replacement). `None` when there are no favorites.
pub fn generate_candidates<R: Rng + ?Sized>(
    week_start: NaiveDate,
    favorites: &[Uuid],
    rng: &mut R,
) -> Option<Vec<CandidateSlot>> {
    if favorites.is_empty() {
        return None;
    }
    let slots = week_key::week_days(week_start)
        .map(|day| CandidateSlot {
            date: Some(day.format("%Y-%m-%d").to_string()),
            dish_id: favorites.choose(rng).copied().map(DishRef::Id),
            notes: Some(String::new()),
        })
        .collect();
    Some(slots)
}

/// Page and page size from query params; missing, non-numeric, or non-positive
/// values fall back to page 1 and 10 per page.
pub fn page_params(query: &ScheduleListQuery) -> (i64, i64) {
    fn positive(v: Option<&str>) -> Option<i64> {
        v.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n >= 1)
    }
    let page = positive(query.page.as_deref()).unwrap_or(1);
    let limit = positive(query.limit.as_deref())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);
    (page, limit)
}

pub fn pagination(page: i64, limit: i64, total: i64) -> Pagination {
    let total_pages = (total + limit - 1) / limit;
    Pagination {
        current_page: page,
        total_pages,
        total_items: total,
        items_per_page: limit,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rand::{rngs::StdRng, SeedableRng};
    use serde_json::json;

    use super::*;
    use crate::{models::dish::Dish, store::MemoryStore};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn store_with_dishes(n: usize) -> (MemoryStore, Vec<Uuid>) {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for i in 0..n {
            let dish = Dish {
                id: Uuid::new_v4(),
                name: format!("dish-{i}"),
                description: String::new(),
                price: 30000.0 + i as f64,
                image: String::new(),
                rating: 3.5,
                is_available: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            ids.push(dish.id);
            store.insert_dish(dish).await;
        }
        (store, ids)
    }

    fn request(week: &str, meals: serde_json::Value) -> UpsertScheduleRequest {
        UpsertScheduleRequest { week_start_date: Some(week.into()), meals: Some(meals) }
    }

    #[tokio::test]
    async fn resubmitting_a_week_replaces_the_meals() {
        let (store, dishes) = store_with_dishes(2).await;
        let user = Uuid::new_v4();

        let first = LunchScheduleService::save(
            &store,
            &store,
            user,
            &request(
                "2024-01-15",
                json!([
                    {"date": "2024-01-15", "dishId": dishes[0].to_string()},
                    {"date": "2024-01-16", "dishId": null, "notes": "skip"},
                ]),
            ),
        )
        .await
        .unwrap();
        assert_eq!(first.week_start_date.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert_eq!(first.week_end_date.to_rfc3339(), "2024-01-21T00:00:00+00:00");
        assert_eq!(first.meals.len(), 2);
        assert_eq!(first.meals[1].dish_id, None);
        assert_eq!(first.meals[1].notes, "skip");

        LunchScheduleService::save(
            &store,
            &store,
            user,
            &request("2024-01-15T18:00:00Z", json!([{"date": "2024-01-17", "dishId": dishes[1].to_string()}])),
        )
        .await
        .unwrap();

        let current = LunchScheduleService::get_week(&store, &store, user, Some("2024-01-15"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.id, first.id);
        assert_eq!(current.meals.len(), 1);
        assert_eq!(current.meals[0].dish.as_ref().map(|d| d.id), Some(dishes[1]));
        assert_eq!(store.schedules_for(user).await.len(), 1);
    }

    #[tokio::test]
    async fn failed_validation_persists_nothing() {
        let (store, dishes) = store_with_dishes(1).await;
        let user = Uuid::new_v4();

        let err = LunchScheduleService::save(
            &store,
            &store,
            user,
            &request(
                "2024-01-15",
                json!([
                    {"date": "2024-01-15", "dishId": dishes[0].to_string()},
                    {"date": "2024-01-16", "dishId": Uuid::new_v4().to_string()},
                ]),
            ),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::DishNotFound(_)));
        assert!(store.schedules_for(user).await.is_empty());
    }

    #[tokio::test]
    async fn missing_week_is_none() {
        let store = MemoryStore::new();
        let found = LunchScheduleService::get_week(&store, &store, Uuid::new_v4(), Some("2024-01-15"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn week_start_is_required() {
        let store = MemoryStore::new();
        let req = UpsertScheduleRequest { week_start_date: None, meals: Some(json!([])) };
        let err = LunchScheduleService::save(&store, &store, Uuid::new_v4(), &req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_by_non_owner_is_not_found() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let saved = LunchScheduleService::save(&store, &store, owner, &request("2024-01-15", json!([])))
            .await
            .unwrap();

        let err = LunchScheduleService::delete(&store, Uuid::new_v4(), saved.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = LunchScheduleService::delete(&store, owner, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        LunchScheduleService::delete(&store, owner, saved.id).await.unwrap();
        let found = LunchScheduleService::get_week(&store, &store, owner, Some("2024-01-15")).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn generate_without_favorites_reports_no_history() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let outcome = LunchScheduleService::generate(&store, &store, &store, user, Some("2024-01-15"))
            .await
            .unwrap();
        assert!(matches!(outcome, GenerateOutcome::NoHistory));
        assert!(store.schedules_for(user).await.is_empty());
    }

    #[tokio::test]
    async fn generate_fills_seven_days_from_favorites() {
        let (store, dishes) = store_with_dishes(3).await;
        let user = Uuid::new_v4();
        for id in &dishes[..2] {
            store.add(user, *id).await.unwrap();
        }

        let outcome = LunchScheduleService::generate(&store, &store, &store, user, Some("2024-01-15"))
            .await
            .unwrap();
        let GenerateOutcome::Generated(view) = outcome else {
            panic!("expected a generated schedule");
        };

        assert_eq!(view.meals.len(), 7);
        assert_eq!(view.meals[0].date.date_naive(), day("2024-01-15"));
        assert_eq!(view.meals[6].date.date_naive(), day("2024-01-21"));
        for meal in &view.meals {
            let id = meal.dish_id.unwrap();
            assert!(dishes[..2].contains(&id));
            assert!(meal.dish.is_some());
            assert!(meal.notes.is_empty());
        }
    }

    #[test]
    fn generated_candidates_draw_with_replacement() {
        let only = Uuid::new_v4();
        let mut rng = StdRng::seed_from_u64(7);
        let slots = generate_candidates(day("2024-01-15"), &[only], &mut rng).unwrap();
        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|s| matches!(s.dish_id, Some(DishRef::Id(id)) if id == only)));
        assert_eq!(slots[3].date.as_deref(), Some("2024-01-18"));

        assert!(generate_candidates(day("2024-01-15"), &[], &mut rng).is_none());
    }

    #[test]
    fn page_params_clamp_to_defaults() {
        let q = |page: Option<&str>, limit: Option<&str>| ScheduleListQuery {
            page: page.map(Into::into),
            limit: limit.map(Into::into),
        };
        assert_eq!(page_params(&q(None, None)), (1, 10));
        assert_eq!(page_params(&q(Some("0"), Some("-5"))), (1, 10));
        assert_eq!(page_params(&q(Some("abc"), Some("x"))), (1, 10));
        assert_eq!(page_params(&q(Some("3"), Some("25"))), (3, 25));
        assert_eq!(page_params(&q(Some("1"), Some("5000"))), (1, MAX_PAGE_SIZE));
        assert_eq!(page_params(&q(Some("9223372036854775807"), None)), (i64::MAX, 10));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        LunchScheduleService::save(&store, &store, user, &request("2024-01-15", json!([])))
            .await
            .unwrap();

        let query = ScheduleListQuery { page: Some(i64::MAX.to_string()), limit: Some("10".into()) };
        let view = LunchScheduleService::list(&store, &store, user, &query).await.unwrap();
        assert!(view.schedules.is_empty());
        assert_eq!(view.pagination.current_page, i64::MAX);
        assert_eq!(view.pagination.total_items, 1);
        assert_eq!(view.pagination.total_pages, 1);
        assert!(!view.pagination.has_next);
        assert!(view.pagination.has_prev);
    }

    #[test]
    fn pagination_metadata() {
        assert_eq!(
            pagination(2, 10, 25),
            Pagination {
                current_page: 2,
                total_pages: 3,
                total_items: 25,
                items_per_page: 10,
                has_next: true,
                has_prev: true,
            }
        );
        let empty = pagination(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
        assert!(!empty.has_prev);
    }
}
