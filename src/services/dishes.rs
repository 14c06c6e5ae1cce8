use uuid::Uuid;

use crate::{
    error::AppError,
    models::dish::{Dish, DishListQuery, SUGGESTION_COUNT},
    store::DishCatalog,
};

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 200;

pub struct DishService;

impl DishService {
    pub async fn get(catalog: &dyn DishCatalog, id: Uuid) -> Result<Dish, AppError> {
        catalog
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Dish not found: {id}")))
    }

    /// Available dishes, alphabetical.
    pub async fn list_available(
        catalog: &dyn DishCatalog,
        query: &DishListQuery,
    ) -> Result<Vec<Dish>, AppError> {
        let limit = query
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        Ok(catalog.list_available(limit).await?)
    }

    /// A few random available dishes for the "what should I eat" prompt.
    pub async fn suggestions(catalog: &dyn DishCatalog) -> Result<Vec<Dish>, AppError> {
        let dishes = catalog.random_available(SUGGESTION_COUNT).await?;
        if dishes.is_empty() {
            return Err(AppError::NotFound("No dishes available".into()));
        }
        Ok(dishes)
    }
}
