use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::dish::Dish,
    store::{DishCatalog, FavoriteStore, StoreError},
};

pub struct FavoriteService;

impl FavoriteService {
    /// The caller's favorite dishes, most recently added first.
    pub async fn list(
        favorites: &dyn FavoriteStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
    ) -> Result<Vec<Dish>, AppError> {
        let ids = favorites.list_dish_ids(user_id).await?;
        let mut by_id: HashMap<Uuid, Dish> = catalog
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    pub async fn add(
        favorites: &dyn FavoriteStore,
        catalog: &dyn DishCatalog,
        user_id: Uuid,
        dish_id: Uuid,
    ) -> Result<Dish, AppError> {
        let dish = catalog
            .find_by_id(dish_id)
            .await?
            .ok_or(AppError::DishNotFound(dish_id))?;

        match favorites.add(user_id, dish_id).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                return Err(AppError::Conflict("Dish is already in favorites".into()))
            }
            Err(e) => return Err(e.into()),
        }
        info!(%user_id, %dish_id, "favorite added");
        Ok(dish)
    }

    pub async fn remove(
        favorites: &dyn FavoriteStore,
        user_id: Uuid,
        dish_id: Uuid,
    ) -> Result<(), AppError> {
        if !favorites.remove(user_id, dish_id).await? {
            return Err(AppError::NotFound("Dish is not in favorites".into()));
        }
        Ok(())
    }
}
