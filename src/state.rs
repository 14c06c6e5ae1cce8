use std::sync::Arc;

use crate::config::Config;
use crate::store::{CategoryStore, DishCatalog, FavoriteStore, OrderStore, ScheduleStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub schedules: Arc<dyn ScheduleStore>,
    pub dishes: Arc<dyn DishCatalog>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub orders: Arc<dyn OrderStore>,
}
