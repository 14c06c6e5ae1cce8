use crate::{error::AppError, models::category::Category, store::CategoryStore};

pub struct CategoryService;

impl CategoryService {
    pub async fn list(categories: &dyn CategoryStore) -> Result<Vec<Category>, AppError> {
        Ok(categories.list_by_name().await?)
    }
}
