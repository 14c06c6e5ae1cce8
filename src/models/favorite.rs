use serde::Deserialize;
use uuid::Uuid;

/// Body for POST /favorites.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub dish_id: Uuid,
}
