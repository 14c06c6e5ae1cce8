//! Validation of submitted meal slots. Either every slot is accepted or the
//! whole submission is rejected before anything is written.

use std::collections::HashSet;

use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::lunch_schedule::{CandidateSlot, DishRef, MealSlot, MAX_NOTES_CHARS},
    services::week_key,
    store::DishCatalog,
};

/// Reads the raw `meals` field. It must be an array of objects; an empty array is allowed.
pub fn parse_candidates(meals: Option<&Value>) -> Result<Vec<CandidateSlot>, AppError> {
    let items = meals
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Validation("meals must be an array".into()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(AppError::Validation(format!("meals[{index}] must be an object")));
            }
            serde_json::from_value::<CandidateSlot>(item.clone())
                .map_err(|e| AppError::Validation(format!("meals[{index}] is invalid: {e}")))
        })
        .collect()
}

/// Collapses the accepted dish reference shapes into a single id.
pub fn resolve_dish_ref(dish: Option<DishRef>) -> Result<Option<Uuid>, AppError> {
    match dish {
        None => Ok(None),
        Some(DishRef::Id(id)) => Ok(Some(id)),
        Some(DishRef::Inline(inline)) => Ok(Some(inline.id)),
        Some(DishRef::Raw(s)) if s.trim().is_empty() => Ok(None),
        Some(DishRef::Raw(s)) => Err(AppError::Validation(format!("Invalid dish id: {s}"))),
    }
}

fn normalize_notes(notes: Option<String>) -> Result<String, AppError> {
    let notes = notes.map(|n| n.trim().to_string()).unwrap_or_default();
    if notes.chars().count() > MAX_NOTES_CHARS {
        return Err(AppError::Validation(format!(
            "Notes cannot exceed {MAX_NOTES_CHARS} characters"
        )));
    }
    Ok(notes)
}

fn normalize_slot(candidate: CandidateSlot) -> Result<MealSlot, AppError> {
    let date = match candidate.date.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => week_key::parse_date(s)?,
        _ => return Err(AppError::Validation("Each meal must have a date".into())),
    };
    Ok(MealSlot {
        date,
        dish_id: resolve_dish_ref(candidate.dish_id)?,
        notes: normalize_notes(candidate.notes)?,
    })
}

/// Normalizes every slot, then checks all referenced dishes with one catalog lookup.
/// Output order matches input order.
pub async fn validate(
    catalog: &dyn DishCatalog,
    candidates: Vec<CandidateSlot>,
) -> Result<Vec<MealSlot>, AppError> {
    let slots = candidates
        .into_iter()
        .map(normalize_slot)
        .collect::<Result<Vec<_>, _>>()?;

    let mut wanted: Vec<Uuid> = Vec::new();
    for id in slots.iter().filter_map(|s| s.dish_id) {
        if !wanted.contains(&id) {
            wanted.push(id);
        }
    }
    if wanted.is_empty() {
        return Ok(slots);
    }

    let found: HashSet<Uuid> = catalog
        .find_by_ids(&wanted)
        .await?
        .into_iter()
        .map(|dish| dish.id)
        .collect();
    if let Some(missing) = wanted.into_iter().find(|id| !found.contains(id)) {
        return Err(AppError::DishNotFound(missing));
    }

    Ok(slots)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use serde_json::json;

    use super::*;
    use crate::{models::dish::Dish, store::MemoryStore};

    fn dish(id: Uuid) -> Dish {
        Dish {
            id,
            name: "Phở bò".into(),
            description: String::new(),
            price: 45000.0,
            image: String::new(),
            rating: 4.5,
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    async fn catalog_with(ids: &[Uuid]) -> MemoryStore {
        let store = MemoryStore::new();
        for id in ids {
            store.insert_dish(dish(*id)).await;
        }
        store
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn meals_must_be_an_array() {
        for value in [json!({"date": "2024-01-15"}), json!("[]"), json!(null), json!(7)] {
            assert!(matches!(parse_candidates(Some(&value)), Err(AppError::Validation(_))));
        }
        assert!(matches!(parse_candidates(None), Err(AppError::Validation(_))));
        assert!(parse_candidates(Some(&json!([]))).unwrap().is_empty());
    }

    #[test]
    fn non_object_elements_are_rejected() {
        let err = parse_candidates(Some(&json!([{"date": "2024-01-15"}, 3]))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("meals[1]")));
    }

    #[test]
    fn dish_refs_accept_id_inline_object_and_blank() {
        let id = Uuid::new_v4();
        let candidates = parse_candidates(Some(&json!([
            {"date": "2024-01-15", "dishId": id.to_string()},
            {"date": "2024-01-16", "dishId": {"_id": id.to_string(), "name": "Phở bò"}},
            {"date": "2024-01-17", "dishId": {"id": id.to_string()}},
            {"date": "2024-01-18", "dishId": ""},
            {"date": "2024-01-19", "dishId": null},
            {"date": "2024-01-20"},
        ])))
        .unwrap();

        let resolved: Vec<_> = candidates
            .into_iter()
            .map(|c| resolve_dish_ref(c.dish_id).unwrap())
            .collect();
        assert_eq!(resolved, vec![Some(id), Some(id), Some(id), None, None, None]);
    }

    #[test]
    fn malformed_dish_id_is_a_validation_error() {
        assert!(matches!(
            resolve_dish_ref(Some(DishRef::Raw("64f1c2".into()))),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn valid_slots_are_normalized_in_order() {
        let d1 = Uuid::new_v4();
        let catalog = catalog_with(&[d1]).await;
        let candidates = parse_candidates(Some(&json!([
            {"date": "2024-01-15T17:00:00-05:00", "dishId": d1.to_string()},
            {"date": "2024-01-16", "dishId": null, "notes": "  skip  "},
        ])))
        .unwrap();

        let slots = validate(&catalog, candidates).await.unwrap();

        assert_eq!(
            slots,
            vec![
                MealSlot { date: day("2024-01-15"), dish_id: Some(d1), notes: String::new() },
                MealSlot { date: day("2024-01-16"), dish_id: None, notes: "skip".into() },
            ]
        );
    }

    #[tokio::test]
    async fn missing_or_bad_date_rejects() {
        let catalog = MemoryStore::new();
        let missing = parse_candidates(Some(&json!([{"notes": "no date"}]))).unwrap();
        assert!(matches!(validate(&catalog, missing).await, Err(AppError::Validation(_))));

        let bad = parse_candidates(Some(&json!([{"date": "someday"}]))).unwrap();
        assert!(matches!(validate(&catalog, bad).await, Err(AppError::InvalidDate(_))));
    }

    #[tokio::test]
    async fn unknown_dish_rejects_the_whole_batch() {
        let known = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        let catalog = catalog_with(&[known]).await;
        let candidates = parse_candidates(Some(&json!([
            {"date": "2024-01-15", "dishId": known.to_string()},
            {"date": "2024-01-16", "dishId": unknown.to_string()},
        ])))
        .unwrap();

        let err = validate(&catalog, candidates).await.unwrap_err();
        assert!(matches!(err, AppError::DishNotFound(id) if id == unknown));
    }

    #[tokio::test]
    async fn notes_over_limit_are_rejected_not_truncated() {
        let catalog = MemoryStore::new();
        let at_limit = "é".repeat(MAX_NOTES_CHARS);
        let ok = parse_candidates(Some(&json!([{"date": "2024-01-15", "notes": at_limit}]))).unwrap();
        assert_eq!(validate(&catalog, ok).await.unwrap()[0].notes.chars().count(), MAX_NOTES_CHARS);

        let over = "x".repeat(MAX_NOTES_CHARS + 1);
        let too_long = parse_candidates(Some(&json!([{"date": "2024-01-15", "notes": over}]))).unwrap();
        assert!(matches!(validate(&catalog, too_long).await, Err(AppError::Validation(_))));
    }
}
