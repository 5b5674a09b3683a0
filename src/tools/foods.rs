//! Food MCP Tools
//!
//! Tools for the raw food catalog.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{FoodItem, FoodItemCreate, NutrientProfile};

/// Response for add_food_item
#[derive(Debug, Serialize)]
pub struct AddFoodItemResponse {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Summary of a food item for search results
#[derive(Debug, Serialize)]
pub struct FoodItemSummary {
    pub id: i64,
    pub name: String,
    pub standard_amount: f64,
    pub kcal: f64,
}

impl From<&FoodItem> for FoodItemSummary {
    fn from(item: &FoodItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            standard_amount: item.standard_amount,
            kcal: item.kcal,
        }
    }
}

/// Response for search_food_items
#[derive(Debug, Serialize)]
pub struct SearchFoodItemsResponse {
    pub items: Vec<FoodItemSummary>,
    pub total: usize,
}

/// Response for delete_food_item
#[derive(Debug, Serialize)]
pub struct DeleteFoodItemResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Add a new food item
pub fn add_food_item(
    db: &Database,
    name: &str,
    standard_amount: f64,
    kcal: f64,
    nutrients: NutrientProfile,
) -> Result<AddFoodItemResponse, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Food item name cannot be empty".to_string());
    }

    let data = FoodItemCreate {
        name: name.to_string(),
        standard_amount,
        kcal,
        nutrients,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let item = FoodItem::create(&conn, &data)
        .map_err(|e| format!("Failed to create food item: {}", e))?;

    info!(food_item_id = item.id, name = %item.name, "Added food item");
    Ok(AddFoodItemResponse {
        id: item.id,
        name: item.name,
        created_at: item.created_at,
    })
}

/// Get a food item by ID
pub fn get_food_item(db: &Database, id: i64) -> Result<Option<FoodItem>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    FoodItem::get_by_id(&conn, id).map_err(|e| format!("Failed to get food item: {}", e))
}

/// Get a food item by exact name
pub fn get_food_item_by_name(db: &Database, name: &str) -> Result<Option<FoodItem>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    FoodItem::get_by_name(&conn, name.trim()).map_err(|e| format!("Failed to get food item: {}", e))
}

/// Delete a food item that no meal entry refers to
pub fn delete_food_item(db: &Database, id: i64) -> Result<DeleteFoodItemResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = FoodItem::delete(&conn, id).map_err(|e| {
        warn!(food_item_id = id, "Rejected food deletion: {}", e);
        format!("Failed to delete food item: {}", e)
    })?;
    if !deleted {
        return Err(format!("Food item not found with id: {}", id));
    }

    info!(food_item_id = id, "Deleted food item");
    Ok(DeleteFoodItemResponse { success: true, deleted_id: id })
}

/// Search food items by name
pub fn search_food_items(db: &Database, query: &str, limit: i64) -> Result<SearchFoodItemsResponse, String> {
    let limit = limit.clamp(1, 100);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let items = FoodItem::search(&conn, query.trim(), limit)
        .map_err(|e| format!("Search failed: {}", e))?;

    let summaries: Vec<FoodItemSummary> = items.iter().map(FoodItemSummary::from).collect();
    let total = summaries.len();

    Ok(SearchFoodItemsResponse { items: summaries, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{meals, pets};

    #[test]
    fn test_add_get_search() {
        let db = Database::open_in_memory().unwrap();
        let nutrients = NutrientProfile { carbohydrate: 28.0, protein: 2.7, ..Default::default() };

        let added = add_food_item(&db, "현미밥", 100.0, 130.0, nutrients).unwrap();
        let item = get_food_item(&db, added.id).unwrap().unwrap();
        assert_eq!(item.nutrients.carbohydrate, 28.0);

        let found = search_food_items(&db, "현미", 0).unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].kcal, 130.0);

        assert!(add_food_item(&db, "현미밥", 100.0, 130.0, nutrients).is_err());
        assert!(add_food_item(&db, "  ", 100.0, 130.0, nutrients).is_err());
    }

    #[test]
    fn test_lookup_by_name_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let nutrients = NutrientProfile { protein: 20.0, ..Default::default() };
        let kept = add_food_item(&db, "오리고기", 100.0, 200.0, nutrients).unwrap();
        let unused = add_food_item(&db, "양고기", 100.0, 250.0, nutrients).unwrap();

        let found = get_food_item_by_name(&db, " 양고기 ").unwrap().unwrap();
        assert_eq!(found.id, unused.id);
        assert!(get_food_item_by_name(&db, "양").unwrap().is_none());

        let pet = pets::register_pet(&db, "Bori", 4, 10.0, "moderate", "neutered").unwrap();
        meals::log_meal(&db, pet.pet.id, "2025-04-01", kept.id, 50.0).unwrap();

        assert!(delete_food_item(&db, unused.id).unwrap().success);
        assert!(delete_food_item(&db, unused.id).is_err());
        let err = delete_food_item(&db, kept.id).unwrap_err();
        assert!(err.contains("meal entries"));
        assert!(get_food_item(&db, kept.id).unwrap().is_some());
    }
}
