//! Meal MCP Tools
//!
//! Logging foods against a pet's day and reading the day back.

use serde::Serialize;
use tracing::info;

use crate::db::{Database, DbError};
use crate::models::{DailyMeal, FoodItem, MealEntry, MealEntryCreate, MealEntryDetail, NutrientProfile, Pet};

use super::parse_date;

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub id: i64,
    pub daily_meal_id: i64,
    pub date: String,
    pub food_name: String,
    pub amount: f64,
    pub kcal: f64,
    pub nutrients: NutrientProfile,
}

/// A day of meals with totals
#[derive(Debug, Serialize)]
pub struct DailyMealDetail {
    pub id: i64,
    pub pet_id: i64,
    pub date: String,
    pub total_kcal: f64,
    pub totals: NutrientProfile,
    pub entries: Vec<MealEntryDetail>,
}

/// Response for delete_meal_entry
#[derive(Debug, Serialize)]
pub struct DeleteMealEntryResponse {
    pub success: bool,
    pub deleted_id: i64,
    /// The entry was the day's last one
    pub day_removed: bool,
    pub total_kcal: f64,
    pub totals: NutrientProfile,
}

/// Log `amount` grams of a food for a pet on a date
pub fn log_meal(
    db: &Database,
    pet_id: i64,
    date: &str,
    food_item_id: i64,
    amount: f64,
) -> Result<LogMealResponse, String> {
    let date = parse_date(date)?.to_string();
    if !amount.is_finite() || amount <= 0.0 {
        return Err("amount must be greater than 0 grams".to_string());
    }

    let food_item = db
        .with_conn(|conn| {
            if Pet::get_by_id(conn, pet_id)?.is_none() {
                return Err(DbError::NotFound(format!("pet {}", pet_id)));
            }
            FoodItem::get_by_id(conn, food_item_id)?
                .ok_or_else(|| DbError::NotFound(format!("food item {}", food_item_id)))
        })
        .map_err(|e| e.to_string())?;

    let data = MealEntryCreate {
        pet_id,
        date: date.clone(),
        food_item_id,
        amount,
    };
    let entry = db
        .with_conn_mut(|conn| MealEntry::create(conn, &data))
        .map_err(|e| format!("Failed to log meal: {}", e))?;

    info!(pet_id, %date, food_item_id, amount, "Logged meal");
    Ok(LogMealResponse {
        id: entry.id,
        daily_meal_id: entry.daily_meal_id,
        date,
        food_name: food_item.name,
        amount: entry.amount,
        kcal: entry.cached_kcal,
        nutrients: entry.cached_nutrients,
    })
}

/// A pet's day with all entries, or None if nothing was logged
pub fn get_daily_meal(db: &Database, pet_id: i64, date: &str) -> Result<Option<DailyMealDetail>, String> {
    let date = parse_date(date)?.to_string();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let meal = DailyMeal::get_by_pet_and_date(&conn, pet_id, &date)
        .map_err(|e| format!("Failed to get daily meal: {}", e))?;

    match meal {
        Some(meal) => {
            let entries = MealEntry::get_details_for_daily_meal(&conn, meal.id)
                .map_err(|e| format!("Failed to get meal entries: {}", e))?;
            Ok(Some(DailyMealDetail {
                id: meal.id,
                pet_id: meal.pet_id,
                date: meal.date,
                total_kcal: meal.cached_kcal,
                totals: meal.cached_nutrients,
                entries,
            }))
        }
        None => Ok(None),
    }
}

/// Recent days for a pet, newest first, without entries
pub fn list_daily_meals(db: &Database, pet_id: i64, limit: i64) -> Result<Vec<DailyMeal>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    DailyMeal::list_for_pet(&conn, pet_id, limit.clamp(1, 365))
        .map_err(|e| format!("Failed to list daily meals: {}", e))
}

/// Delete a meal entry; the day's totals are recalculated, and a day left
/// empty is removed
pub fn delete_meal_entry(db: &Database, id: i64) -> Result<DeleteMealEntryResponse, String> {
    let (entry, meal) = db
        .with_conn_mut(|conn| {
            let entry = MealEntry::get_by_id(conn, id)?
                .ok_or_else(|| DbError::NotFound(format!("meal entry {}", id)))?;
            MealEntry::delete(conn, id)?;
            let meal = DailyMeal::get_by_id(conn, entry.daily_meal_id)?;
            Ok((entry, meal))
        })
        .map_err(|e| format!("Failed to delete meal entry: {}", e))?;

    info!(meal_entry_id = id, daily_meal_id = entry.daily_meal_id, day_removed = meal.is_none(), "Deleted meal entry");
    Ok(DeleteMealEntryResponse {
        success: true,
        deleted_id: id,
        day_removed: meal.is_none(),
        total_kcal: meal.as_ref().map_or(0.0, |m| m.cached_kcal),
        totals: meal.map(|m| m.cached_nutrients).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{foods, pets};

    #[test]
    fn test_log_and_read_day() {
        let db = Database::open_in_memory().unwrap();
        let pet = pets::register_pet(&db, "Bori", 4, 10.0, "moderate", "neutered").unwrap();
        let food = foods::add_food_item(
            &db,
            "닭가슴살",
            100.0,
            165.0,
            NutrientProfile { protein: 31.0, ..Default::default() },
        )
        .unwrap();

        let logged = log_meal(&db, pet.pet.id, "2025-06-01", food.id, 200.0).unwrap();
        assert!((logged.kcal - 330.0).abs() < 1e-9);
        assert_eq!(logged.food_name, "닭가슴살");
        log_meal(&db, pet.pet.id, "2025-06-01", food.id, 100.0).unwrap();

        let day = get_daily_meal(&db, pet.pet.id, "2025-06-01").unwrap().unwrap();
        assert_eq!(day.entries.len(), 2);
        assert!((day.totals.protein - 93.0).abs() < 1e-9);
        assert!(get_daily_meal(&db, pet.pet.id, "2025-06-02").unwrap().is_none());

        let after = delete_meal_entry(&db, logged.id).unwrap();
        assert!((after.total_kcal - 165.0).abs() < 1e-9);
        assert!(!after.day_removed);
        assert_eq!(list_daily_meals(&db, pet.pet.id, 10).unwrap().len(), 1);

        let last = day.entries[1].id;
        let emptied = delete_meal_entry(&db, last).unwrap();
        assert!(emptied.day_removed);
        assert_eq!(emptied.total_kcal, 0.0);
        assert!(get_daily_meal(&db, pet.pet.id, "2025-06-01").unwrap().is_none());
        assert!(list_daily_meals(&db, pet.pet.id, 10).unwrap().is_empty());
    }

    #[test]
    fn test_log_meal_validation() {
        let db = Database::open_in_memory().unwrap();
        let pet = pets::register_pet(&db, "Bori", 4, 10.0, "moderate", "neutered").unwrap();

        assert!(log_meal(&db, pet.pet.id, "06/01/2025", 1, 10.0).is_err());
        assert!(log_meal(&db, pet.pet.id, "2025-06-01", 1, 10.0).is_err());
        assert!(log_meal(&db, 99, "2025-06-01", 1, 10.0).is_err());
        assert!(log_meal(&db, pet.pet.id, "2025-06-01", 1, -5.0).is_err());
        assert!(delete_meal_entry(&db, 1).is_err());
    }
}
