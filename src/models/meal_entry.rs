//! Meal Entry model
//!
//! A food eaten by a pet on a day, with an amount in grams.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{DailyMeal, FoodItem, NutrientProfile};

/// A meal entry representing consumed food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntry {
    pub id: i64,
    pub daily_meal_id: i64,
    pub food_item_id: i64,
    pub amount: f64, // grams
    pub cached_kcal: f64,
    pub cached_nutrients: NutrientProfile,
    pub created_at: String,
}

/// Meal entry with the food's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntryDetail {
    pub id: i64,
    pub food_item_id: i64,
    pub food_name: String,
    pub amount: f64,
    pub kcal: f64,
    pub nutrients: NutrientProfile,
}

/// Data for logging a food
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealEntryCreate {
    pub pet_id: i64,
    pub date: String,
    pub food_item_id: i64,
    pub amount: f64,
}

impl MealEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            daily_meal_id: row.get("daily_meal_id")?,
            food_item_id: row.get("food_item_id")?,
            amount: row.get("amount")?,
            cached_kcal: row.get("cached_kcal")?,
            cached_nutrients: NutrientProfile::from_row_columns(row, "cached_")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Log a food for a pet on a date, creating the daily meal if needed.
    ///
    /// The day row, the entry and the refreshed totals are written in one transaction.
    pub fn create(conn: &mut Connection, data: &MealEntryCreate) -> DbResult<Self> {
        if !data.amount.is_finite() || data.amount <= 0.0 {
            return Err(DbError::Invalid(format!("amount must be positive, got {}", data.amount)));
        }

        let tx = conn.transaction()?;

        let food_item = FoodItem::get_by_id(&tx, data.food_item_id)?
            .ok_or_else(|| DbError::NotFound(format!("food item {}", data.food_item_id)))?;
        let daily_meal = DailyMeal::get_or_create(&tx, data.pet_id, &data.date)?;

        let multiplier = food_item.multiplier_for(data.amount);
        let kcal = food_item.kcal * multiplier;
        let n = food_item.nutrients.scale(multiplier);

        tx.execute(
            r#"
            INSERT INTO meal_entries (
                daily_meal_id, food_item_id, amount, cached_kcal,
                cached_carbohydrate, cached_protein, cached_fat, cached_calcium,
                cached_phosphorus, cached_vitamin_a, cached_vitamin_d, cached_vitamin_e
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                daily_meal.id,
                data.food_item_id,
                data.amount,
                kcal,
                n.carbohydrate,
                n.protein,
                n.fat,
                n.calcium,
                n.phosphorus,
                n.vitamin_a,
                n.vitamin_d,
                n.vitamin_e,
            ],
        )?;

        let id = tx.last_insert_rowid();
        let entry = Self::get_by_id(&tx, id)?
            .ok_or_else(|| DbError::NotFound(format!("meal entry {}", id)))?;

        recalculate_daily_meal_nutrition(&tx, daily_meal.id)?;
        tx.commit()?;

        Ok(entry)
    }

    /// Get a meal entry by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_entries WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All entries of a daily meal in logging order
    pub fn get_for_daily_meal(conn: &Connection, daily_meal_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_entries WHERE daily_meal_id = ?1 ORDER BY id",
        )?;

        let entries = stmt
            .query_map([daily_meal_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Entries of a daily meal joined with food names
    pub fn get_details_for_daily_meal(
        conn: &Connection,
        daily_meal_id: i64,
    ) -> DbResult<Vec<MealEntryDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT me.*, f.name AS food_name
            FROM meal_entries me
            JOIN food_items f ON f.id = me.food_item_id
            WHERE me.daily_meal_id = ?1
            ORDER BY me.id
            "#,
        )?;

        let details = stmt
            .query_map([daily_meal_id], |row| {
                let entry = Self::from_row(row)?;
                Ok(MealEntryDetail {
                    id: entry.id,
                    food_item_id: entry.food_item_id,
                    food_name: row.get("food_name")?,
                    amount: entry.amount,
                    kcal: entry.cached_kcal,
                    nutrients: entry.cached_nutrients,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// Delete a meal entry and refresh its day's totals.
    ///
    /// A day left without entries is removed, so it reads as "nothing logged".
    pub fn delete(conn: &mut Connection, id: i64) -> DbResult<bool> {
        let tx = conn.transaction()?;

        let entry = match Self::get_by_id(&tx, id)? {
            Some(entry) => entry,
            None => return Ok(false),
        };

        tx.execute("DELETE FROM meal_entries WHERE id = ?1", [id])?;
        if DailyMeal::entry_count(&tx, entry.daily_meal_id)? == 0 {
            DailyMeal::delete(&tx, entry.daily_meal_id)?;
        } else {
            recalculate_daily_meal_nutrition(&tx, entry.daily_meal_id)?;
        }
        tx.commit()?;

        Ok(true)
    }
}

/// Sum the cached entry values of a daily meal and store them as its totals
pub fn recalculate_daily_meal_nutrition(
    conn: &Connection,
    daily_meal_id: i64,
) -> DbResult<(f64, NutrientProfile)> {
    let entries = MealEntry::get_for_daily_meal(conn, daily_meal_id)?;

    let kcal: f64 = entries.iter().map(|e| e.cached_kcal).sum();
    let total: NutrientProfile = entries.iter().map(|e| e.cached_nutrients).sum();

    DailyMeal::update_cached(conn, daily_meal_id, kcal, &total)?;

    Ok((kcal, total))
}
