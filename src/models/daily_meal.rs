//! Daily meal model
//!
//! One row per pet per day with kcal and nutrient totals cached from its entries.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::NutrientProfile;

/// A pet's meals for one day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMeal {
    pub id: i64,
    pub pet_id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub cached_kcal: f64,
    pub cached_nutrients: NutrientProfile,
    pub created_at: String,
    pub updated_at: String,
}

impl DailyMeal {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            pet_id: row.get("pet_id")?,
            date: row.get("date")?,
            cached_kcal: row.get("cached_kcal")?,
            cached_nutrients: NutrientProfile::from_row_columns(row, "cached_")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get a daily meal by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get the daily meal of a pet for a date
    pub fn get_by_pet_and_date(conn: &Connection, pet_id: i64, date: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_meals WHERE pet_id = ?1 AND date = ?2")?;

        let result = stmt.query_row(params![pet_id, date], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get or create the daily meal of a pet for a date
    pub fn get_or_create(conn: &Connection, pet_id: i64, date: &str) -> DbResult<Self> {
        if let Some(meal) = Self::get_by_pet_and_date(conn, pet_id, date)? {
            return Ok(meal);
        }

        conn.execute(
            "INSERT INTO daily_meals (pet_id, date) VALUES (?1, ?2)",
            params![pet_id, date],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("daily meal {}", id)))
    }

    /// Most recent days first
    pub fn list_for_pet(conn: &Connection, pet_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_meals WHERE pet_id = ?1 ORDER BY date DESC LIMIT ?2",
        )?;

        let meals = stmt
            .query_map(params![pet_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Number of meal entries logged on this day
    pub fn entry_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM meal_entries WHERE daily_meal_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Remove a day row; its entries cascade
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM daily_meals WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Overwrite the cached totals
    pub fn update_cached(
        conn: &Connection,
        id: i64,
        kcal: f64,
        nutrients: &NutrientProfile,
    ) -> DbResult<()> {
        conn.execute(
            r#"
            UPDATE daily_meals SET
                cached_kcal = ?1,
                cached_carbohydrate = ?2,
                cached_protein = ?3,
                cached_fat = ?4,
                cached_calcium = ?5,
                cached_phosphorus = ?6,
                cached_vitamin_a = ?7,
                cached_vitamin_d = ?8,
                cached_vitamin_e = ?9,
                updated_at = datetime('now')
            WHERE id = ?10
            "#,
            params![
                kcal,
                nutrients.carbohydrate,
                nutrients.protein,
                nutrients.fat,
                nutrients.calcium,
                nutrients.phosphorus,
                nutrients.vitamin_a,
                nutrients.vitamin_d,
                nutrients.vitamin_e,
                id,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Pet, PetCreate};
    use crate::nutrition::{ActivityLevel, NeuteringStatus};

    #[test]
    fn test_get_or_create_is_stable() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        let pet = Pet::create(
            &conn,
            &PetCreate {
                name: "Choco".to_string(),
                age: 2,
                weight: 5.0,
                activity: ActivityLevel::Low,
                neutering: NeuteringStatus::Intact,
            },
        )
        .unwrap();

        let first = DailyMeal::get_or_create(&conn, pet.id, "2025-03-01").unwrap();
        let second = DailyMeal::get_or_create(&conn, pet.id, "2025-03-01").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.cached_nutrients, NutrientProfile::zero());

        DailyMeal::update_cached(&conn, first.id, 120.0, &NutrientProfile { fat: 4.0, ..Default::default() })
            .unwrap();
        let reloaded = DailyMeal::get_by_pet_and_date(&conn, pet.id, "2025-03-01").unwrap().unwrap();
        assert_eq!(reloaded.cached_kcal, 120.0);
        assert_eq!(reloaded.cached_nutrients.fat, 4.0);
        assert!(DailyMeal::get_by_pet_and_date(&conn, pet.id, "2025-03-02").unwrap().is_none());
    }
}
