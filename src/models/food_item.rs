//! Food Item model
//!
//! A food with kcal and nutrient content per standard amount in grams.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::NutrientProfile;

/// A food item with nutritional information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: i64,
    pub name: String,
    /// Grams the kcal and nutrient values refer to
    pub standard_amount: f64,
    pub kcal: f64,
    pub nutrients: NutrientProfile,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub standard_amount: f64,
    pub kcal: f64,
    pub nutrients: NutrientProfile,
}

impl FoodItem {
    /// Create a FoodItem from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            standard_amount: row.get("standard_amount")?,
            kcal: row.get("kcal")?,
            nutrients: NutrientProfile::from_row_columns(row, "")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Multiplier turning per-standard-amount values into values for `grams`
    pub fn multiplier_for(&self, grams: f64) -> f64 {
        grams / self.standard_amount
    }

    /// Insert a new food item; names are unique
    pub fn create(conn: &Connection, data: &FoodItemCreate) -> DbResult<Self> {
        if data.standard_amount <= 0.0 || !data.standard_amount.is_finite() {
            return Err(DbError::Invalid("standard_amount must be positive".to_string()));
        }
        if data.kcal < 0.0 || data.nutrients.amounts().any(|(_, amount)| amount < 0.0) {
            return Err(DbError::Invalid("nutrient amounts cannot be negative".to_string()));
        }
        if Self::get_by_name(conn, &data.name)?.is_some() {
            return Err(DbError::Conflict(format!("food item '{}' already exists", data.name)));
        }

        let n = &data.nutrients;
        conn.execute(
            r#"
            INSERT INTO food_items (
                name, standard_amount, kcal,
                carbohydrate, protein, fat, calcium, phosphorus,
                vitamin_a, vitamin_d, vitamin_e
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                data.name,
                data.standard_amount,
                data.kcal,
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

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("food item {}", id)))
    }

    /// Get a food item by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a food item by exact name
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_items WHERE name = ?1")?;

        let result = stmt.query_row([name], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a food item. Foods already logged in meals are kept so past
    /// days stay explainable.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let logged: i64 = conn.query_row(
            "SELECT COUNT(*) FROM meal_entries WHERE food_item_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        if logged > 0 {
            return Err(DbError::Conflict(format!(
                "food item {} is used by {} meal entries",
                id, logged
            )));
        }

        let rows = conn.execute("DELETE FROM food_items WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Search food items whose name contains `keyword`
    pub fn search(conn: &Connection, keyword: &str, limit: i64) -> DbResult<Vec<Self>> {
        let search_pattern = format!("%{}%", keyword);
        let mut stmt = conn.prepare(
            r#"
            SELECT * FROM food_items
            WHERE name LIKE ?1
            ORDER BY name ASC
            LIMIT ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![search_pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn chicken() -> FoodItemCreate {
        FoodItemCreate {
            name: "닭가슴살".to_string(),
            standard_amount: 100.0,
            kcal: 165.0,
            nutrients: NutrientProfile { protein: 31.0, fat: 3.6, phosphorus: 0.22, ..Default::default() },
        }
    }

    #[test]
    fn test_create_and_search() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let item = FoodItem::create(&conn, &chicken()).unwrap();
        assert_eq!(item.nutrients.protein, 31.0);
        assert_eq!(item.multiplier_for(50.0), 0.5);

        let found = FoodItem::search(&conn, "가슴", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert!(FoodItem::search(&conn, "연어", 10).unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        FoodItem::create(&conn, &chicken()).unwrap();
        assert!(matches!(FoodItem::create(&conn, &chicken()), Err(DbError::Conflict(_))));
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let item = FoodItem::create(&conn, &chicken()).unwrap();
        assert!(FoodItem::delete(&conn, item.id).unwrap());
        assert!(FoodItem::get_by_name(&conn, "닭가슴살").unwrap().is_none());
        assert!(!FoodItem::delete(&conn, item.id).unwrap());
    }
}
