//! Pet model
//!
//! Stores the physical profile that drives requirement targets.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::{ActivityLevel, NeuteringStatus, NutritionResult, PetPhysicalProfile};

/// A registered pet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub weight: f64, // kilograms
    pub activity: ActivityLevel,
    pub neutering: NeuteringStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for registering a pet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetCreate {
    pub name: String,
    pub age: i64,
    pub weight: f64,
    pub activity: ActivityLevel,
    pub neutering: NeuteringStatus,
}

/// Data for updating a pet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub activity: Option<ActivityLevel>,
    pub neutering: Option<NeuteringStatus>,
}

fn invalid_column(index: usize, err: crate::nutrition::NutritionError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}

fn check_weight(weight: f64) -> DbResult<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(DbError::Invalid(format!("weight must be positive, got {}", weight)));
    }
    Ok(())
}

impl Pet {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let activity: String = row.get("activity")?;
        let neutering: String = row.get("neutering")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            age: row.get("age")?,
            weight: row.get("weight")?,
            activity: activity.parse().map_err(|e| invalid_column(4, e))?,
            neutering: neutering.parse().map_err(|e| invalid_column(5, e))?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The inputs the requirement calculator needs
    pub fn physical_profile(&self) -> NutritionResult<PetPhysicalProfile> {
        PetPhysicalProfile::new(self.weight, self.activity, self.neutering)
    }

    /// Register a new pet
    pub fn create(conn: &Connection, data: &PetCreate) -> DbResult<Self> {
        check_weight(data.weight)?;
        if data.age < 0 {
            return Err(DbError::Invalid("age cannot be negative".to_string()));
        }

        conn.execute(
            r#"
            INSERT INTO pets (name, age, weight, activity, neutering)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.name,
                data.age,
                data.weight,
                data.activity.as_str(),
                data.neutering.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("pet {}", id)))
    }

    /// Get a pet by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM pets WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(pet) => Ok(Some(pet)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all pets ordered by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM pets ORDER BY name, id")?;
        let pets = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pets)
    }

    /// Update a pet; returns None if it does not exist
    pub fn update(conn: &Connection, id: i64, data: &PetUpdate) -> DbResult<Option<Self>> {
        let existing = match Self::get_by_id(conn, id)? {
            Some(pet) => pet,
            None => return Ok(None),
        };

        let weight = data.weight.unwrap_or(existing.weight);
        check_weight(weight)?;
        let age = data.age.unwrap_or(existing.age);
        if age < 0 {
            return Err(DbError::Invalid("age cannot be negative".to_string()));
        }

        conn.execute(
            r#"
            UPDATE pets SET
                name = ?1,
                age = ?2,
                weight = ?3,
                activity = ?4,
                neutering = ?5,
                updated_at = datetime('now')
            WHERE id = ?6
            "#,
            params![
                data.name.as_deref().unwrap_or(&existing.name),
                age,
                weight,
                data.activity.unwrap_or(existing.activity).as_str(),
                data.neutering.unwrap_or(existing.neutering).as_str(),
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete a pet and its meal history
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM pets WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    fn sample() -> PetCreate {
        PetCreate {
            name: "Bori".to_string(),
            age: 4,
            weight: 10.0,
            activity: ActivityLevel::Moderate,
            neutering: NeuteringStatus::Neutered,
        }
    }

    #[test]
    fn test_create_and_get() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let pet = Pet::create(&conn, &sample()).unwrap();
        let loaded = Pet::get_by_id(&conn, pet.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Bori");
        assert_eq!(loaded.activity, ActivityLevel::Moderate);
        assert_eq!(loaded.neutering, NeuteringStatus::Neutered);

        let profile = loaded.physical_profile().unwrap();
        assert_eq!(profile.weight, 10.0);
    }

    #[test]
    fn test_update_partial() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        let pet = Pet::create(&conn, &sample()).unwrap();

        let updated = Pet::update(
            &conn,
            pet.id,
            &PetUpdate {
                weight: Some(12.5),
                activity: Some(ActivityLevel::High),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.name, "Bori");
        assert_eq!(updated.weight, 12.5);
        assert_eq!(updated.activity, ActivityLevel::High);
        assert!(Pet::update(&conn, 999, &PetUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_rejects_non_positive_weight() {
        let db = Database::open_in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        let mut data = sample();
        data.weight = 0.0;
        assert!(matches!(Pet::create(&conn, &data), Err(DbError::Invalid(_))));
    }
}
