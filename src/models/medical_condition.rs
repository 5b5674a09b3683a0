//! Medical condition model
//!
//! A shared catalog of allergies and diseases, and the conditions recorded per pet.

use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::Pet;

/// Allergy or disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Allergy,
    Disease,
}

impl ConditionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionKind::Allergy => "allergy",
            ConditionKind::Disease => "disease",
        }
    }
}

impl FromStr for ConditionKind {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allergy" | "알러지" | "알레르기" => Ok(ConditionKind::Allergy),
            "disease" | "질병" => Ok(ConditionKind::Disease),
            other => Err(DbError::Invalid(format!(
                "condition kind must be allergy or disease, got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An allergy or disease in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalCondition {
    pub id: i64,
    pub kind: ConditionKind,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// Data for adding a catalog condition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalConditionCreate {
    pub kind: ConditionKind,
    pub name: String,
    pub description: Option<String>,
}

impl MedicalCondition {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get("kind")?;
        Ok(Self {
            id: row.get("id")?,
            kind: kind.parse().map_err(|e: DbError| {
                rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
            })?,
            name: row.get("name")?,
            description: row.get("description")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Add a condition; (kind, name) is unique
    pub fn create(conn: &Connection, data: &MedicalConditionCreate) -> DbResult<Self> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(DbError::Invalid("condition name cannot be empty".to_string()));
        }

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM medical_conditions WHERE kind = ?1 AND name = ?2)",
            params![data.kind.as_str(), name],
            |row| row.get(0),
        )?;
        if exists {
            return Err(DbError::Conflict(format!("{} '{}' already exists", data.kind, name)));
        }

        conn.execute(
            "INSERT INTO medical_conditions (kind, name, description) VALUES (?1, ?2, ?3)",
            params![data.kind.as_str(), name, data.description],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("medical condition {}", id)))
    }

    /// Get a condition by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM medical_conditions WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(condition) => Ok(Some(condition)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Catalog conditions, optionally of one kind, by name
    pub fn list(conn: &Connection, kind: Option<ConditionKind>) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM medical_conditions WHERE ?1 IS NULL OR kind = ?1 ORDER BY kind, name",
        )?;

        let conditions = stmt
            .query_map([kind.map(|k| k.as_str())], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(conditions)
    }

    /// Record that a pet has this condition; recording it twice is a conflict
    pub fn attach_to_pet(conn: &Connection, pet_id: i64, condition_id: i64) -> DbResult<Self> {
        if Pet::get_by_id(conn, pet_id)?.is_none() {
            return Err(DbError::NotFound(format!("pet {}", pet_id)));
        }
        let condition = Self::get_by_id(conn, condition_id)?
            .ok_or_else(|| DbError::NotFound(format!("medical condition {}", condition_id)))?;

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO pet_conditions (pet_id, condition_id) VALUES (?1, ?2)",
            params![pet_id, condition_id],
        )?;
        if inserted == 0 {
            return Err(DbError::Conflict(format!(
                "pet {} already has {} '{}'",
                pet_id, condition.kind, condition.name
            )));
        }

        Ok(condition)
    }

    /// A pet's conditions, optionally of one kind, in the order they were recorded
    pub fn list_for_pet(
        conn: &Connection,
        pet_id: i64,
        kind: Option<ConditionKind>,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT mc.*
            FROM pet_conditions pc
            JOIN medical_conditions mc ON mc.id = pc.condition_id
            WHERE pc.pet_id = ?1 AND (?2 IS NULL OR mc.kind = ?2)
            ORDER BY pc.rowid
            "#,
        )?;

        let conditions = stmt
            .query_map(params![pet_id, kind.map(|k| k.as_str())], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(conditions)
    }
}
