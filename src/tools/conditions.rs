//! Medical condition MCP Tools
//!
//! Allergy and disease catalog, and the conditions recorded per pet.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{ConditionKind, MedicalCondition, MedicalConditionCreate, Pet};

/// Response for list_pet_conditions
#[derive(Debug, Serialize)]
pub struct PetConditionsResponse {
    pub pet_id: i64,
    pub conditions: Vec<MedicalCondition>,
}

fn parse_kind(kind: Option<&str>) -> Result<Option<ConditionKind>, String> {
    kind.filter(|k| !k.trim().is_empty())
        .map(|k| k.parse::<ConditionKind>().map_err(|e| e.to_string()))
        .transpose()
}

/// Add an allergy or disease to the shared catalog
pub fn add_medical_condition(
    db: &Database,
    kind: &str,
    name: &str,
    description: Option<String>,
) -> Result<MedicalCondition, String> {
    let data = MedicalConditionCreate {
        kind: kind.parse().map_err(|e: crate::db::DbError| e.to_string())?,
        name: name.to_string(),
        description,
    };

    let condition = db
        .with_conn(|conn| MedicalCondition::create(conn, &data))
        .map_err(|e| format!("Failed to add medical condition: {}", e))?;

    info!(condition_id = condition.id, kind = %condition.kind, name = %condition.name, "Added medical condition");
    Ok(condition)
}

/// Catalog conditions, optionally filtered to one kind
pub fn list_medical_conditions(db: &Database, kind: Option<&str>) -> Result<Vec<MedicalCondition>, String> {
    let kind = parse_kind(kind)?;
    db.with_conn(|conn| MedicalCondition::list(conn, kind))
        .map_err(|e| format!("Failed to list medical conditions: {}", e))
}

/// Record a catalog condition for a pet
pub fn add_pet_condition(db: &Database, pet_id: i64, condition_id: i64) -> Result<MedicalCondition, String> {
    let condition = db
        .with_conn(|conn| MedicalCondition::attach_to_pet(conn, pet_id, condition_id))
        .map_err(|e| {
            warn!(pet_id, condition_id, "Rejected pet condition: {}", e);
            format!("Failed to add pet condition: {}", e)
        })?;

    info!(pet_id, condition_id, kind = %condition.kind, "Recorded pet condition");
    Ok(condition)
}

/// A pet's allergies and/or diseases
pub fn list_pet_conditions(db: &Database, pet_id: i64, kind: Option<&str>) -> Result<PetConditionsResponse, String> {
    let kind = parse_kind(kind)?;
    let conditions = db
        .with_conn(|conn| {
            if Pet::get_by_id(conn, pet_id)?.is_none() {
                return Ok(None);
            }
            MedicalCondition::list_for_pet(conn, pet_id, kind).map(Some)
        })
        .map_err(|e| format!("Failed to list pet conditions: {}", e))?
        .ok_or_else(|| format!("Pet not found with id: {}", pet_id))?;

    Ok(PetConditionsResponse { pet_id, conditions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::pets;

    #[test]
    fn test_pet_allergies_and_diseases() {
        let db = Database::open_in_memory().unwrap();
        let pet = pets::register_pet(&db, "Haru", 9, 7.5, "low", "neutered").unwrap();

        let allergy = add_medical_condition(&db, "allergy", "소고기", Some("가려움".to_string())).unwrap();
        let disease = add_medical_condition(&db, "질병", "슬개골 탈구", None).unwrap();
        assert!(add_medical_condition(&db, "allergy", " 소고기 ", None).is_err());
        assert!(add_medical_condition(&db, "injury", "골절", None).is_err());

        add_pet_condition(&db, pet.pet.id, allergy.id).unwrap();
        add_pet_condition(&db, pet.pet.id, disease.id).unwrap();
        assert!(add_pet_condition(&db, pet.pet.id, allergy.id).is_err());
        assert!(add_pet_condition(&db, pet.pet.id, 999).is_err());

        let allergies = list_pet_conditions(&db, pet.pet.id, Some("allergy")).unwrap();
        assert_eq!(allergies.conditions.len(), 1);
        assert_eq!(allergies.conditions[0].description.as_deref(), Some("가려움"));

        let everything = list_pet_conditions(&db, pet.pet.id, None).unwrap();
        assert_eq!(everything.conditions.len(), 2);
        assert_eq!(list_medical_conditions(&db, Some("disease")).unwrap().len(), 1);

        assert!(list_pet_conditions(&db, 404, None).is_err());
    }
}
