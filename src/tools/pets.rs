//! Pet MCP Tools
//!
//! Registering pets and maintaining their physical profile.

use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::models::{Pet, PetCreate, PetUpdate};
use crate::nutrition::{self, ActivityLevel, NeuteringStatus};

/// Pet with its derived energy target
#[derive(Debug, Serialize)]
pub struct PetDetail {
    #[serde(flatten)]
    pub pet: Pet,
    pub resting_kcal: f64,
    pub proper_kcal: f64,
}

impl PetDetail {
    fn from_pet(pet: Pet) -> Result<Self, String> {
        let profile = pet.physical_profile().map_err(|e| e.to_string())?;
        let proper_kcal = nutrition::proper_kcal(&profile).map_err(|e| e.to_string())?;
        Ok(Self {
            resting_kcal: nutrition::resting_energy_requirement(profile.weight),
            proper_kcal,
            pet,
        })
    }
}

/// Response for delete_pet
#[derive(Debug, Serialize)]
pub struct DeletePetResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn parse_activity(value: &str) -> Result<ActivityLevel, String> {
    value.parse().map_err(|e: nutrition::NutritionError| e.to_string())
}

fn parse_neutering(value: &str) -> Result<NeuteringStatus, String> {
    value.parse().map_err(|e: nutrition::NutritionError| e.to_string())
}

/// Register a new pet
pub fn register_pet(
    db: &Database,
    name: &str,
    age: i64,
    weight: f64,
    activity: &str,
    neutering: &str,
) -> Result<PetDetail, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Pet name cannot be empty".to_string());
    }

    let data = PetCreate {
        name: name.to_string(),
        age,
        weight,
        activity: parse_activity(activity)?,
        neutering: parse_neutering(neutering)?,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let pet = Pet::create(&conn, &data).map_err(|e| {
        warn!(name, weight, "Rejected pet registration: {}", e);
        format!("Failed to register pet: {}", e)
    })?;

    info!(pet_id = pet.id, name = %pet.name, "Registered pet");
    PetDetail::from_pet(pet)
}

/// Get a pet by ID
pub fn get_pet(db: &Database, id: i64) -> Result<Option<PetDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let pet = Pet::get_by_id(&conn, id).map_err(|e| format!("Failed to get pet: {}", e))?;
    pet.map(PetDetail::from_pet).transpose()
}

/// List all pets
pub fn list_pets(db: &Database) -> Result<Vec<PetDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let pets = Pet::list(&conn).map_err(|e| format!("Failed to list pets: {}", e))?;
    pets.into_iter().map(PetDetail::from_pet).collect()
}

/// Update any subset of a pet's fields
pub fn update_pet(
    db: &Database,
    id: i64,
    name: Option<String>,
    age: Option<i64>,
    weight: Option<f64>,
    activity: Option<&str>,
    neutering: Option<&str>,
) -> Result<PetDetail, String> {
    let data = PetUpdate {
        name,
        age,
        weight,
        activity: activity.map(parse_activity).transpose()?,
        neutering: neutering.map(parse_neutering).transpose()?,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let updated = Pet::update(&conn, id, &data).map_err(|e| format!("Failed to update pet: {}", e))?;

    match updated {
        Some(pet) => {
            info!(pet_id = id, "Updated pet");
            PetDetail::from_pet(pet)
        }
        None => Err(format!("Pet not found with id: {}", id)),
    }
}

/// Delete a pet and its meal history
pub fn delete_pet(db: &Database, id: i64) -> Result<DeletePetResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let deleted = Pet::delete(&conn, id).map_err(|e| format!("Failed to delete pet: {}", e))?;
    if !deleted {
        return Err(format!("Pet not found with id: {}", id));
    }

    info!(pet_id = id, "Deleted pet");
    Ok(DeletePetResponse { success: true, deleted_id: id })
}
