//! Nutrient analysis MCP Tools
//!
//! Targets, per-day verdicts, ratios and calorie reports for a pet.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::Database;
use crate::models::{DailyMeal, NutrientProfile};
use crate::nutrition::{self, DeficiencyVerdict, NutrientKind, PetPhysicalProfile};
use crate::providers::{DailyIntakeProvider, PetProfileProvider, ProviderError};

use super::parse_date;

/// Catalog entry for list_nutrients
#[derive(Debug, Serialize)]
pub struct NutrientCatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

/// A nutrient identified by kind and display name
#[derive(Debug, Serialize)]
pub struct NutrientRef {
    pub nutrient: NutrientKind,
    pub name: &'static str,
}

impl From<NutrientKind> for NutrientRef {
    fn from(kind: NutrientKind) -> Self {
        Self { nutrient: kind, name: kind.name() }
    }
}

/// Daily target for one nutrient
#[derive(Debug, Serialize)]
pub struct NutrientTarget {
    pub nutrient: NutrientKind,
    pub name: &'static str,
    pub unit: &'static str,
    pub minimum: f64,
    pub maximum: f64,
}

/// Response for nutrient_targets
#[derive(Debug, Serialize)]
pub struct NutrientTargetsResponse {
    pub pet_id: i64,
    pub profile: PetPhysicalProfile,
    pub targets: Vec<NutrientTarget>,
}

/// Response for nutrient_report
#[derive(Debug, Serialize)]
pub struct NutrientReportResponse {
    pub pet_id: i64,
    pub date: NaiveDate,
    pub verdicts: Vec<DeficiencyVerdict>,
}

/// One row of the ratio report
#[derive(Debug, Serialize)]
pub struct NutrientRatio {
    pub nutrient: NutrientKind,
    pub name: &'static str,
    pub ratio: f64,
}

/// Response for nutrient_ratios
#[derive(Debug, Serialize)]
pub struct NutrientRatiosResponse {
    pub pet_id: i64,
    pub date: NaiveDate,
    pub ratios: Vec<NutrientRatio>,
}

/// Response for deficient_nutrients and sufficient_nutrients
#[derive(Debug, Serialize)]
pub struct NutrientSetResponse {
    pub pet_id: i64,
    pub date: NaiveDate,
    pub nutrients: Vec<NutrientRef>,
}

/// Response for nutrient_extremes
#[derive(Debug, Serialize)]
pub struct NutrientExtremesResponse {
    pub pet_id: i64,
    pub date: NaiveDate,
    pub most_deficient: NutrientRef,
    pub most_excessive: NutrientRef,
}

/// Response for kcal_report
#[derive(Debug, Serialize)]
pub struct KcalReportResponse {
    pub pet_id: i64,
    pub date: NaiveDate,
    pub resting_kcal: f64,
    pub proper_kcal: f64,
    pub consumed_kcal: f64,
    /// consumed / proper
    pub ratio: f64,
}

/// Profile and intake for one pet-day
fn load_day(db: &Database, pet_id: i64, date: &str) -> Result<(NaiveDate, PetPhysicalProfile, NutrientProfile), String> {
    let date = parse_date(date)?;
    let profile = db.get_profile(pet_id).map_err(|e| e.to_string())?;
    let intake = db.get_intake(pet_id, date).map_err(|e| e.to_string())?;
    Ok((date, profile, intake))
}

/// The nutrient catalog in declaration order
pub fn list_nutrients() -> Vec<NutrientCatalogEntry> {
    nutrition::CATALOG
        .iter()
        .map(|info| NutrientCatalogEntry {
            key: info.kind.as_key(),
            name: info.name,
            unit: info.unit,
            description: info.description,
        })
        .collect()
}

/// Daily target ranges for a pet
pub fn nutrient_targets(db: &Database, pet_id: i64) -> Result<NutrientTargetsResponse, String> {
    let profile = db.get_profile(pet_id).map_err(|e| e.to_string())?;

    let targets = nutrition::catalog::all()
        .iter()
        .map(|kind| {
            let range = nutrition::calculate_range(*kind, &profile).map_err(|e| e.to_string())?;
            Ok(NutrientTarget {
                nutrient: *kind,
                name: kind.name(),
                unit: kind.unit(),
                minimum: range.minimum,
                maximum: range.maximum,
            })
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(NutrientTargetsResponse { pet_id, profile, targets })
}

/// Full verdict list for a pet-day
pub fn nutrient_report(db: &Database, pet_id: i64, date: &str) -> Result<NutrientReportResponse, String> {
    let (date, profile, intake) = load_day(db, pet_id, date)?;
    let verdicts = nutrition::classify_all(&intake, &profile).map_err(|e| e.to_string())?;
    Ok(NutrientReportResponse { pet_id, date, verdicts })
}

/// actual / minimum for every nutrient
pub fn nutrient_ratios(db: &Database, pet_id: i64, date: &str) -> Result<NutrientRatiosResponse, String> {
    let (date, profile, intake) = load_day(db, pet_id, date)?;
    let ratios = nutrition::nutrient_ratios(&intake, &profile)
        .map_err(|e| e.to_string())?
        .into_iter()
        .map(|(kind, ratio)| NutrientRatio { nutrient: kind, name: kind.name(), ratio })
        .collect();
    Ok(NutrientRatiosResponse { pet_id, date, ratios })
}

/// Nutrients below their minimum
pub fn deficient_nutrients(db: &Database, pet_id: i64, date: &str) -> Result<NutrientSetResponse, String> {
    let (date, profile, intake) = load_day(db, pet_id, date)?;
    let found = nutrition::find_deficient(&intake, &profile).map_err(|e| e.to_string())?;
    Ok(NutrientSetResponse {
        pet_id,
        date,
        nutrients: found.into_iter().map(NutrientRef::from).collect(),
    })
}

/// Nutrients above their maximum
pub fn sufficient_nutrients(db: &Database, pet_id: i64, date: &str) -> Result<NutrientSetResponse, String> {
    let (date, profile, intake) = load_day(db, pet_id, date)?;
    let found = nutrition::find_sufficient(&intake, &profile).map_err(|e| e.to_string())?;
    Ok(NutrientSetResponse {
        pet_id,
        date,
        nutrients: found.into_iter().map(NutrientRef::from).collect(),
    })
}

/// Lowest and highest ratio nutrients
pub fn nutrient_extremes(db: &Database, pet_id: i64, date: &str) -> Result<NutrientExtremesResponse, String> {
    let (date, profile, intake) = load_day(db, pet_id, date)?;
    let most_deficient = nutrition::find_most_deficient(&intake, &profile).map_err(|e| e.to_string())?;
    let most_excessive = nutrition::find_most_excessive(&intake, &profile).map_err(|e| e.to_string())?;
    Ok(NutrientExtremesResponse {
        pet_id,
        date,
        most_deficient: most_deficient.into(),
        most_excessive: most_excessive.into(),
    })
}

/// Proper kcal, consumed kcal and their ratio
pub fn kcal_report(db: &Database, pet_id: i64, date: &str) -> Result<KcalReportResponse, String> {
    let date = parse_date(date)?;
    let profile = db.get_profile(pet_id).map_err(|e| e.to_string())?;

    let date_str = date.to_string();
    let meal = db
        .with_conn(|conn| match DailyMeal::get_by_pet_and_date(conn, pet_id, &date_str)? {
            Some(meal) if DailyMeal::entry_count(conn, meal.id)? > 0 => Ok(Some(meal)),
            _ => Ok(None),
        })
        .map_err(|e| format!("Failed to get daily meal: {}", e))?
        .ok_or_else(|| ProviderError::NoIntakeRecorded { pet_id, date }.to_string())?;

    let proper_kcal = nutrition::proper_kcal(&profile).map_err(|e| e.to_string())?;
    Ok(KcalReportResponse {
        pet_id,
        date,
        resting_kcal: nutrition::resting_energy_requirement(profile.weight),
        proper_kcal,
        consumed_kcal: meal.cached_kcal,
        ratio: meal.cached_kcal / proper_kcal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{foods, meals, pets};

    /// 16 kg moderate neutered pet that ate 100 g of a protein-heavy food
    fn setup() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let pet = pets::register_pet(&db, "Bori", 5, 16.0, "moderate", "neutered").unwrap();
        let food = foods::add_food_item(
            &db,
            "테스트 사료",
            100.0,
            448.0,
            NutrientProfile {
                carbohydrate: 10.0,
                protein: 200.0,
                fat: 30.0,
                calcium: 3.0,
                phosphorus: 2.0,
                vitamin_a: 5000.0,
                vitamin_d: 300.0,
                vitamin_e: 50.0,
            },
        )
        .unwrap();
        meals::log_meal(&db, pet.pet.id, "2025-07-01", food.id, 100.0).unwrap();
        (db, pet.pet.id)
    }

    #[test]
    fn test_list_nutrients_in_catalog_order() {
        let entries = list_nutrients();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0].key, "carbohydrate");
        assert_eq!(entries[7].name, "비타민 E");
    }

    #[test]
    fn test_targets_scale_with_weight() {
        let (db, pet_id) = setup();
        let targets = nutrient_targets(&db, pet_id).unwrap();
        let protein = &targets.targets[1];
        assert!((protein.minimum - 2.62 * 16.0).abs() < 1e-9);
        assert!((protein.maximum - 7.0 * 16.0).abs() < 1e-9);
        assert!(nutrient_targets(&db, 404).is_err());
    }

    #[test]
    fn test_day_reports() {
        let (db, pet_id) = setup();

        let report = nutrient_report(&db, pet_id, "2025-07-01").unwrap();
        assert_eq!(report.verdicts.len(), 8);

        let deficient = deficient_nutrients(&db, pet_id, "2025-07-01").unwrap();
        let names: Vec<&str> = deficient.nutrients.iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["탄수화물"]);

        let sufficient = sufficient_nutrients(&db, pet_id, "2025-07-01").unwrap();
        let kinds: Vec<NutrientKind> = sufficient.nutrients.iter().map(|n| n.nutrient).collect();
        assert_eq!(kinds, vec![NutrientKind::Protein]);

        let extremes = nutrient_extremes(&db, pet_id, "2025-07-01").unwrap();
        assert_eq!(extremes.most_deficient.nutrient, NutrientKind::Carbohydrate);
        assert_eq!(extremes.most_excessive.nutrient, NutrientKind::Protein);

        let ratios = nutrient_ratios(&db, pet_id, "2025-07-01").unwrap();
        assert!((ratios.ratios[1].ratio - 200.0 / (2.62 * 16.0)).abs() < 1e-9);
    }

    #[test]
    fn test_kcal_report() {
        let (db, pet_id) = setup();
        let report = kcal_report(&db, pet_id, "2025-07-01").unwrap();
        assert!((report.proper_kcal - 896.0).abs() < 1e-6);
        assert!((report.consumed_kcal - 448.0).abs() < 1e-9);
        assert!((report.ratio - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_missing_day_is_reported() {
        let (db, pet_id) = setup();
        let err = nutrient_report(&db, pet_id, "2025-07-02").unwrap_err();
        assert!(err.contains("No intake recorded"));
        assert!(kcal_report(&db, pet_id, "2025-07-02").unwrap_err().contains("No intake recorded"));
    }
}
