//! Supplement MCP Tools
//!
//! Supplement catalog maintenance and recommendations.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::models::{SupplementCreate, SupplementProduct};
use crate::nutrition::{self, NutrientKind};
use crate::recommend::{NutrientRecommendation, RecommendationMatcher};

use super::parse_date;

/// Response for list_supplements
#[derive(Debug, Serialize)]
pub struct ListSupplementsResponse {
    pub items: Vec<SupplementProduct>,
    pub limit: i64,
    pub offset: i64,
}

/// Response for recommend_by_nutrient
#[derive(Debug, Serialize)]
pub struct RecommendByNutrientResponse {
    pub nutrient_name: String,
    pub products: Vec<SupplementProduct>,
}

/// Response for recommendations over several nutrients
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<NutrientRecommendation>,
}

/// Add a supplement tagged with the given catalog nutrient names
pub fn add_supplement(
    db: &Database,
    name: &str,
    english_name: Option<String>,
    vendor: Option<String>,
    url: Option<String>,
    img_path: Option<String>,
    nutrient_names: &[String],
) -> Result<SupplementProduct, String> {
    let nutrients = nutrient_names
        .iter()
        .map(|n| nutrition::lookup(n.trim()))
        .collect::<Result<BTreeSet<NutrientKind>, _>>()
        .map_err(|e| e.to_string())?;

    let data = SupplementCreate {
        name: name.trim().to_string(),
        english_name,
        vendor,
        url,
        img_path,
        nutrients,
    };

    let product = db
        .with_conn_mut(|conn| SupplementProduct::create(conn, &data))
        .map_err(|e| format!("Failed to add supplement: {}", e))?;

    info!(supplement_id = product.id, name = %product.name, tags = product.nutrients.len(), "Added supplement");
    Ok(product)
}

/// Get a supplement by ID
pub fn get_supplement(db: &Database, id: i64) -> Result<Option<SupplementProduct>, String> {
    db.with_conn(|conn| SupplementProduct::get_by_id(conn, id))
        .map_err(|e| format!("Failed to get supplement: {}", e))
}

/// List supplements with pagination
pub fn list_supplements(db: &Database, limit: i64, offset: i64) -> Result<ListSupplementsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let items = db
        .with_conn(|conn| SupplementProduct::list(conn, limit, offset))
        .map_err(|e| format!("Failed to list supplements: {}", e))?;
    Ok(ListSupplementsResponse { items, limit, offset })
}

/// Products for one nutrient name
pub fn recommend_by_nutrient(db: &Database, nutrient_name: &str) -> Result<RecommendByNutrientResponse, String> {
    let products = RecommendationMatcher::new(db)
        .find_by_nutrient_name(nutrient_name)
        .map_err(|e| e.to_string())?;
    Ok(RecommendByNutrientResponse {
        nutrient_name: nutrient_name.to_string(),
        products,
    })
}

/// Products per nutrient name, in request order
pub fn recommend_by_nutrients(db: &Database, nutrient_names: &[String]) -> Result<RecommendationsResponse, String> {
    let recommendations = RecommendationMatcher::new(db)
        .find_by_nutrient_names(nutrient_names)
        .map_err(|e| e.to_string())?;
    Ok(RecommendationsResponse { recommendations })
}

/// Products for every nutrient the pet was short on that day
pub fn recommend_for_deficiencies(db: &Database, pet_id: i64, date: &str) -> Result<RecommendationsResponse, String> {
    let date = parse_date(date)?;
    let recommendations = RecommendationMatcher::new(db)
        .find_by_deficient_nutrients(db, db, pet_id, date)
        .map_err(|e| e.to_string())?;
    Ok(RecommendationsResponse { recommendations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NutrientProfile;
    use crate::tools::{foods, meals, pets};

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_add_rejects_unknown_nutrient() {
        let db = Database::open_in_memory().unwrap();
        let err = add_supplement(&db, "Mystery", None, None, None, None, &names(&["비타민 Z"])).unwrap_err();
        assert!(err.contains("Unknown nutrient"));
        assert!(list_supplements(&db, 10, 0).unwrap().items.is_empty());
    }

    #[test]
    fn test_recommendations_from_database() {
        let db = Database::open_in_memory().unwrap();
        let rice = add_supplement(&db, "Rice Boost", None, None, None, None, &names(&["탄수화물"])).unwrap();
        let combo = add_supplement(
            &db,
            "Energy Mix",
            Some("Energy Mix".to_string()),
            Some("PetLab".to_string()),
            None,
            None,
            &names(&["탄수화물", "단백질"]),
        )
        .unwrap();
        assert_eq!(get_supplement(&db, combo.id).unwrap().unwrap().vendor.as_deref(), Some("PetLab"));

        let single = recommend_by_nutrient(&db, "탄수화물").unwrap();
        let ids: Vec<i64> = single.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![combo.id, rice.id]);

        let many = recommend_by_nutrients(&db, &names(&["지방", "탄수화물"])).unwrap();
        assert_eq!(many.recommendations.len(), 2);
        assert!(many.recommendations[0].products.is_empty());
        assert_eq!(many.recommendations[1].products.len(), 2);

        assert!(recommend_by_nutrients(&db, &names(&["탄수화물", "존재하지않음"])).is_err());
    }

    #[test]
    fn test_recommend_for_deficiencies() {
        let db = Database::open_in_memory().unwrap();
        let pet = pets::register_pet(&db, "Bori", 4, 10.0, "moderate", "neutered").unwrap();
        // short on carbohydrate and fat only
        let food = foods::add_food_item(
            &db,
            "단백 간식",
            100.0,
            200.0,
            NutrientProfile {
                carbohydrate: 10.0,
                protein: 30.0,
                fat: 5.0,
                calcium: 2.0,
                phosphorus: 1.5,
                vitamin_a: 2000.0,
                vitamin_d: 200.0,
                vitamin_e: 20.0,
            },
        )
        .unwrap();
        meals::log_meal(&db, pet.pet.id, "2025-08-08", food.id, 100.0).unwrap();
        let rice = add_supplement(&db, "Rice Boost", None, None, None, None, &names(&["탄수화물"])).unwrap();

        let result = recommend_for_deficiencies(&db, pet.pet.id, "2025-08-08").unwrap();
        let keys: Vec<NutrientKind> = result.recommendations.iter().map(|r| r.nutrient).collect();
        assert_eq!(keys, vec![NutrientKind::Carbohydrate, NutrientKind::Fat]);
        assert_eq!(result.recommendations[0].products[0].id, rice.id);
        assert!(result.recommendations[1].products.is_empty());

        assert!(recommend_for_deficiencies(&db, pet.pet.id, "2025-08-09").is_err());
    }
}
