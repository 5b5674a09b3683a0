//! PetPlate MCP Server Implementation
//!
//! Parameter structs and the tool router over [`crate::tools`].

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::NutrientProfile;
use crate::tools::status::StatusTracker;
use crate::tools::{conditions, foods, meals, nutrients, pets, supplements};

/// PetPlate MCP Service
#[derive(Clone)]
pub struct PetPlateService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<PetPlateService>,
}

impl PetPlateService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

/// Serialize a tool result as pretty JSON
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(kind: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        kind, id
    ))]))
}

// ============================================================================
// Pet Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RegisterPetParams {
    pub name: String,
    #[serde(default)]
    pub age: i64,
    /// Body weight in kilograms
    pub weight: f64,
    /// low | moderate | high
    pub activity: String,
    /// neutered | intact
    pub neutering: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PetIdParams {
    pub pet_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdatePetParams {
    pub pet_id: i64,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub weight: Option<f64>,
    pub activity: Option<String>,
    pub neutering: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMedicalConditionParams {
    /// allergy | disease
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMedicalConditionsParams {
    /// allergy | disease; omit for both
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddPetConditionParams {
    pub pet_id: i64,
    /// ID from list_medical_conditions
    pub condition_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListPetConditionsParams {
    pub pet_id: i64,
    /// allergy | disease; omit for both
    pub kind: Option<String>,
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddFoodItemParams {
    pub name: String,
    /// Grams the values below refer to
    #[serde(default = "default_standard_amount")]
    pub standard_amount: f64,
    pub kcal: f64,
    #[serde(default)]
    pub carbohydrate: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub calcium: f64,
    #[serde(default)]
    pub phosphorus: f64,
    #[serde(default)]
    pub vitamin_a: f64,
    #[serde(default)]
    pub vitamin_d: f64,
    #[serde(default)]
    pub vitamin_e: f64,
}

fn default_standard_amount() -> f64 { 100.0 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodItemParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetFoodItemByNameParams {
    /// Exact food name
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchFoodItemsParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: i64,
}

fn default_search_limit() -> i64 { 20 }

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub pet_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub food_item_id: i64,
    /// Grams eaten
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PetDateParams {
    pub pet_id: i64,
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDailyMealsParams {
    pub pet_id: i64,
    #[serde(default = "default_days_limit")]
    pub limit: i64,
}

fn default_days_limit() -> i64 { 30 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteMealEntryParams {
    pub id: i64,
}

// ============================================================================
// Supplement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddSupplementParams {
    pub name: String,
    pub english_name: Option<String>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub img_path: Option<String>,
    /// Catalog display names, e.g. ["칼슘", "비타민 D"]
    pub nutrients: Vec<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetSupplementParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListSupplementsParams {
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecommendByNutrientParams {
    /// Catalog display name, e.g. "탄수화물"
    pub nutrient: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecommendByNutrientsParams {
    pub nutrients: Vec<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl PetPlateService {
    // --- Status ---

    #[tool(description = "Get the current status of the PetPlate service including build info, database schema version, and process information")]
    async fn petplate_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        json_result(&tracker.get_status(&self.database))
    }

    #[tool(description = "Get the PetPlate usage guide. Call this before registering pets, logging meals, or asking for supplement recommendations.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Pets ---

    #[tool(description = "Register a pet with weight (kg), activity level and neutering status")]
    fn register_pet(&self, Parameters(p): Parameters<RegisterPetParams>) -> Result<CallToolResult, McpError> {
        let result = pets::register_pet(&self.database, &p.name, p.age, p.weight, &p.activity, &p.neutering)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a pet with its resting and proper daily kcal")]
    fn get_pet(&self, Parameters(p): Parameters<PetIdParams>) -> Result<CallToolResult, McpError> {
        match pets::get_pet(&self.database, p.pet_id).map_err(|e| McpError::internal_error(e, None))? {
            Some(pet) => json_result(&pet),
            None => not_found("Pet", p.pet_id),
        }
    }

    #[tool(description = "List all registered pets")]
    fn list_pets(&self) -> Result<CallToolResult, McpError> {
        let result = pets::list_pets(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a pet's name, age, weight, activity level or neutering status")]
    fn update_pet(&self, Parameters(p): Parameters<UpdatePetParams>) -> Result<CallToolResult, McpError> {
        let result = pets::update_pet(
            &self.database,
            p.pet_id,
            p.name,
            p.age,
            p.weight,
            p.activity.as_deref(),
            p.neutering.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a pet and all of its meal history")]
    fn delete_pet(&self, Parameters(p): Parameters<PetIdParams>) -> Result<CallToolResult, McpError> {
        let result = pets::delete_pet(&self.database, p.pet_id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add an allergy or disease to the shared medical condition catalog")]
    fn add_medical_condition(&self, Parameters(p): Parameters<AddMedicalConditionParams>) -> Result<CallToolResult, McpError> {
        let result = conditions::add_medical_condition(&self.database, &p.kind, &p.name, p.description)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List catalog allergies and diseases, optionally of one kind")]
    fn list_medical_conditions(&self, Parameters(p): Parameters<ListMedicalConditionsParams>) -> Result<CallToolResult, McpError> {
        let result = conditions::list_medical_conditions(&self.database, p.kind.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Record that a pet has a catalog allergy or disease")]
    fn add_pet_condition(&self, Parameters(p): Parameters<AddPetConditionParams>) -> Result<CallToolResult, McpError> {
        let result = conditions::add_pet_condition(&self.database, p.pet_id, p.condition_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List a pet's allergies and/or diseases")]
    fn list_pet_conditions(&self, Parameters(p): Parameters<ListPetConditionsParams>) -> Result<CallToolResult, McpError> {
        let result = conditions::list_pet_conditions(&self.database, p.pet_id, p.kind.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Foods ---

    #[tool(description = "Add a food with kcal and nutrients per standard amount in grams (default 100 g)")]
    fn add_food_item(&self, Parameters(p): Parameters<AddFoodItemParams>) -> Result<CallToolResult, McpError> {
        let nutrients = NutrientProfile {
            carbohydrate: p.carbohydrate,
            protein: p.protein,
            fat: p.fat,
            calcium: p.calcium,
            phosphorus: p.phosphorus,
            vitamin_a: p.vitamin_a,
            vitamin_d: p.vitamin_d,
            vitamin_e: p.vitamin_e,
        };
        let result = foods::add_food_item(&self.database, &p.name, p.standard_amount, p.kcal, nutrients)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a food item with its full nutrient content")]
    fn get_food_item(&self, Parameters(p): Parameters<GetFoodItemParams>) -> Result<CallToolResult, McpError> {
        match foods::get_food_item(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(item) => json_result(&item),
            None => not_found("Food item", p.id),
        }
    }

    #[tool(description = "Get a food item by its exact name")]
    fn get_food_item_by_name(&self, Parameters(p): Parameters<GetFoodItemByNameParams>) -> Result<CallToolResult, McpError> {
        match foods::get_food_item_by_name(&self.database, &p.name).map_err(|e| McpError::internal_error(e, None))? {
            Some(item) => json_result(&item),
            None => Ok(CallToolResult::success(vec![Content::text(
                serde_json::json!({ "error": "Food item not found", "name": p.name }).to_string(),
            )])),
        }
    }

    #[tool(description = "Delete a food item; foods used by logged meals are kept")]
    fn delete_food_item(&self, Parameters(p): Parameters<GetFoodItemParams>) -> Result<CallToolResult, McpError> {
        let result = foods::delete_food_item(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Search food items by name")]
    fn search_food_items(&self, Parameters(p): Parameters<SearchFoodItemsParams>) -> Result<CallToolResult, McpError> {
        let result = foods::search_food_items(&self.database, &p.query, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Meals ---

    #[tool(description = "Log grams of a food eaten by a pet on a date. Creates the day if needed and recalculates its totals.")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let result = meals::log_meal(&self.database, p.pet_id, &p.date, p.food_item_id, p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a pet's day: every logged food and the kcal/nutrient totals")]
    fn get_daily_meal(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        match meals::get_daily_meal(&self.database, p.pet_id, &p.date).map_err(|e| McpError::internal_error(e, None))? {
            Some(day) => json_result(&day),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "No meals logged", "pet_id": {}, "date": "{}"}}"#,
                p.pet_id, p.date
            ))])),
        }
    }

    #[tool(description = "List a pet's logged days with totals, newest first")]
    fn list_daily_meals(&self, Parameters(p): Parameters<ListDailyMealsParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_daily_meals(&self.database, p.pet_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal entry and recalculate the day's totals")]
    fn delete_meal_entry(&self, Parameters(p): Parameters<DeleteMealEntryParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Nutrient analysis ---

    #[tool(description = "List the tracked nutrients with display names, units and descriptions")]
    fn list_nutrients(&self) -> Result<CallToolResult, McpError> {
        json_result(&nutrients::list_nutrients())
    }

    #[tool(description = "Daily minimum/maximum target for every nutrient, from the pet's weight, activity and neutering status")]
    fn nutrient_targets(&self, Parameters(p): Parameters<PetIdParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::nutrient_targets(&self.database, p.pet_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Compare a pet's intake on a date with its targets: actual, minimum, maximum, ratio and status per nutrient")]
    fn nutrient_report(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::nutrient_report(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Ratio of actual intake to minimum target for every nutrient on a date")]
    fn nutrient_ratios(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::nutrient_ratios(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Nutrients below their minimum target on a date")]
    fn deficient_nutrients(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::deficient_nutrients(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Nutrients ABOVE their maximum target (excess) on a date")]
    fn sufficient_nutrients(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::sufficient_nutrients(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "The most deficient and most excessive nutrient on a date, by intake/minimum ratio")]
    fn nutrient_extremes(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::nutrient_extremes(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Proper daily kcal, consumed kcal on a date, and consumed/proper ratio")]
    fn kcal_report(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = nutrients::kcal_report(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Supplements ---

    #[tool(description = "Add a supplement product tagged with catalog nutrient names")]
    fn add_supplement(&self, Parameters(p): Parameters<AddSupplementParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::add_supplement(
            &self.database,
            &p.name,
            p.english_name,
            p.vendor,
            p.url,
            p.img_path,
            &p.nutrients,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a supplement product with its nutrient tags")]
    fn get_supplement(&self, Parameters(p): Parameters<GetSupplementParams>) -> Result<CallToolResult, McpError> {
        match supplements::get_supplement(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(product) => json_result(&product),
            None => not_found("Supplement", p.id),
        }
    }

    #[tool(description = "List supplement products with pagination")]
    fn list_supplements(&self, Parameters(p): Parameters<ListSupplementsParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::list_supplements(&self.database, p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Supplements tagged with one nutrient, products with more tags first")]
    fn recommend_by_nutrient(&self, Parameters(p): Parameters<RecommendByNutrientParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::recommend_by_nutrient(&self.database, &p.nutrient)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Supplements for several nutrients. Products covering more of the requested nutrients rank first. Fails if any name is unknown.")]
    fn recommend_by_nutrients(&self, Parameters(p): Parameters<RecommendByNutrientsParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::recommend_by_nutrients(&self.database, &p.nutrients)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Supplements for every nutrient a pet was deficient in on a date. Nutrients without products are listed with an empty product list.")]
    fn recommend_for_deficiencies(&self, Parameters(p): Parameters<PetDateParams>) -> Result<CallToolResult, McpError> {
        let result = supplements::recommend_for_deficiencies(&self.database, p.pet_id, &p.date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PetPlateService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "petplate".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("PetPlate".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "PetPlate - companion animal nutrition tracking and supplement recommendation. \
                 Call usage_instructions first. \
                 Pets: register_pet/get_pet/list_pets/update_pet/delete_pet. \
                 Conditions: add_medical_condition/list_medical_conditions/add_pet_condition/list_pet_conditions. \
                 Foods: add_food_item/get_food_item/get_food_item_by_name/search_food_items/delete_food_item. \
                 Meals: log_meal/get_daily_meal/list_daily_meals/delete_meal_entry. \
                 Analysis: list_nutrients, nutrient_targets, nutrient_report, nutrient_ratios, \
                 deficient_nutrients, sufficient_nutrients (means excess), nutrient_extremes, kcal_report. \
                 Supplements: add_supplement/get_supplement/list_supplements, \
                 recommend_by_nutrient, recommend_by_nutrients, recommend_for_deficiencies."
                    .into(),
            ),
        }
    }
}
