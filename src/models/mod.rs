//! Data models
//!
//! Rust structs representing database entities.

mod daily_meal;
mod food_item;
mod meal_entry;
mod medical_condition;
mod nutrition;
mod pet;
mod supplement;

pub use daily_meal::DailyMeal;
pub use food_item::{FoodItem, FoodItemCreate};
pub use meal_entry::{
    MealEntry, MealEntryCreate, MealEntryDetail, recalculate_daily_meal_nutrition,
};
pub use medical_condition::{ConditionKind, MedicalCondition, MedicalConditionCreate};
pub use nutrition::NutrientProfile;
pub use pet::{Pet, PetCreate, PetUpdate};
pub use supplement::{SupplementCreate, SupplementProduct};
