//! Nutrient requirement and deficiency analysis
//!
//! Catalog of tracked nutrients, weight/activity based target ranges, and
//! classification of a day's intake against them.

pub mod catalog;
pub mod classifier;
pub mod error;
pub mod requirements;

pub use catalog::{lookup, NutrientInfo, NutrientKind, CATALOG};
pub use classifier::{
    classify, classify_all, find_deficient, find_most_deficient, find_most_excessive,
    find_sufficient, nutrient_ratios, ratio, DeficiencyVerdict, IntakeStatus,
};
pub use error::{NutritionError, NutritionResult};
pub use requirements::{
    calculate_range, calculate_range_by_name, energy_factor, proper_kcal, resting_energy_requirement,
    ActivityLevel, NeuteringStatus, PetPhysicalProfile, RequirementTable, TargetRange,
    STANDARD_REQUIREMENTS,
};
