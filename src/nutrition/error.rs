//! Nutrition error types

use thiserror::Error;

use super::catalog::NutrientKind;

/// Errors raised by the catalog, requirement calculator and classifier
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NutritionError {
    #[error("Unknown nutrient: {0}")]
    UnknownNutrient(String),

    #[error("No reference formula registered for nutrient: {}", .0.name())]
    UnsupportedNutrient(NutrientKind),

    #[error("Invalid pet profile: {0}")]
    InvalidProfile(String),
}

/// Result type for nutrition computations
pub type NutritionResult<T> = Result<T, NutritionError>;
