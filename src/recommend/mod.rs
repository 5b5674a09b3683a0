//! Supplement recommendation
//!
//! Maps nutrient names, or a pet's deficient nutrients for a day, to ranked
//! supplement products.

pub mod matcher;

use thiserror::Error;

use crate::nutrition::NutritionError;
use crate::providers::ProviderError;

pub use matcher::{NutrientRecommendation, RecommendationMatcher};

/// Recommendation failures
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Nutrition(#[from] NutritionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Result type for recommendation calls
pub type RecommendResult<T> = Result<T, RecommendError>;
