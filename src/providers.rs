//! Boundary contracts
//!
//! The analysis engine never performs I/O itself. Pet profiles, daily intake
//! totals and the supplement catalog come in through these traits; the SQLite
//! implementations live in [`crate::db::providers`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::db::DbError;
use crate::models::{NutrientProfile, SupplementProduct};
use crate::nutrition::{NutrientKind, NutritionError, PetPhysicalProfile};

/// Errors raised by external collaborators
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Pet not found: {0}")]
    PetNotFound(i64),

    #[error("No intake recorded for pet {pet_id} on {date}")]
    NoIntakeRecorded { pet_id: i64, date: NaiveDate },

    #[error("Stored record is invalid: {0}")]
    InvalidRecord(#[from] NutritionError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Source of a pet's weight, activity level and neutering status
pub trait PetProfileProvider {
    /// Fails with [`ProviderError::PetNotFound`] for an unknown id
    fn get_profile(&self, pet_id: i64) -> ProviderResult<PetPhysicalProfile>;
}

/// Source of a pet's summed nutrient intake for one day
pub trait DailyIntakeProvider {
    /// Fails with [`ProviderError::NoIntakeRecorded`] when nothing was logged
    fn get_intake(&self, pet_id: i64, date: NaiveDate) -> ProviderResult<NutrientProfile>;
}

/// Supplement catalog queries
///
/// Both queries return products tagged with *every* requested nutrient,
/// ordered by number of tags (most first) and then by id.
pub trait ProductStore {
    fn find_products_by_nutrient_combination(
        &self,
        nutrients: &BTreeSet<NutrientKind>,
    ) -> ProviderResult<Vec<SupplementProduct>>;

    fn find_products_by_nutrient(&self, nutrient: NutrientKind) -> ProviderResult<Vec<SupplementProduct>> {
        self.find_products_by_nutrient_combination(&BTreeSet::from([nutrient]))
    }
}
