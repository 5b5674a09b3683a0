//! SQLite-backed providers
//!
//! Implements the boundary traits over the stored pets, daily meals and supplements.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{DailyMeal, NutrientProfile, Pet, SupplementProduct};
use crate::nutrition::{NutrientKind, PetPhysicalProfile};
use crate::providers::{
    DailyIntakeProvider, PetProfileProvider, ProductStore, ProviderError, ProviderResult,
};

use super::Database;

impl PetProfileProvider for Database {
    fn get_profile(&self, pet_id: i64) -> ProviderResult<PetPhysicalProfile> {
        let pet = self
            .with_conn(|conn| Pet::get_by_id(conn, pet_id))?
            .ok_or(ProviderError::PetNotFound(pet_id))?;
        Ok(pet.physical_profile()?)
    }
}

impl DailyIntakeProvider for Database {
    fn get_intake(&self, pet_id: i64, date: NaiveDate) -> ProviderResult<NutrientProfile> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let logged = self.with_conn(|conn| {
            match DailyMeal::get_by_pet_and_date(conn, pet_id, &date_str)? {
                Some(meal) if DailyMeal::entry_count(conn, meal.id)? > 0 => Ok(Some(meal)),
                _ => Ok(None),
            }
        })?;
        let meal = logged.ok_or(ProviderError::NoIntakeRecorded { pet_id, date })?;
        Ok(meal.cached_nutrients)
    }
}

impl ProductStore for Database {
    fn find_products_by_nutrient_combination(
        &self,
        nutrients: &BTreeSet<NutrientKind>,
    ) -> ProviderResult<Vec<SupplementProduct>> {
        Ok(self.with_conn(|conn| SupplementProduct::find_by_nutrients(conn, nutrients))?)
    }
}
