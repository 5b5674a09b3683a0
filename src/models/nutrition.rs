//! Shared nutrient profile
//!
//! Used for food items, meal entries and daily meal totals.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::nutrition::NutrientKind;

/// Measured amount of every catalog nutrient
///
/// Represents either one day's intake or the content of one food/product serving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub carbohydrate: f64, // grams
    pub protein: f64,      // grams
    pub fat: f64,          // grams
    pub calcium: f64,      // grams
    pub phosphorus: f64,   // grams
    pub vitamin_a: f64,    // IU
    pub vitamin_d: f64,    // IU
    pub vitamin_e: f64,    // IU
}

impl NutrientProfile {
    /// Create a new profile with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a profile from (kind, amount) pairs; unlisted kinds stay at zero
    pub fn from_amounts<I>(amounts: I) -> Self
    where
        I: IntoIterator<Item = (NutrientKind, f64)>,
    {
        let mut profile = Self::zero();
        for (kind, amount) in amounts {
            *profile.slot_mut(kind) = amount;
        }
        profile
    }

    /// Amount recorded for a nutrient
    pub fn amount(&self, kind: NutrientKind) -> f64 {
        match kind {
            NutrientKind::Carbohydrate => self.carbohydrate,
            NutrientKind::Protein => self.protein,
            NutrientKind::Fat => self.fat,
            NutrientKind::Calcium => self.calcium,
            NutrientKind::Phosphorus => self.phosphorus,
            NutrientKind::VitaminA => self.vitamin_a,
            NutrientKind::VitaminD => self.vitamin_d,
            NutrientKind::VitaminE => self.vitamin_e,
        }
    }

    fn slot_mut(&mut self, kind: NutrientKind) -> &mut f64 {
        match kind {
            NutrientKind::Carbohydrate => &mut self.carbohydrate,
            NutrientKind::Protein => &mut self.protein,
            NutrientKind::Fat => &mut self.fat,
            NutrientKind::Calcium => &mut self.calcium,
            NutrientKind::Phosphorus => &mut self.phosphorus,
            NutrientKind::VitaminA => &mut self.vitamin_a,
            NutrientKind::VitaminD => &mut self.vitamin_d,
            NutrientKind::VitaminE => &mut self.vitamin_e,
        }
    }

    /// (kind, amount) pairs in catalog order
    pub fn amounts(&self) -> impl Iterator<Item = (NutrientKind, f64)> + '_ {
        NutrientKind::ALL.iter().map(move |kind| (*kind, self.amount(*kind)))
    }

    /// Read the eight nutrient columns of a row, e.g. `cached_protein` with prefix `cached_`
    pub(crate) fn from_row_columns(row: &Row, prefix: &str) -> rusqlite::Result<Self> {
        let mut profile = Self::zero();
        for kind in NutrientKind::ALL {
            let column = format!("{}{}", prefix, kind.as_key());
            *profile.slot_mut(kind) = row.get(column.as_str())?;
        }
        Ok(profile)
    }

    /// Scale every amount by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self::from_amounts(self.amounts().map(|(kind, amount)| (kind, amount * multiplier)))
    }

    /// Add another profile to this one
    pub fn add(&self, other: &NutrientProfile) -> Self {
        Self::from_amounts(
            self.amounts()
                .map(|(kind, amount)| (kind, amount + other.amount(kind))),
        )
    }
}

impl std::ops::Add for NutrientProfile {
    type Output = NutrientProfile;

    fn add(self, other: NutrientProfile) -> NutrientProfile {
        NutrientProfile::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutrientProfile {
    type Output = NutrientProfile;

    fn mul(self, multiplier: f64) -> NutrientProfile {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutrientProfile {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientProfile::zero(), |acc, n| acc + n)
    }
}
