//! Intake classifier
//!
//! Compares one day's [`NutrientProfile`] against the targets computed for a
//! pet. Every entry point walks the catalog in declaration order and applies
//! the same range and ratio functions to each nutrient.
//!
//! Naming note: "sufficient" means intake *above the maximum* (excess), not
//! intake within range. Callers rely on that meaning.

use std::collections::BTreeSet;

use serde::Serialize;

use super::catalog::{self, NutrientKind};
use super::error::{NutritionError, NutritionResult};
use super::requirements::{calculate_range, PetPhysicalProfile, TargetRange};
use crate::models::NutrientProfile;

/// Where an actual amount falls relative to its target range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    /// Below the minimum
    Deficient,
    /// Between minimum and maximum, inclusive
    Adequate,
    /// Above the maximum
    Excess,
}

impl IntakeStatus {
    pub fn of(actual: f64, range: &TargetRange) -> Self {
        if actual < range.minimum {
            IntakeStatus::Deficient
        } else if actual > range.maximum {
            IntakeStatus::Excess
        } else {
            IntakeStatus::Adequate
        }
    }
}

/// Classification of one nutrient for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeficiencyVerdict {
    pub nutrient: NutrientKind,
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    pub actual: f64,
    pub minimum: f64,
    pub maximum: f64,
    /// actual / minimum
    pub ratio: f64,
    /// maximum / minimum
    pub maximum_ratio: f64,
    pub status: IntakeStatus,
}

impl DeficiencyVerdict {
    pub fn is_deficient(&self) -> bool {
        self.status == IntakeStatus::Deficient
    }

    pub fn is_sufficient(&self) -> bool {
        self.status == IntakeStatus::Excess
    }
}

/// Reject negative or non-finite intake amounts
fn intake_amount(nutrient: NutrientKind, profile: &NutrientProfile) -> NutritionResult<f64> {
    let amount = profile.amount(nutrient);
    if !amount.is_finite() || amount < 0.0 {
        return Err(NutritionError::InvalidProfile(format!(
            "intake for {} must be a non-negative amount, got {}",
            nutrient.name(),
            amount
        )));
    }
    Ok(amount)
}

fn validate_intake(profile: &NutrientProfile) -> NutritionResult<()> {
    for kind in catalog::all() {
        intake_amount(*kind, profile)?;
    }
    Ok(())
}

/// Classify a single nutrient
pub fn classify(
    nutrient: NutrientKind,
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<DeficiencyVerdict> {
    let actual = intake_amount(nutrient, profile)?;
    let range = calculate_range(nutrient, pet)?;
    let info = nutrient.info();

    Ok(DeficiencyVerdict {
        nutrient,
        name: info.name,
        unit: info.unit,
        description: info.description,
        actual,
        minimum: range.minimum,
        maximum: range.maximum,
        ratio: actual / range.minimum,
        maximum_ratio: range.maximum / range.minimum,
        status: IntakeStatus::of(actual, &range),
    })
}

/// One verdict per catalog nutrient, in catalog order
pub fn classify_all(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<Vec<DeficiencyVerdict>> {
    validate_intake(profile)?;
    catalog::all()
        .iter()
        .map(|kind| classify(*kind, profile, pet))
        .collect()
}

/// actual / minimum target for one nutrient
///
/// Carbohydrate uses the activity/neutering adjusted minimum; every other
/// nutrient depends on weight alone.
pub fn ratio(
    nutrient: NutrientKind,
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<f64> {
    let actual = intake_amount(nutrient, profile)?;
    let range = calculate_range(nutrient, pet)?;
    Ok(actual / range.minimum)
}

/// (nutrient, ratio) for every catalog nutrient, in catalog order
pub fn nutrient_ratios(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<Vec<(NutrientKind, f64)>> {
    validate_intake(profile)?;
    catalog::all()
        .iter()
        .map(|kind| ratio(*kind, profile, pet).map(|value| (*kind, value)))
        .collect()
}

/// Nutrients with actual < minimum
pub fn find_deficient(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<BTreeSet<NutrientKind>> {
    Ok(classify_all(profile, pet)?
        .into_iter()
        .filter(DeficiencyVerdict::is_deficient)
        .map(|verdict| verdict.nutrient)
        .collect())
}

/// Nutrients with actual > maximum (excess intake)
pub fn find_sufficient(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<BTreeSet<NutrientKind>> {
    Ok(classify_all(profile, pet)?
        .into_iter()
        .filter(DeficiencyVerdict::is_sufficient)
        .map(|verdict| verdict.nutrient)
        .collect())
}

/// Nutrient with the highest ratio. Ties go to the earliest catalog entry.
pub fn find_most_excessive(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<NutrientKind> {
    select_by_ratio(profile, pet, |candidate, best| candidate > best)
}

/// Nutrient with the lowest ratio. Ties go to the earliest catalog entry.
pub fn find_most_deficient(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
) -> NutritionResult<NutrientKind> {
    select_by_ratio(profile, pet, |candidate, best| candidate < best)
}

/// Linear scan in catalog order; a later entry replaces the current pick only
/// when `beats` holds strictly.
fn select_by_ratio<F>(
    profile: &NutrientProfile,
    pet: &PetPhysicalProfile,
    beats: F,
) -> NutritionResult<NutrientKind>
where
    F: Fn(f64, f64) -> bool,
{
    let ratios = nutrient_ratios(profile, pet)?;

    // catalog is non-empty
    let (mut best_kind, mut best_ratio) = ratios[0];

    for &(kind, value) in &ratios[1..] {
        if beats(value, best_ratio) {
            best_kind = kind;
            best_ratio = value;
        }
    }

    Ok(best_kind)
}
