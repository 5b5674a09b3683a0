//! Requirement calculator
//!
//! Turns a pet's physical profile into per-nutrient minimum/maximum daily
//! targets. Coefficients are plain data keyed by [`NutrientKind`]; the
//! functions here are pure and deterministic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::{self, NutrientKind};
use super::error::{NutritionError, NutritionResult};

/// Daily activity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::High => "high",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "낮음" => Ok(ActivityLevel::Low),
            "moderate" | "보통" => Ok(ActivityLevel::Moderate),
            "high" | "높음" => Ok(ActivityLevel::High),
            other => Err(NutritionError::InvalidProfile(format!(
                "unrecognized activity level '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Neutering status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeuteringStatus {
    Neutered,
    Intact,
}

impl NeuteringStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeuteringStatus::Neutered => "neutered",
            NeuteringStatus::Intact => "intact",
        }
    }
}

impl FromStr for NeuteringStatus {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neutered" | "true" => Ok(NeuteringStatus::Neutered),
            "intact" | "false" => Ok(NeuteringStatus::Intact),
            other => Err(NutritionError::InvalidProfile(format!(
                "unrecognized neutering status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for NeuteringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The inputs every target computation depends on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PetPhysicalProfile {
    /// Body weight in kilograms
    pub weight: f64,
    pub activity: ActivityLevel,
    pub neutering: NeuteringStatus,
}

impl PetPhysicalProfile {
    /// Build a validated profile
    pub fn new(weight: f64, activity: ActivityLevel, neutering: NeuteringStatus) -> NutritionResult<Self> {
        let profile = Self { weight, activity, neutering };
        profile.validate()?;
        Ok(profile)
    }

    /// Parse activity and neutering from their boundary strings
    pub fn parse(weight: f64, activity: &str, neutering: &str) -> NutritionResult<Self> {
        Self::new(weight, activity.parse()?, neutering.parse()?)
    }

    /// Weight must be a positive, finite number of kilograms
    pub fn validate(&self) -> NutritionResult<()> {
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(NutritionError::InvalidProfile(format!(
                "weight must be positive, got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

/// Computed daily (minimum, maximum) amount for one nutrient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetRange {
    pub minimum: f64,
    pub maximum: f64,
}

/// Per-kilogram multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub min_per_kg: f64,
    pub max_per_kg: f64,
}

impl Coefficients {
    pub const fn new(min_per_kg: f64, max_per_kg: f64) -> Self {
        Self { min_per_kg, max_per_kg }
    }

    fn apply(&self, weight: f64) -> TargetRange {
        TargetRange {
            minimum: weight * self.min_per_kg,
            maximum: weight * self.max_per_kg,
        }
    }
}

/// One cell of an activity/neutering adjusted table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedCoefficients {
    pub activity: ActivityLevel,
    pub neutering: NeuteringStatus,
    pub coefficients: Coefficients,
}

/// How a nutrient's reference amount is derived
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceRule {
    /// `weight * coefficient`, independent of activity and neutering
    PerKilogram(Coefficients),
    /// Coefficient chosen by (activity, neutering) before the weight multiplication
    ActivityAdjusted(&'static [AdjustedCoefficients]),
}

/// Reference rules keyed by nutrient
#[derive(Debug, Clone, Copy)]
pub struct RequirementTable {
    rules: &'static [(NutrientKind, ReferenceRule)],
}

const fn cell(activity: ActivityLevel, neutering: NeuteringStatus, min: f64, max: f64) -> AdjustedCoefficients {
    AdjustedCoefficients {
        activity,
        neutering,
        coefficients: Coefficients::new(min, max),
    }
}

/// Carbohydrate grams per kilogram by activity and neutering
pub const CARBOHYDRATE_COEFFICIENTS: [AdjustedCoefficients; 6] = [
    cell(ActivityLevel::Low, NeuteringStatus::Neutered, 3.0, 6.0),
    cell(ActivityLevel::Low, NeuteringStatus::Intact, 3.5, 7.0),
    cell(ActivityLevel::Moderate, NeuteringStatus::Neutered, 4.0, 8.0),
    cell(ActivityLevel::Moderate, NeuteringStatus::Intact, 4.5, 9.0),
    cell(ActivityLevel::High, NeuteringStatus::Neutered, 6.0, 12.0),
    cell(ActivityLevel::High, NeuteringStatus::Intact, 7.0, 14.0),
];

const STANDARD_RULES: [(NutrientKind, ReferenceRule); 8] = [
    (NutrientKind::Carbohydrate, ReferenceRule::ActivityAdjusted(&CARBOHYDRATE_COEFFICIENTS)),
    (NutrientKind::Protein, ReferenceRule::PerKilogram(Coefficients::new(2.62, 7.0))),
    (NutrientKind::Fat, ReferenceRule::PerKilogram(Coefficients::new(1.3, 5.0))),
    (NutrientKind::Calcium, ReferenceRule::PerKilogram(Coefficients::new(0.12, 0.5))),
    (NutrientKind::Phosphorus, ReferenceRule::PerKilogram(Coefficients::new(0.1, 0.4))),
    (NutrientKind::VitaminA, ReferenceRule::PerKilogram(Coefficients::new(100.0, 2100.0))),
    (NutrientKind::VitaminD, ReferenceRule::PerKilogram(Coefficients::new(11.0, 80.0))),
    (NutrientKind::VitaminE, ReferenceRule::PerKilogram(Coefficients::new(1.0, 30.0))),
];

/// Built-in reference table for adult dogs
pub const STANDARD_REQUIREMENTS: RequirementTable = RequirementTable::new(&STANDARD_RULES);

impl RequirementTable {
    pub const fn new(rules: &'static [(NutrientKind, ReferenceRule)]) -> Self {
        Self { rules }
    }

    /// Registered rule for a nutrient, if any
    pub fn rule(&self, kind: NutrientKind) -> Option<&ReferenceRule> {
        self.rules
            .iter()
            .find(|(registered, _)| *registered == kind)
            .map(|(_, rule)| rule)
    }

    /// Minimum and maximum daily target for `kind`
    pub fn calculate_range(&self, kind: NutrientKind, pet: &PetPhysicalProfile) -> NutritionResult<TargetRange> {
        pet.validate()?;

        let coefficients = match self.rule(kind) {
            Some(ReferenceRule::PerKilogram(coefficients)) => *coefficients,
            Some(ReferenceRule::ActivityAdjusted(cells)) => cells
                .iter()
                .find(|c| c.activity == pet.activity && c.neutering == pet.neutering)
                .map(|c| c.coefficients)
                .ok_or(NutritionError::UnsupportedNutrient(kind))?,
            None => return Err(NutritionError::UnsupportedNutrient(kind)),
        };

        let range = coefficients.apply(pet.weight);
        debug_assert!(range.minimum <= range.maximum, "inverted range for {:?}", kind);
        Ok(range)
    }
}

/// Target range from the standard table
pub fn calculate_range(kind: NutrientKind, pet: &PetPhysicalProfile) -> NutritionResult<TargetRange> {
    STANDARD_REQUIREMENTS.calculate_range(kind, pet)
}

/// Target range for a nutrient given by display name
pub fn calculate_range_by_name(name: &str, pet: &PetPhysicalProfile) -> NutritionResult<TargetRange> {
    calculate_range(catalog::lookup(name)?, pet)
}

// ============================================================================
// Energy
// ============================================================================

/// Resting energy requirement in kcal/day: `70 * weight^0.75`
pub fn resting_energy_requirement(weight: f64) -> f64 {
    70.0 * weight.powf(0.75)
}

/// Multiplier applied to the resting requirement
pub fn energy_factor(activity: ActivityLevel, neutering: NeuteringStatus) -> f64 {
    match (activity, neutering) {
        (ActivityLevel::Low, NeuteringStatus::Neutered) => 1.2,
        (ActivityLevel::Low, NeuteringStatus::Intact) => 1.4,
        (ActivityLevel::Moderate, NeuteringStatus::Neutered) => 1.6,
        (ActivityLevel::Moderate, NeuteringStatus::Intact) => 1.8,
        (ActivityLevel::High, NeuteringStatus::Neutered) => 2.0,
        (ActivityLevel::High, NeuteringStatus::Intact) => 2.5,
    }
}

/// Recommended daily kcal for a pet
pub fn proper_kcal(pet: &PetPhysicalProfile) -> NutritionResult<f64> {
    pet.validate()?;
    Ok(resting_energy_requirement(pet.weight) * energy_factor(pet.activity, pet.neutering))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn pet(weight: f64, activity: ActivityLevel, neutering: NeuteringStatus) -> PetPhysicalProfile {
        PetPhysicalProfile::new(weight, activity, neutering).unwrap()
    }

    #[test]
    fn test_carbohydrate_moderate_neutered() {
        let range = calculate_range(
            NutrientKind::Carbohydrate,
            &pet(10.0, ActivityLevel::Moderate, NeuteringStatus::Neutered),
        )
        .unwrap();
        assert!((range.minimum - 40.0).abs() < EPS);
        assert!((range.maximum - 80.0).abs() < EPS);

        let intact_high = calculate_range(
            NutrientKind::Carbohydrate,
            &pet(10.0, ActivityLevel::High, NeuteringStatus::Intact),
        )
        .unwrap();
        assert!((intact_high.minimum - 70.0).abs() < EPS);
        assert!((intact_high.maximum - 140.0).abs() < EPS);
        assert_ne!(range, intact_high);
    }

    #[test]
    fn test_linear_nutrients_ignore_activity() {
        let calm = pet(8.0, ActivityLevel::Low, NeuteringStatus::Neutered);
        let busy = pet(8.0, ActivityLevel::High, NeuteringStatus::Intact);
        for kind in catalog::all().iter().filter(|k| **k != NutrientKind::Carbohydrate) {
            assert_eq!(
                calculate_range(*kind, &calm).unwrap(),
                calculate_range(*kind, &busy).unwrap()
            );
        }
    }

    #[test]
    fn test_protein_per_kilogram() {
        let range = calculate_range(
            NutrientKind::Protein,
            &pet(10.0, ActivityLevel::Moderate, NeuteringStatus::Intact),
        )
        .unwrap();
        assert!((range.minimum - 26.2).abs() < EPS);
        assert!((range.maximum - 70.0).abs() < EPS);
    }

    #[test]
    fn test_minimum_never_exceeds_maximum() {
        let activities = [ActivityLevel::Low, ActivityLevel::Moderate, ActivityLevel::High];
        let statuses = [NeuteringStatus::Neutered, NeuteringStatus::Intact];
        for weight in [0.1, 1.0, 3.7, 10.0, 42.5, 90.0] {
            for activity in activities {
                for neutering in statuses {
                    let p = pet(weight, activity, neutering);
                    for kind in catalog::all() {
                        let range = calculate_range(*kind, &p).unwrap();
                        assert!(range.minimum >= 0.0);
                        assert!(range.minimum <= range.maximum, "{:?} at {}kg", kind, weight);
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let p = pet(12.3, ActivityLevel::Low, NeuteringStatus::Intact);
        for kind in catalog::all() {
            assert_eq!(calculate_range(*kind, &p), calculate_range(*kind, &p));
        }
    }

    #[test]
    fn test_invalid_weight_rejected() {
        assert!(matches!(
            PetPhysicalProfile::new(0.0, ActivityLevel::Low, NeuteringStatus::Intact),
            Err(NutritionError::InvalidProfile(_))
        ));
        assert!(PetPhysicalProfile::new(-3.0, ActivityLevel::Low, NeuteringStatus::Intact).is_err());
        assert!(PetPhysicalProfile::new(f64::NAN, ActivityLevel::Low, NeuteringStatus::Intact).is_err());

        let raw = PetPhysicalProfile {
            weight: 0.0,
            activity: ActivityLevel::High,
            neutering: NeuteringStatus::Neutered,
        };
        assert!(matches!(
            calculate_range(NutrientKind::Fat, &raw),
            Err(NutritionError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_parse_boundary_strings() {
        let p = PetPhysicalProfile::parse(5.0, "Moderate", "neutered").unwrap();
        assert_eq!(p.activity, ActivityLevel::Moderate);
        assert_eq!(p.neutering, NeuteringStatus::Neutered);

        assert_eq!("보통".parse::<ActivityLevel>(), Ok(ActivityLevel::Moderate));
        assert_eq!("false".parse::<NeuteringStatus>(), Ok(NeuteringStatus::Intact));

        assert!(matches!(
            PetPhysicalProfile::parse(5.0, "extreme", "neutered"),
            Err(NutritionError::InvalidProfile(_))
        ));
        assert!(matches!(
            PetPhysicalProfile::parse(5.0, "low", "maybe"),
            Err(NutritionError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_range_by_name() {
        let p = pet(10.0, ActivityLevel::Moderate, NeuteringStatus::Neutered);
        let range = calculate_range_by_name("탄수화물", &p).unwrap();
        assert!((range.minimum - 40.0).abs() < EPS);
        assert!(matches!(
            calculate_range_by_name("존재하지않음", &p),
            Err(NutritionError::UnknownNutrient(_))
        ));
    }

    #[test]
    fn test_unsupported_nutrient() {
        const PROTEIN_ONLY: [(NutrientKind, ReferenceRule); 1] = [(
            NutrientKind::Protein,
            ReferenceRule::PerKilogram(Coefficients::new(1.0, 2.0)),
        )];
        const LOW_NEUTERED_ONLY: [AdjustedCoefficients; 1] =
            [cell(ActivityLevel::Low, NeuteringStatus::Neutered, 1.0, 2.0)];
        const CARBOHYDRATE_GAP: [(NutrientKind, ReferenceRule); 1] = [(
            NutrientKind::Carbohydrate,
            ReferenceRule::ActivityAdjusted(&LOW_NEUTERED_ONLY),
        )];
        const PARTIAL: RequirementTable = RequirementTable::new(&PROTEIN_ONLY);
        const GAPPY: RequirementTable = RequirementTable::new(&CARBOHYDRATE_GAP);

        let p = pet(4.0, ActivityLevel::High, NeuteringStatus::Intact);
        assert!(PARTIAL.calculate_range(NutrientKind::Protein, &p).is_ok());
        assert_eq!(
            PARTIAL.calculate_range(NutrientKind::Fat, &p),
            Err(NutritionError::UnsupportedNutrient(NutrientKind::Fat))
        );
        assert_eq!(
            GAPPY.calculate_range(NutrientKind::Carbohydrate, &p),
            Err(NutritionError::UnsupportedNutrient(NutrientKind::Carbohydrate))
        );
    }

    #[test]
    fn test_standard_table_covers_catalog() {
        for kind in catalog::all() {
            assert!(STANDARD_REQUIREMENTS.rule(*kind).is_some());
        }
    }

    #[test]
    fn test_proper_kcal() {
        // 70 * 16^0.75 = 560
        let p = pet(16.0, ActivityLevel::Moderate, NeuteringStatus::Neutered);
        assert!((proper_kcal(&p).unwrap() - 560.0 * 1.6).abs() < 1e-6);

        let intact = pet(16.0, ActivityLevel::Moderate, NeuteringStatus::Intact);
        assert!(proper_kcal(&intact).unwrap() > proper_kcal(&p).unwrap());
    }
}
