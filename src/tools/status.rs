//! PetPlate status tool
//!
//! Runtime status plus the usage guide handed to assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;

/// Usage guide for AI assistants
pub const USAGE_INSTRUCTIONS: &str = r#"
# PetPlate Usage Guide

PetPlate tracks what a pet eats each day and compares it with daily targets
derived from the pet's weight, activity level and neutering status.

## 1. Register the pet

`register_pet` takes name, age (years), weight (kg), activity
(`low` | `moderate` | `high`, or 낮음 | 보통 | 높음) and neutering
(`neutered` | `intact`). Update weight regularly with `update_pet`; every
target scales with it.

Allergies and diseases live in a shared catalog (`add_medical_condition`,
`list_medical_conditions`); attach them with `add_pet_condition` and read them
back with `list_pet_conditions`.

## 2. Foods

Foods store kcal and nutrients per `standard_amount` grams (usually 100).
Search before adding: `search_food_items`, or `get_food_item_by_name` for an
exact name. Names are unique. `delete_food_item` only removes foods that no
logged meal uses.

Nutrient fields: carbohydrate, protein, fat, calcium, phosphorus (grams),
vitamin_a, vitamin_d, vitamin_e (IU).

## 3. Log meals

`log_meal` with pet_id, date (YYYY-MM-DD), food_item_id and amount in grams.
The day's totals are recalculated on every log or delete; deleting a day's
last entry removes the day, so it reads as "no intake recorded".

## 4. Analyse a day

- `nutrient_report`: every nutrient with actual, minimum, maximum, ratio and status
- `nutrient_ratios`: actual / minimum per nutrient
- `deficient_nutrients`: below minimum
- `sufficient_nutrients`: ABOVE MAXIMUM (excess), not merely adequate
- `nutrient_extremes`: most deficient and most excessive nutrient
- `kcal_report`: proper kcal, consumed kcal and their ratio

## 5. Supplements

`recommend_for_deficiencies` looks up the day's deficient nutrients and returns
products per nutrient in catalog order. A nutrient with no products is still
listed with an empty list. Products tagged with several requested nutrients
rank ahead of single-nutrient products.

Nutrient names are the catalog's Korean display names: 탄수화물, 단백질, 지방,
칼슘, 인, 비타민 A, 비타민 D, 비타민 E (see `list_nutrients`).
"#;

/// Status response
#[derive(Debug, Clone, Serialize)]
pub struct PetPlateStatus {
    pub name: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
    pub version: &'static str,

    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,

    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Collects runtime information since server start
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, database: &Database) -> PetPlateStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());
        let schema_version = database.schema_version().ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));
        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PetPlateStatus {
            name: build_info.name,
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            build_profile: build_info.profile,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
