//! Load a demo supplement catalog into the database
//!
//! Skips seeding when any supplement already exists.

use std::collections::BTreeSet;

use petplate::config;
use petplate::db::Database;
use petplate::models::{SupplementCreate, SupplementProduct};
use petplate::nutrition::{self, NutrientKind};

/// (name, english name, vendor, nutrient display names)
const DEMO_SUPPLEMENTS: &[(&str, &str, &str, &[&str])] = &[
    ("오메가 플러스", "Omega Plus", "PetLab", &["지방", "비타민 E"]),
    ("본 케어", "Bone Care", "PetLab", &["칼슘", "인", "비타민 D"]),
    ("칼슘 츄", "Calcium Chew", "Happy Paws", &["칼슘"]),
    ("프로틴 파우더", "Protein Powder", "Happy Paws", &["단백질"]),
    ("에너지 믹스", "Energy Mix", "NutriPet", &["탄수화물", "단백질", "지방"]),
    ("멀티 비타민", "Multi Vitamin", "NutriPet", &["비타민 A", "비타민 D", "비타민 E"]),
    ("라이스 부스트", "Rice Boost", "NutriPet", &["탄수화물"]),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());

    let database = Database::open(&db_path)?;

    let existing = database.with_conn(|conn| SupplementProduct::list(conn, 1, 0))?;
    if !existing.is_empty() {
        println!("Supplements already present, nothing to do");
        return Ok(());
    }

    for (name, english_name, vendor, tags) in DEMO_SUPPLEMENTS {
        let nutrients = tags
            .iter()
            .map(|tag| nutrition::lookup(tag))
            .collect::<Result<BTreeSet<NutrientKind>, _>>()?;

        let data = SupplementCreate {
            name: name.to_string(),
            english_name: Some(english_name.to_string()),
            vendor: Some(vendor.to_string()),
            nutrients,
            ..Default::default()
        };
        let product = database.with_conn_mut(|conn| SupplementProduct::create(conn, &data))?;
        println!("  #{} {} ({} nutrients)", product.id, product.name, product.nutrients.len());
    }

    println!("Seeded {} supplements", DEMO_SUPPLEMENTS.len());
    Ok(())
}
