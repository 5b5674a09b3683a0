//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
    }

    debug_assert!(get_schema_version(conn)? == SCHEMA_VERSION);
    Ok(())
}

/// Highest applied schema version (0 for a fresh database)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PETS
        -- Physical profile used for requirement targets
        -- ============================================
        CREATE TABLE pets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            age INTEGER NOT NULL DEFAULT 0,
            weight REAL NOT NULL CHECK(weight > 0),          -- kilograms
            activity TEXT NOT NULL CHECK(activity IN ('low', 'moderate', 'high')),
            neutering TEXT NOT NULL CHECK(neutering IN ('neutered', 'intact')),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- FOOD ITEMS
        -- Nutrient content per standard amount (grams)
        -- ============================================
        CREATE TABLE food_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            standard_amount REAL NOT NULL CHECK(standard_amount > 0),
            kcal REAL NOT NULL DEFAULT 0,
            carbohydrate REAL NOT NULL DEFAULT 0,   -- grams
            protein REAL NOT NULL DEFAULT 0,        -- grams
            fat REAL NOT NULL DEFAULT 0,            -- grams
            calcium REAL NOT NULL DEFAULT 0,        -- grams
            phosphorus REAL NOT NULL DEFAULT 0,     -- grams
            vitamin_a REAL NOT NULL DEFAULT 0,      -- IU
            vitamin_d REAL NOT NULL DEFAULT 0,      -- IU
            vitamin_e REAL NOT NULL DEFAULT 0,      -- IU
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_food_items_name ON food_items(name);

        -- ============================================
        -- DAILY MEALS
        -- One row per pet per day with cached totals
        -- ============================================
        CREATE TABLE daily_meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pet_id INTEGER NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
            date TEXT NOT NULL,                     -- ISO date: YYYY-MM-DD
            cached_kcal REAL NOT NULL DEFAULT 0,
            cached_carbohydrate REAL NOT NULL DEFAULT 0,
            cached_protein REAL NOT NULL DEFAULT 0,
            cached_fat REAL NOT NULL DEFAULT 0,
            cached_calcium REAL NOT NULL DEFAULT 0,
            cached_phosphorus REAL NOT NULL DEFAULT 0,
            cached_vitamin_a REAL NOT NULL DEFAULT 0,
            cached_vitamin_d REAL NOT NULL DEFAULT 0,
            cached_vitamin_e REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(pet_id, date)
        );

        -- ============================================
        -- MEAL ENTRIES
        -- Food eaten on a day, amount in grams
        -- ============================================
        CREATE TABLE meal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            daily_meal_id INTEGER NOT NULL REFERENCES daily_meals(id) ON DELETE CASCADE,
            food_item_id INTEGER NOT NULL REFERENCES food_items(id) ON DELETE RESTRICT,
            amount REAL NOT NULL CHECK(amount > 0),
            cached_kcal REAL NOT NULL DEFAULT 0,
            cached_carbohydrate REAL NOT NULL DEFAULT 0,
            cached_protein REAL NOT NULL DEFAULT 0,
            cached_fat REAL NOT NULL DEFAULT 0,
            cached_calcium REAL NOT NULL DEFAULT 0,
            cached_phosphorus REAL NOT NULL DEFAULT 0,
            cached_vitamin_a REAL NOT NULL DEFAULT 0,
            cached_vitamin_d REAL NOT NULL DEFAULT 0,
            cached_vitamin_e REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meal_entries_daily_meal ON meal_entries(daily_meal_id);

        -- ============================================
        -- SUPPLEMENTS
        -- Products and the nutrients they are tagged with
        -- ============================================
        CREATE TABLE supplements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            english_name TEXT,
            vendor TEXT,
            url TEXT,
            img_path TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE supplement_nutrients (
            supplement_id INTEGER NOT NULL REFERENCES supplements(id) ON DELETE CASCADE,
            nutrient TEXT NOT NULL,                 -- NutrientKind storage key
            PRIMARY KEY (supplement_id, nutrient)
        );

        CREATE INDEX idx_supplement_nutrients_nutrient ON supplement_nutrients(nutrient);
        "#,
    )?;

    Ok(())
}

/// Migration v2: allergies and diseases attached to pets
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE medical_conditions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL CHECK(kind IN ('allergy', 'disease')),
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(kind, name)
        );

        CREATE TABLE pet_conditions (
            pet_id INTEGER NOT NULL REFERENCES pets(id) ON DELETE CASCADE,
            condition_id INTEGER NOT NULL REFERENCES medical_conditions(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (pet_id, condition_id)
        );
        "#,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_v1_database_upgrades() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", []).unwrap();

        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 2);
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'pet_conditions'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
