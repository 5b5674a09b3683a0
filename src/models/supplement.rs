//! Supplement model
//!
//! Supplement products and the catalog nutrients each one is tagged with.

use std::collections::BTreeSet;

use rusqlite::{params, Connection, Row, ToSql};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::NutrientKind;

/// A supplement product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementProduct {
    pub id: i64,
    pub name: String,
    pub english_name: Option<String>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub img_path: Option<String>,
    pub nutrients: BTreeSet<NutrientKind>,
    pub created_at: String,
}

/// Data for adding a supplement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplementCreate {
    pub name: String,
    pub english_name: Option<String>,
    pub vendor: Option<String>,
    pub url: Option<String>,
    pub img_path: Option<String>,
    pub nutrients: BTreeSet<NutrientKind>,
}

impl SupplementProduct {
    /// Product columns only; tags are loaded separately
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            english_name: row.get("english_name")?,
            vendor: row.get("vendor")?,
            url: row.get("url")?,
            img_path: row.get("img_path")?,
            nutrients: BTreeSet::new(),
            created_at: row.get("created_at")?,
        })
    }

    fn load_tags(conn: &Connection, id: i64) -> DbResult<BTreeSet<NutrientKind>> {
        let mut stmt = conn.prepare("SELECT nutrient FROM supplement_nutrients WHERE supplement_id = ?1")?;
        let keys = stmt
            .query_map([id], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        keys.iter()
            .map(|key| {
                NutrientKind::from_key(key)
                    .ok_or_else(|| DbError::Invalid(format!("unknown nutrient tag '{}' on supplement {}", key, id)))
            })
            .collect()
    }

    fn with_tags(conn: &Connection, mut products: Vec<Self>) -> DbResult<Vec<Self>> {
        for product in &mut products {
            product.nutrients = Self::load_tags(conn, product.id)?;
        }
        Ok(products)
    }

    /// Insert a product and its nutrient tags in one transaction
    pub fn create(conn: &mut Connection, data: &SupplementCreate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(DbError::Invalid("supplement name cannot be empty".to_string()));
        }

        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO supplements (name, english_name, vendor, url, img_path)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![data.name, data.english_name, data.vendor, data.url, data.img_path],
        )?;
        let id = tx.last_insert_rowid();

        for kind in &data.nutrients {
            tx.execute(
                "INSERT INTO supplement_nutrients (supplement_id, nutrient) VALUES (?1, ?2)",
                params![id, kind.as_key()],
            )?;
        }
        tx.commit()?;

        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("supplement {}", id)))
    }

    /// Get a supplement with its tags
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM supplements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(mut product) => {
                product.nutrients = Self::load_tags(conn, id)?;
                Ok(Some(product))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List supplements by id
    pub fn list(conn: &Connection, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM supplements ORDER BY id LIMIT ?1 OFFSET ?2")?;
        let products = stmt
            .query_map(params![limit, offset], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_tags(conn, products)
    }

    /// Products tagged with every nutrient in `nutrients`
    ///
    /// Ordered by total tag count (most first), then id. An empty set matches nothing.
    pub fn find_by_nutrients(conn: &Connection, nutrients: &BTreeSet<NutrientKind>) -> DbResult<Vec<Self>> {
        if nutrients.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> = (1..=nutrients.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            r#"
            SELECT s.*,
                   (SELECT COUNT(*) FROM supplement_nutrients t WHERE t.supplement_id = s.id) AS tag_count
            FROM supplements s
            WHERE s.id IN (
                SELECT supplement_id FROM supplement_nutrients
                WHERE nutrient IN ({})
                GROUP BY supplement_id
                HAVING COUNT(DISTINCT nutrient) = ?{}
            )
            ORDER BY tag_count DESC, s.id ASC
            "#,
            placeholders.join(", "),
            nutrients.len() + 1
        );

        let keys: Vec<&'static str> = nutrients.iter().map(|kind| kind.as_key()).collect();
        let required = nutrients.len() as i64;
        let mut params_vec: Vec<&dyn ToSql> = keys.iter().map(|key| key as &dyn ToSql).collect();
        params_vec.push(&required);

        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map(params_vec.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Self::with_tags(conn, products)
    }
}
