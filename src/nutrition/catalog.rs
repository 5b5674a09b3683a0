//! Nutrient catalog
//!
//! Static registry of every nutrient the engine tracks: identity, display
//! name, unit and description. Reference formulas live separately in
//! [`super::requirements`].

use serde::{Deserialize, Serialize};

use super::error::{NutritionError, NutritionResult};

/// Identity of a tracked nutrient
///
/// Variant order is the catalog declaration order. `Ord` follows it, so
/// ordered collections of kinds iterate in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientKind {
    Carbohydrate,
    Protein,
    Fat,
    Calcium,
    Phosphorus,
    VitaminA,
    VitaminD,
    VitaminE,
}

/// Display metadata for one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutrientInfo {
    pub kind: NutrientKind,
    pub name: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
}

/// Catalog entries in declaration order
pub const CATALOG: [NutrientInfo; 8] = [
    NutrientInfo {
        kind: NutrientKind::Carbohydrate,
        name: "탄수화물",
        unit: "g",
        description: "Primary energy source; supports gut health through dietary fibre.",
    },
    NutrientInfo {
        kind: NutrientKind::Protein,
        name: "단백질",
        unit: "g",
        description: "Builds and repairs muscle, skin, coat and enzymes.",
    },
    NutrientInfo {
        kind: NutrientKind::Fat,
        name: "지방",
        unit: "g",
        description: "Concentrated energy and carrier for fat-soluble vitamins.",
    },
    NutrientInfo {
        kind: NutrientKind::Calcium,
        name: "칼슘",
        unit: "g",
        description: "Bone and tooth formation, nerve signalling and muscle contraction.",
    },
    NutrientInfo {
        kind: NutrientKind::Phosphorus,
        name: "인",
        unit: "g",
        description: "Works with calcium for skeletal health and energy metabolism.",
    },
    NutrientInfo {
        kind: NutrientKind::VitaminA,
        name: "비타민 A",
        unit: "IU",
        description: "Vision, immune function and skin health.",
    },
    NutrientInfo {
        kind: NutrientKind::VitaminD,
        name: "비타민 D",
        unit: "IU",
        description: "Regulates calcium and phosphorus balance.",
    },
    NutrientInfo {
        kind: NutrientKind::VitaminE,
        name: "비타민 E",
        unit: "IU",
        description: "Antioxidant protecting cell membranes.",
    },
];

impl NutrientKind {
    /// Every kind, in catalog order
    pub const ALL: [NutrientKind; 8] = [
        NutrientKind::Carbohydrate,
        NutrientKind::Protein,
        NutrientKind::Fat,
        NutrientKind::Calcium,
        NutrientKind::Phosphorus,
        NutrientKind::VitaminA,
        NutrientKind::VitaminD,
        NutrientKind::VitaminE,
    ];

    /// Catalog entry for this kind
    pub fn info(&self) -> &'static NutrientInfo {
        &CATALOG[*self as usize]
    }

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    pub fn unit(&self) -> &'static str {
        self.info().unit
    }

    pub fn description(&self) -> &'static str {
        self.info().description
    }

    /// Stable storage key (never localized)
    pub fn as_key(&self) -> &'static str {
        match self {
            NutrientKind::Carbohydrate => "carbohydrate",
            NutrientKind::Protein => "protein",
            NutrientKind::Fat => "fat",
            NutrientKind::Calcium => "calcium",
            NutrientKind::Phosphorus => "phosphorus",
            NutrientKind::VitaminA => "vitamin_a",
            NutrientKind::VitaminD => "vitamin_d",
            NutrientKind::VitaminE => "vitamin_e",
        }
    }

    /// Parse a storage key written by [`NutrientKind::as_key`]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_key() == key)
    }
}

/// Resolve a display name to its nutrient kind.
///
/// Matching is exact and case-sensitive against the canonical display name.
pub fn lookup(name: &str) -> NutritionResult<NutrientKind> {
    CATALOG
        .iter()
        .find(|info| info.name == name)
        .map(|info| info.kind)
        .ok_or_else(|| NutritionError::UnknownNutrient(name.to_string()))
}

/// All catalog kinds in declaration order
pub fn all() -> &'static [NutrientKind] {
    &NutrientKind::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_matches_declaration_order() {
        for (index, kind) in NutrientKind::ALL.iter().enumerate() {
            assert_eq!(CATALOG[index].kind, *kind);
        }
    }

    #[test]
    fn test_lookup_round_trips_every_name() {
        for kind in all() {
            let resolved = lookup(kind.name()).unwrap();
            assert_eq!(resolved, *kind);
            assert_eq!(resolved.name(), kind.name());
        }
    }

    #[test]
    fn test_lookup_korean_names() {
        assert_eq!(lookup("탄수화물"), Ok(NutrientKind::Carbohydrate));
        assert_eq!(lookup("지방"), Ok(NutrientKind::Fat));
        assert_eq!(lookup("비타민 A"), Ok(NutrientKind::VitaminA));
    }

    #[test]
    fn test_lookup_unknown_name() {
        assert_eq!(
            lookup("존재하지않음"),
            Err(NutritionError::UnknownNutrient("존재하지않음".to_string()))
        );
        // No whitespace folding
        assert!(lookup("비타민A").is_err());
        assert!(lookup("carbohydrate").is_err());
    }

    #[test]
    fn test_storage_keys() {
        for kind in all() {
            assert_eq!(NutrientKind::from_key(kind.as_key()), Some(*kind));
        }
        assert_eq!(NutrientKind::from_key("vitamin_k"), None);
    }

    #[test]
    fn test_ordering_follows_catalog() {
        assert!(NutrientKind::Carbohydrate < NutrientKind::Protein);
        assert!(NutrientKind::Phosphorus < NutrientKind::VitaminA);
        assert!(NutrientKind::VitaminD < NutrientKind::VitaminE);
    }
}
