//! Recommendation matcher
//!
//! For every requested nutrient the store is queried with each subset of the
//! request that contains it, largest subsets first, so products covering more
//! of what was asked for come before single-nutrient products. Within a
//! nutrient's list a product appears once, at its first (most targeted) hit.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::SupplementProduct;
use crate::nutrition::{self, NutrientKind};
use crate::providers::{DailyIntakeProvider, PetProfileProvider, ProductStore};

use super::RecommendResult;

/// Products recommended for one nutrient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientRecommendation {
    pub nutrient: NutrientKind,
    pub nutrient_name: String,
    pub products: Vec<SupplementProduct>,
}

/// Issues product store queries and assembles ranked results
pub struct RecommendationMatcher<'a, S: ProductStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ProductStore + ?Sized> RecommendationMatcher<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Products tagged with the named nutrient
    pub fn find_by_nutrient_name(&self, name: &str) -> RecommendResult<Vec<SupplementProduct>> {
        let kind = nutrition::lookup(name)?;
        Ok(self.store.find_products_by_nutrient(kind)?)
    }

    /// One recommendation per distinct name, in request order
    ///
    /// Every name is resolved before the store is queried, so one unknown
    /// name fails the whole call.
    pub fn find_by_nutrient_names<N: AsRef<str>>(
        &self,
        names: &[N],
    ) -> RecommendResult<Vec<NutrientRecommendation>> {
        let mut kinds: Vec<NutrientKind> = Vec::with_capacity(names.len());
        for name in names {
            let kind = nutrition::lookup(name.as_ref())?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        let requested: BTreeSet<NutrientKind> = kinds.iter().copied().collect();
        kinds
            .into_iter()
            .map(|kind| {
                Ok(NutrientRecommendation {
                    nutrient: kind,
                    nutrient_name: kind.name().to_string(),
                    products: self.ranked_products(kind, &requested)?,
                })
            })
            .collect()
    }

    /// Recommendations for every nutrient the pet was short on that day
    ///
    /// Keys follow catalog order; a nutrient without matching products is
    /// kept with an empty list.
    pub fn find_by_deficient_nutrients<P, I>(
        &self,
        pets: &P,
        intakes: &I,
        pet_id: i64,
        date: NaiveDate,
    ) -> RecommendResult<Vec<NutrientRecommendation>>
    where
        P: PetProfileProvider + ?Sized,
        I: DailyIntakeProvider + ?Sized,
    {
        let pet = pets.get_profile(pet_id)?;
        let intake = intakes.get_intake(pet_id, date)?;
        let deficient = nutrition::find_deficient(&intake, &pet)?;

        debug!(pet_id, %date, count = deficient.len(), "Recommending for deficient nutrients");

        let names: Vec<&str> = deficient.iter().map(|kind| kind.name()).collect();
        self.find_by_nutrient_names(&names)
    }

    fn ranked_products(
        &self,
        kind: NutrientKind,
        requested: &BTreeSet<NutrientKind>,
    ) -> RecommendResult<Vec<SupplementProduct>> {
        let mut seen = HashSet::new();
        let mut products = Vec::new();

        for combination in combinations_containing(kind, requested) {
            debug!(nutrient = kind.as_key(), size = combination.len(), "Querying product combination");
            for product in self.store.find_products_by_nutrient_combination(&combination)? {
                if seen.insert(product.id) {
                    products.push(product);
                }
            }
        }

        Ok(products)
    }
}

/// Subsets of `requested` that contain `kind`, largest first, equal sizes in catalog order
fn combinations_containing(
    kind: NutrientKind,
    requested: &BTreeSet<NutrientKind>,
) -> Vec<BTreeSet<NutrientKind>> {
    let others: Vec<NutrientKind> = requested.iter().copied().filter(|k| *k != kind).collect();

    let mut subsets: Vec<BTreeSet<NutrientKind>> = (0..1usize << others.len())
        .map(|mask| {
            let mut subset: BTreeSet<NutrientKind> = others
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, k)| *k)
                .collect();
            subset.insert(kind);
            subset
        })
        .collect();

    subsets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    subsets
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::models::NutrientProfile;
    use crate::nutrition::{ActivityLevel, NeuteringStatus, NutritionError, PetPhysicalProfile};
    use crate::providers::{ProviderError, ProviderResult};
    use crate::recommend::RecommendError;

    struct FakeStore {
        products: Vec<SupplementProduct>,
        queries: RefCell<Vec<BTreeSet<NutrientKind>>>,
    }

    impl FakeStore {
        fn new(products: Vec<SupplementProduct>) -> Self {
            Self { products, queries: RefCell::new(Vec::new()) }
        }
    }

    impl ProductStore for FakeStore {
        fn find_products_by_nutrient_combination(
            &self,
            nutrients: &BTreeSet<NutrientKind>,
        ) -> ProviderResult<Vec<SupplementProduct>> {
            self.queries.borrow_mut().push(nutrients.clone());
            let mut matches: Vec<SupplementProduct> = self
                .products
                .iter()
                .filter(|p| nutrients.is_subset(&p.nutrients))
                .cloned()
                .collect();
            matches.sort_by(|a, b| b.nutrients.len().cmp(&a.nutrients.len()).then(a.id.cmp(&b.id)));
            Ok(matches)
        }
    }

    struct FakePets(Option<PetPhysicalProfile>);

    impl PetProfileProvider for FakePets {
        fn get_profile(&self, pet_id: i64) -> ProviderResult<PetPhysicalProfile> {
            self.0.ok_or(ProviderError::PetNotFound(pet_id))
        }
    }

    struct FakeIntake(Option<NutrientProfile>);

    impl DailyIntakeProvider for FakeIntake {
        fn get_intake(&self, pet_id: i64, date: NaiveDate) -> ProviderResult<NutrientProfile> {
            self.0.ok_or(ProviderError::NoIntakeRecorded { pet_id, date })
        }
    }

    fn product(id: i64, tags: &[NutrientKind]) -> SupplementProduct {
        SupplementProduct {
            id,
            name: format!("product-{}", id),
            english_name: None,
            vendor: None,
            url: None,
            img_path: None,
            nutrients: tags.iter().copied().collect(),
            created_at: String::new(),
        }
    }

    fn ids(products: &[SupplementProduct]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
    }

    fn pet() -> PetPhysicalProfile {
        PetPhysicalProfile::new(10.0, ActivityLevel::Moderate, NeuteringStatus::Neutered).unwrap()
    }

    /// Short on carbohydrate (min 40) and fat (min 13) only
    fn carb_and_fat_short() -> NutrientProfile {
        NutrientProfile {
            carbohydrate: 10.0,
            protein: 30.0,
            fat: 5.0,
            calcium: 2.0,
            phosphorus: 1.5,
            vitamin_a: 2000.0,
            vitamin_d: 200.0,
            vitamin_e: 20.0,
        }
    }

    #[test]
    fn test_find_by_nutrient_name() {
        let store = FakeStore::new(vec![
            product(1, &[NutrientKind::Calcium]),
            product(2, &[NutrientKind::Fat]),
            product(3, &[NutrientKind::Calcium, NutrientKind::VitaminD]),
        ]);
        let matcher = RecommendationMatcher::new(&store);

        let found = matcher.find_by_nutrient_name("칼슘").unwrap();
        assert_eq!(ids(&found), vec![3, 1]);
    }

    #[test]
    fn test_combination_products_rank_first() {
        let store = FakeStore::new(vec![
            product(1, &[NutrientKind::Calcium]),
            product(2, &[NutrientKind::Calcium, NutrientKind::Phosphorus]),
            product(3, &[NutrientKind::Phosphorus]),
        ]);
        let matcher = RecommendationMatcher::new(&store);

        let result = matcher.find_by_nutrient_names(&["인", "칼슘"]).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].nutrient, NutrientKind::Phosphorus);
        assert_eq!(ids(&result[0].products), vec![2, 3]);
        assert_eq!(result[1].nutrient, NutrientKind::Calcium);
        assert_eq!(ids(&result[1].products), vec![2, 1]);
    }

    #[test]
    fn test_query_order_is_largest_subset_first() {
        let store = FakeStore::new(Vec::new());
        let matcher = RecommendationMatcher::new(&store);

        matcher.find_by_nutrient_names(&["지방", "단백질", "칼슘"]).unwrap();

        let queries = store.queries.borrow();
        let for_fat: Vec<Vec<NutrientKind>> = queries[..4]
            .iter()
            .map(|set| set.iter().copied().collect())
            .collect();
        assert_eq!(
            for_fat,
            vec![
                vec![NutrientKind::Protein, NutrientKind::Fat, NutrientKind::Calcium],
                vec![NutrientKind::Protein, NutrientKind::Fat],
                vec![NutrientKind::Fat, NutrientKind::Calcium],
                vec![NutrientKind::Fat],
            ]
        );
        assert_eq!(queries.len(), 12);
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let store = FakeStore::new(vec![product(1, &[NutrientKind::Fat])]);
        let matcher = RecommendationMatcher::new(&store);

        let result = matcher.find_by_nutrient_names(&["지방", "지방"]).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(ids(&result[0].products), vec![1]);
    }

    #[test]
    fn test_unknown_name_fails_whole_call() {
        let store = FakeStore::new(vec![product(1, &[NutrientKind::Carbohydrate])]);
        let matcher = RecommendationMatcher::new(&store);

        let err = matcher.find_by_nutrient_names(&["탄수화물", "존재하지않음"]).unwrap_err();
        assert!(matches!(
            err,
            RecommendError::Nutrition(NutritionError::UnknownNutrient(ref name)) if name == "존재하지않음"
        ));
        assert!(store.queries.borrow().is_empty());
    }

    #[test]
    fn test_deficient_nutrients_keep_empty_results() {
        let store = FakeStore::new(vec![product(7, &[NutrientKind::Carbohydrate])]);
        let matcher = RecommendationMatcher::new(&store);

        let result = matcher
            .find_by_deficient_nutrients(
                &FakePets(Some(pet())),
                &FakeIntake(Some(carb_and_fat_short())),
                1,
                day(),
            )
            .unwrap();

        let keys: Vec<NutrientKind> = result.iter().map(|r| r.nutrient).collect();
        assert_eq!(keys, vec![NutrientKind::Carbohydrate, NutrientKind::Fat]);
        assert_eq!(result[0].nutrient_name, "탄수화물");
        assert_eq!(ids(&result[0].products), vec![7]);
        assert!(result[1].products.is_empty());
    }

    #[test]
    fn test_deficient_nutrients_pass_through_provider_errors() {
        let store = FakeStore::new(Vec::new());
        let matcher = RecommendationMatcher::new(&store);

        let missing_pet = matcher.find_by_deficient_nutrients(&FakePets(None), &FakeIntake(None), 5, day());
        assert!(matches!(missing_pet, Err(RecommendError::Provider(ProviderError::PetNotFound(5)))));

        let missing_day = matcher.find_by_deficient_nutrients(&FakePets(Some(pet())), &FakeIntake(None), 5, day());
        assert!(matches!(
            missing_day,
            Err(RecommendError::Provider(ProviderError::NoIntakeRecorded { pet_id: 5, .. }))
        ));
    }

    #[test]
    fn test_nothing_deficient_gives_empty_result() {
        let store = FakeStore::new(Vec::new());
        let matcher = RecommendationMatcher::new(&store);
        let plenty = carb_and_fat_short() + NutrientProfile { carbohydrate: 50.0, fat: 20.0, ..Default::default() };

        let result = matcher
            .find_by_deficient_nutrients(&FakePets(Some(pet())), &FakeIntake(Some(plenty)), 1, day())
            .unwrap();
        assert!(result.is_empty());
    }
}
