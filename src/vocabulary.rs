//! Plant vocabulary and the label filter built on it.
//!
//! Matching is a case-insensitive substring test with no word boundaries:
//! "apple" matches "pineapple" and "custard_apple".  Classification fixtures
//! depend on that exact behaviour.

use std::collections::BTreeSet;

const CATEGORIES: &[&str] = &[
    // flowers
    "daisy", "sunflower", "rose", "tulip", "orchid", "carnation",
    "lily", "daffodil", "marigold", "petunia", "pansy", "dandelion",
    "hibiscus", "jasmine", "lavender", "lotus", "magnolia", "peony",
    // trees and shrubs
    "oak", "pine", "maple", "birch", "willow", "palm", "cedar",
    "spruce", "fir", "hemlock", "juniper", "redwood", "sequoia",
    "cypress", "eucalyptus", "chestnut", "hazel", "olive",
    // fruit and vegetables
    "apple", "orange", "banana", "grape", "strawberry", "melon",
    "pumpkin", "cucumber", "pepper", "tomato", "potato", "carrot",
    "corn", "eggplant", "zucchini", "cabbage", "lettuce", "spinach",
    // specific plants
    "cactus", "fern", "moss", "algae", "ivy", "bamboo", "reed",
    "sage", "thyme", "rosemary", "mint", "basil", "parsley",
    // general terms
    "plant", "tree", "flower", "leaf", "herb", "shrub", "vine",
    "grass", "fungus", "vegetable", "fruit", "berry", "seed",
    "blossom", "foliage", "greenery", "flora", "weed", "bush",
];

const KEYWORDS: &[&str] = &[
    "plant", "tree", "flower", "leaf", "herb", "shrub",
    "fern", "cactus", "palm", "vine", "grass", "moss",
    "algae", "fungus", "vegetable", "fruit", "berry",
    "seed", "blossom", "foliage", "greenery", "flora",
];

/// Immutable set of plant-indicative category names plus an ordered keyword
/// list.  Built once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct PlantVocabulary {
    categories: BTreeSet<String>,
    keywords: Vec<String>,
}

impl PlantVocabulary {
    pub fn new<C, K>(categories: C, keywords: K) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        PlantVocabulary {
            categories: categories.into_iter().map(|c| c.into().to_lowercase()).collect(),
            keywords: keywords.into_iter().map(|k| k.into().to_lowercase()).collect(),
        }
    }

    /// Returns true when `label` contains any category or keyword, ignoring case.
    pub fn is_plant_category(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.categories.iter().any(|c| label.contains(c.as_str()))
            || self.keywords.iter().any(|k| label.contains(k.as_str()))
    }

    /// Number of distinct categories (reported by `/model-info`).
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

impl Default for PlantVocabulary {
    fn default() -> Self {
        PlantVocabulary::new(CATEGORIES.iter().copied(), KEYWORDS.iter().copied())
    }
}
