use std::collections::BTreeMap;

use super::model::{FeatureKey, Language, OTHER_CATEGORY};

/// Categories that make it into the feature tree. Everything else is dropped.
pub const MAJOR_CATEGORIES: &[&str] = &[
    "Phonology",
    "Word Order",
    "Morphology",
    "Verbal Categories",
    "Simple Clauses",
    "Nominal Categories",
];

/// Features whose values have a natural scale, smallest first.
const KNOWN_ORDERS: &[(&str, &[&str])] = &[
    (
        "Vowel Quality Inventory",
        &[
            "Small",
            "Small (2-4)",
            "Average",
            "Medium (5-6)",
            "Moderately Large",
            "Large",
            "Large (7-14)",
            "Very Large (>14)",
            "Very large (>14)",
        ],
    ),
    ("Consonant Inventories", CONSONANT_INVENTORY_ORDER),
    ("Consonant Inventory", CONSONANT_INVENTORY_ORDER),
    (
        "Consonant-Vowel Ratio",
        &["Low", "Moderately low", "Average", "Moderately high", "High"],
    ),
    (
        "Syllable Structure",
        &["Simple", "Moderately complex", "Complex", "Highly complex"],
    ),
];

const CONSONANT_INVENTORY_ORDER: &[&str] = &[
    "Small",
    "Moderately small",
    "Average",
    "Moderately large",
    "Large",
    "Very Large",
];

/// value → languages carrying it, in input order.
pub type ValueGroups<'a> = BTreeMap<String, Vec<&'a Language>>;

/// category → feature → value → languages.
pub type FeatureTree<'a> = BTreeMap<String, BTreeMap<String, ValueGroups<'a>>>;

/// Group languages by major category, feature name and value.
pub fn build_feature_tree<'a>(
    languages: impl IntoIterator<Item = &'a Language>,
) -> FeatureTree<'a> {
    let mut tree = FeatureTree::new();
    for lang in languages {
        for (key, value) in lang.parsed_features() {
            let category = key.category();
            if !MAJOR_CATEGORIES.contains(&category) {
                continue;
            }
            tree.entry(category.to_string())
                .or_default()
                .entry(key.feature().to_string())
                .or_default()
                .entry(value.to_string())
                .or_default()
                .push(lang);
        }
    }
    tree
}

/// Declared linear order for a feature, if any.
pub fn known_order(feature: &str) -> Option<&'static [&'static str]> {
    KNOWN_ORDERS
        .iter()
        .find(|(name, _)| *name == feature)
        .map(|(_, order)| *order)
}

/// Display order for a feature's values: the declared scale first, then any
/// remaining values alphabetically.
pub fn sort_feature_values<'v, V>(feature: &str, values: &'v BTreeMap<String, V>) -> Vec<&'v str> {
    // BTreeMap keys are already alphabetical.
    let keys = values.keys().map(String::as_str);
    match known_order(feature) {
        Some(order) => {
            let mut sorted: Vec<&str> = order
                .iter()
                .filter_map(|v| values.get_key_value(*v).map(|(k, _)| k.as_str()))
                .collect();
            sorted.extend(keys.filter(|k| !order.contains(k)));
            sorted
        }
        None => keys.collect(),
    }
}

/// Count per value, largest first; ties alphabetical.
pub fn value_distribution(values: &ValueGroups<'_>) -> Vec<(String, usize)> {
    let mut dist: Vec<(String, usize)> = values
        .iter()
        .map(|(value, langs)| (value.clone(), langs.len()))
        .collect();
    dist.sort_by(|a, b| b.1.cmp(&a.1));
    dist
}

// ---------------------------------------------------------------------------
// Per-language grouping (info panel / attribute tree)
// ---------------------------------------------------------------------------

/// One feature row of a single language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// A language's features grouped by category, all categories kept.
pub fn group_features_by_category(language: &Language) -> BTreeMap<&str, Vec<FeatureEntry<'_>>> {
    let mut grouped: BTreeMap<&str, Vec<FeatureEntry<'_>>> = BTreeMap::new();
    for (key, value) in language.parsed_features() {
        let category = match key {
            FeatureKey::Categorized { category, .. } if !category.is_empty() => category,
            _ => OTHER_CATEGORY,
        };
        grouped.entry(category).or_default().push(FeatureEntry {
            name: key.feature(),
            value,
        });
    }
    grouped
}
