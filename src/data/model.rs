use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Family label substituted when a record carries none.
pub const UNKNOWN_FAMILY: &str = "Unknown";

/// Category reported for feature keys without a `": "` separator.
pub const OTHER_CATEGORY: &str = "Other";

// ---------------------------------------------------------------------------
// FeatureKey – parsed "<Category>: <FeatureName>" composite key
// ---------------------------------------------------------------------------

/// A feature key split into its category and feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKey<'a> {
    /// `"Phonology: Tone System"` → category `Phonology`, feature `Tone System`.
    Categorized { category: &'a str, feature: &'a str },
    /// No separator: the whole key is the feature name under [`OTHER_CATEGORY`].
    Uncategorized(&'a str),
}

impl<'a> FeatureKey<'a> {
    /// Split on the first `": "`.
    pub fn parse(key: &'a str) -> Self {
        match key.split_once(": ") {
            Some((category, feature)) => FeatureKey::Categorized { category, feature },
            None => FeatureKey::Uncategorized(key),
        }
    }

    pub fn category(&self) -> &'a str {
        match self {
            FeatureKey::Categorized { category, .. } => category,
            FeatureKey::Uncategorized(_) => OTHER_CATEGORY,
        }
    }

    pub fn feature(&self) -> &'a str {
        match self {
            FeatureKey::Categorized { feature, .. } => feature,
            FeatureKey::Uncategorized(key) => key,
        }
    }
}

impl fmt::Display for FeatureKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Categorized { category, feature } => write!(f, "{category}: {feature}"),
            FeatureKey::Uncategorized(key) => write!(f, "{key}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Language – one record of the collection
// ---------------------------------------------------------------------------

/// A single language record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    #[serde(default = "unknown_family")]
    pub family: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macroarea: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speakers: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "genera")]
    pub genus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Composite feature key → display value.
    #[serde(default, deserialize_with = "features_as_display_strings")]
    pub features: BTreeMap<String, String>,
}

fn unknown_family() -> String {
    UNKNOWN_FAMILY.to_string()
}

/// Accept any JSON value as a feature value and keep its display form.
fn features_as_display_strings<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, display_value(&value)))
        .collect())
}

/// Display form of a loosely typed source value. `null` becomes empty.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Language {
    /// Family label with empty strings folded into [`UNKNOWN_FAMILY`].
    pub fn family_label(&self) -> &str {
        if self.family.trim().is_empty() {
            UNKNOWN_FAMILY
        } else {
            &self.family
        }
    }

    /// Iterate features with their keys parsed.
    pub fn parsed_features(&self) -> impl Iterator<Item = (FeatureKey<'_>, &str)> {
        self.features
            .iter()
            .map(|(key, value)| (FeatureKey::parse(key), value.as_str()))
    }

    /// Look up a feature value by category and feature name.
    pub fn feature(&self, category: &str, feature: &str) -> Option<&str> {
        self.features
            .get(&format!("{category}: {feature}"))
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Atlas – the complete loaded collection
// ---------------------------------------------------------------------------

/// The full loaded collection with a pre-computed family index.
///
/// Created once per load and never mutated; filtered views are index lists.
#[derive(Debug, Clone, Default)]
pub struct Atlas {
    pub languages: Vec<Language>,
    /// Sorted unique family labels.
    pub families: Vec<String>,
}

impl Atlas {
    pub fn from_languages(languages: Vec<Language>) -> Self {
        let families: BTreeSet<String> = languages
            .iter()
            .map(|lang| lang.family_label().to_string())
            .collect();
        Atlas {
            languages,
            families: families.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Language> {
        self.languages.get(idx)
    }

    /// Position of the language with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.languages.iter().position(|lang| lang.id == id)
    }

    /// Resolve a list of indices into language references, skipping stale ones.
    pub fn select<'a>(&'a self, indices: &'a [usize]) -> impl Iterator<Item = &'a Language> + 'a {
        indices.iter().filter_map(move |&i| self.languages.get(i))
    }

    /// Members of a family, in collection order.
    pub fn family_members(&self, family: &str) -> Vec<&Language> {
        self.languages
            .iter()
            .filter(|lang| lang.family_label() == family)
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Language;

    /// Minimal record for tests.
    pub fn lang(id: &str, family: &str, lat: f64, lon: f64) -> Language {
        Language {
            id: id.to_string(),
            name: format!("Language {id}"),
            family: family.to_string(),
            latitude: lat,
            longitude: lon,
            macroarea: None,
            speakers: None,
            iso_code: None,
            genus: None,
            country_code: None,
            features: Default::default(),
        }
    }

    pub fn with_features(mut language: Language, features: &[(&str, &str)]) -> Language {
        for (k, v) in features {
            language.features.insert(k.to_string(), v.to_string());
        }
        language
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::lang;
    use super::*;

    #[test]
    fn feature_key_splits_on_first_separator() {
        let key = FeatureKey::parse("Word Order: Order of Subject: Object and Verb");
        assert_eq!(key.category(), "Word Order");
        assert_eq!(key.feature(), "Order of Subject: Object and Verb");
    }

    #[test]
    fn feature_key_without_separator_is_other() {
        let key = FeatureKey::parse("Tone");
        assert_eq!(key, FeatureKey::Uncategorized("Tone"));
        assert_eq!(key.category(), OTHER_CATEGORY);
        assert_eq!(key.feature(), "Tone");
    }

    #[test]
    fn json_record_defaults_missing_family() {
        let json = r#"{"id":"x","name":"X","latitude":1.0,"longitude":2.0,"isoCode":"xxx"}"#;
        let language: Language = serde_json::from_str(json).unwrap();
        assert_eq!(language.family, UNKNOWN_FAMILY);
        assert_eq!(language.iso_code.as_deref(), Some("xxx"));
        assert!(language.features.is_empty());
    }

    #[test]
    fn non_string_feature_values_become_display_strings() {
        let json = r#"{"id":"x","name":"X","latitude":0,"longitude":0,
            "features":{"Phonology: Vowels":5,"Other: Flag":true,"Lexicon: Gap":null}}"#;
        let language: Language = serde_json::from_str(json).unwrap();
        assert_eq!(language.features["Phonology: Vowels"], "5");
        assert_eq!(language.features["Other: Flag"], "true");
        assert_eq!(language.features["Lexicon: Gap"], "");
    }

    #[test]
    fn atlas_collects_sorted_families() {
        let atlas = Atlas::from_languages(vec![
            lang("a", "Uralic", 0.0, 0.0),
            lang("b", "", 0.0, 0.0),
            lang("c", "Indo-European", 0.0, 0.0),
            lang("d", "Uralic", 0.0, 0.0),
        ]);
        assert_eq!(atlas.families, vec!["Indo-European", "Unknown", "Uralic"]);
        assert_eq!(atlas.index_of("c"), Some(2));
        assert_eq!(atlas.family_members("Uralic").len(), 2);
    }
}
