//! Single-language read-outs for the analysis window and the category guide.

use super::model::Language;

/// Categories shown as "key features", at most one feature each.
const IMPORTANT_CATEGORIES: &[&str] = &[
    "Phonology",
    "Morphology",
    "Nominal Categories",
    "Nominal Syntax",
    "Word Order",
    "Simple Clauses",
    "Complex Sentences",
    "Lexicon",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFeature<'a> {
    pub category: &'a str,
    pub name: &'a str,
    pub value: &'a str,
}

/// The first feature of each important category, in key order.
pub fn key_features(language: &Language) -> Vec<KeyFeature<'_>> {
    let mut out: Vec<KeyFeature<'_>> = Vec::new();
    for (key, value) in language.parsed_features() {
        let category = key.category();
        if IMPORTANT_CATEGORIES.contains(&category) && !out.iter().any(|f| f.category == category) {
            out.push(KeyFeature {
                category,
                name: key.feature(),
                value,
            });
        }
    }
    out
}

/// Short descriptive sentences about a language.
pub fn insights(language: &Language) -> Vec<String> {
    let mut out = vec![format!(
        "{} belongs to the {} language family.",
        language.name,
        language.family_label()
    )];

    let word_order = language
        .features
        .iter()
        .find(|(key, _)| key.contains("Word Order") && key.contains("Order of Subject"));
    if let Some((_, order)) = word_order {
        out.push(format!("This language uses {order} word order."));
    }

    out.push(format!(
        "Primarily spoken in {}.",
        language
            .macroarea
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or("its geographic region")
    ));
    out
}

/// A category definition with a few example values.
pub struct CategoryGuide {
    pub category: &'static str,
    pub definition: &'static str,
    pub examples: &'static [(&'static str, &'static str)],
}

pub fn category_guide() -> &'static [CategoryGuide] {
    &[
        CategoryGuide {
            category: "Phonology",
            definition: "The sound systems of languages: inventories and structure of sounds.",
            examples: &[
                ("Small", "A small set of vowel or consonant sounds (5 or fewer vowels)."),
                ("Large", "More than 7 vowel sounds or complex consonant inventories."),
                ("Simple", "Very basic, limited variety in the set of sounds."),
            ],
        },
        CategoryGuide {
            category: "Word Order",
            definition: "The typical arrangement of subject, verb and object in sentences.",
            examples: &[
                ("SVO", "Subject-Verb-Object (English: 'She sees the dog')."),
                ("SOV", "Subject-Object-Verb (Japanese: 'She the dog sees')."),
                ("VSO", "Verb-Subject-Object (Classical Arabic: 'Sees she the dog')."),
            ],
        },
        CategoryGuide {
            category: "Morphology",
            definition: "How words are formed and how they change for grammatical reasons.",
            examples: &[
                ("Isolating", "Words tend to be single morphemes with little change."),
                ("Agglutinating", "Morphemes strung together, one function each."),
                ("Fusional", "One morpheme may express several grammatical features."),
            ],
        },
        CategoryGuide {
            category: "Verbal Categories",
            definition: "Grammatical features of verbs such as tense, aspect and mood.",
            examples: &[
                ("Tense", "Indicates time (past, present, future)."),
                ("Aspect", "Shows whether an action is completed or ongoing."),
                ("Mood", "Expresses attitude such as necessity or possibility."),
            ],
        },
        CategoryGuide {
            category: "Simple Clauses",
            definition: "Structure of basic sentences: negation, questions, argument marking.",
            examples: &[
                ("Negative", "How negation is expressed."),
                ("Question Particle", "Use of particles to mark questions."),
            ],
        },
        CategoryGuide {
            category: "Nominal Categories",
            definition: "Properties expressed within noun phrases, like gender, case and number.",
            examples: &[
                ("Gender", "Whether nouns fall into classes such as masculine and feminine."),
                ("Case", "Inflections marking subject, object and other roles."),
                ("Plural", "Whether and how plurality is shown."),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{lang, with_features};

    #[test]
    fn one_key_feature_per_category() {
        let l = with_features(
            lang("a", "Indo-European", 0.0, 0.0),
            &[
                ("Phonology: Consonant Inventory", "Average"),
                ("Phonology: Tone System", "No tones"),
                ("Verbal Categories: Perfective/Imperfective Aspect", "Grammatical marking"),
                ("Word Order: Order of Subject, Object and Verb", "SVO"),
            ],
        );
        let features = key_features(&l);
        let cats: Vec<&str> = features.iter().map(|f| f.category).collect();
        assert_eq!(cats, vec!["Phonology", "Word Order"]);
        assert_eq!(features[0].name, "Consonant Inventory");
    }

    #[test]
    fn insights_mention_word_order_and_region() {
        let mut l = with_features(
            lang("a", "Uralic", 0.0, 0.0),
            &[("Word Order: Order of Subject, Object and Verb", "SOV")],
        );
        l.macroarea = Some("Europe".into());
        let lines = insights(&l);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("SOV"));
        assert!(lines[2].contains("Europe"));
    }

    #[test]
    fn insights_without_features() {
        let lines = insights(&lang("a", "Uralic", 0.0, 0.0));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("its geographic region"));
    }
}
