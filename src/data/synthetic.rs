//! Deterministic sample collection with WALS-like families and features.

use std::collections::BTreeMap;

use super::model::Language;

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform index in `0..n`. `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

// ---------------------------------------------------------------------------
// Reference tables
// ---------------------------------------------------------------------------

/// (name, family, lat, lon, iso)
const REAL_LANGUAGES: &[(&str, &str, f64, f64, &str)] = &[
    ("English", "Indo-European", 52.0, 0.0, "eng"),
    ("Spanish", "Indo-European", 40.0, -4.0, "spa"),
    ("Mandarin Chinese", "Sino-Tibetan", 34.0, 110.0, "cmn"),
    ("Arabic", "Afro-Asiatic", 25.0, 35.0, "ara"),
    ("Hindi", "Indo-European", 25.0, 77.0, "hin"),
    ("Bengali", "Indo-European", 24.0, 90.0, "ben"),
    ("Portuguese", "Indo-European", 38.7, -9.0, "por"),
    ("Russian", "Indo-European", 56.0, 38.0, "rus"),
    ("Japanese", "Japonic", 35.0, 135.0, "jpn"),
    ("German", "Indo-European", 52.0, 10.0, "deu"),
    ("Swahili", "Niger-Congo", -6.0, 35.0, "swh"),
    ("French", "Indo-European", 48.0, 2.0, "fra"),
    ("Korean", "Koreanic", 37.0, 127.0, "kor"),
    ("Italian", "Indo-European", 43.0, 12.0, "ita"),
    ("Turkish", "Turkic", 39.0, 35.0, "tur"),
    ("Polish", "Indo-European", 52.0, 19.0, "pol"),
    ("Ukrainian", "Indo-European", 49.0, 32.0, "ukr"),
    ("Persian", "Indo-European", 32.0, 53.0, "fas"),
    ("Thai", "Tai-Kadai", 15.0, 100.0, "tha"),
    ("Greek", "Indo-European", 39.0, 22.0, "ell"),
    ("Finnish", "Uralic", 62.0, 26.0, "fin"),
    ("Hungarian", "Uralic", 47.0, 19.0, "hun"),
    ("Vietnamese", "Austroasiatic", 16.0, 107.0, "vie"),
    ("Tagalog", "Austronesian", 14.0, 121.0, "tgl"),
    ("Yoruba", "Niger-Congo", 8.0, 4.0, "yor"),
    ("Igbo", "Niger-Congo", 6.0, 7.0, "ibo"),
    ("Zulu", "Niger-Congo", -28.0, 31.0, "zul"),
    ("Xhosa", "Niger-Congo", -32.0, 27.0, "xho"),
    ("Amharic", "Afro-Asiatic", 9.0, 38.0, "amh"),
    ("Somali", "Afro-Asiatic", 5.0, 46.0, "som"),
    ("Hausa", "Afro-Asiatic", 11.0, 8.0, "hau"),
    ("Oromo", "Afro-Asiatic", 7.0, 40.0, "orm"),
    ("Quechua", "Quechuan", -13.0, -74.0, "que"),
    ("Guarani", "Tupian", -25.0, -57.0, "grn"),
    ("Navajo", "Na-Dene", 36.0, -109.0, "nav"),
    ("Hawaiian", "Austronesian", 19.0, -155.0, "haw"),
    ("Inuktitut", "Eskimo-Aleut", 63.0, -68.0, "iku"),
    ("Maori", "Austronesian", -40.0, 176.0, "mri"),
    ("Samoan", "Austronesian", -13.0, -172.0, "smo"),
    ("Tongan", "Austronesian", -21.0, -175.0, "ton"),
    ("Fijian", "Austronesian", -18.0, 178.0, "fij"),
    ("Dutch", "Indo-European", 52.0, 5.0, "nld"),
    ("Swedish", "Indo-European", 59.0, 15.0, "swe"),
    ("Norwegian", "Indo-European", 61.0, 8.0, "nor"),
    ("Danish", "Indo-European", 56.0, 10.0, "dan"),
    ("Icelandic", "Indo-European", 65.0, -19.0, "isl"),
    ("Irish", "Indo-European", 53.0, -8.0, "gle"),
    ("Welsh", "Indo-European", 52.0, -3.0, "cym"),
    ("Basque", "Language Isolate", 43.0, -2.0, "eus"),
    ("Catalan", "Indo-European", 41.0, 2.0, "cat"),
    ("Kannada", "Dravidian", 13.0, 77.0, "kan"),
    ("Tamil", "Dravidian", 11.0, 79.0, "tam"),
    ("Telugu", "Dravidian", 16.0, 80.0, "tel"),
    ("Malayalam", "Dravidian", 10.0, 76.0, "mal"),
    ("Punjabi", "Indo-European", 30.0, 75.0, "pan"),
    ("Gujarati", "Indo-European", 23.0, 72.0, "guj"),
    ("Mongolian", "Mongolic", 46.0, 105.0, "mon"),
    ("Tibetan", "Sino-Tibetan", 31.0, 88.0, "bod"),
    ("Khmer", "Austroasiatic", 12.0, 105.0, "khm"),
    ("Burmese", "Sino-Tibetan", 21.0, 96.0, "mya"),
    ("Lao", "Tai-Kadai", 18.0, 103.0, "lao"),
];

struct SampleRegion {
    name: &'static str,
    lat: f64,
    lon: f64,
    radius: f64,
    families: &'static [&'static str],
    names: &'static [&'static str],
}

const SAMPLE_REGIONS: &[SampleRegion] = &[
    SampleRegion {
        name: "Africa",
        lat: 5.0,
        lon: 20.0,
        radius: 30.0,
        families: &["Niger-Congo", "Afro-Asiatic", "Nilo-Saharan"],
        names: &[
            "Wolof", "Maasai", "Kikuyu", "Berber", "Lingala", "Twi", "Ndebele", "Tswana",
            "Tigrinya", "Kinyarwanda", "Shona", "Bambara", "Kanuri", "Sesotho", "Luganda",
        ],
    },
    SampleRegion {
        name: "Europe",
        lat: 50.0,
        lon: 10.0,
        radius: 20.0,
        families: &["Indo-European", "Uralic", "Turkic"],
        names: &[
            "Breton", "Occitan", "Frisian", "Luxembourgish", "Corsican", "Romani", "Sami",
            "Sardinian", "Galician", "Faroese", "Maltese", "Gagauz", "Aromanian",
        ],
    },
    SampleRegion {
        name: "Asia",
        lat: 35.0,
        lon: 100.0,
        radius: 40.0,
        families: &[
            "Sino-Tibetan", "Austroasiatic", "Japonic", "Koreanic", "Dravidian", "Tai-Kadai",
            "Turkic",
        ],
        names: &[
            "Uyghur", "Sindhi", "Pashto", "Balochi", "Hakka", "Assamese", "Rajasthani",
            "Marathi", "Konkani", "Kashmiri", "Meitei", "Tulu", "Dzongkha", "Nepali",
            "Sinhala", "Lhasa", "Bhojpuri", "Maithili", "Wu", "Cantonese",
        ],
    },
    SampleRegion {
        name: "North America",
        lat: 40.0,
        lon: -100.0,
        radius: 30.0,
        families: &["Na-Dene", "Algic", "Iroquoian", "Uto-Aztecan", "Eskimo-Aleut"],
        names: &[
            "Cree", "Ojibwe", "Sioux", "Cherokee", "Comanche", "Mohawk", "Nez Perce", "Yupik",
            "Tlingit", "Haida", "Hopi", "Apache", "Choctaw", "Chickasaw",
        ],
    },
    SampleRegion {
        name: "South America",
        lat: -20.0,
        lon: -60.0,
        radius: 30.0,
        families: &["Arawakan", "Quechuan", "Tupian", "Carib", "Aymaran"],
        names: &[
            "Aymara", "Mapudungun", "Kichwa", "Wayuu", "Nahuatl", "Toba", "Mapuche", "Tupi",
            "Taíno", "Huichol", "Mixtec", "Tzotzil", "Zapotec", "Yanomami",
        ],
    },
    SampleRegion {
        name: "Oceania",
        lat: -25.0,
        lon: 135.0,
        radius: 40.0,
        families: &["Austronesian", "Pama-Nyungan"],
        names: &[
            "Tok Pisin", "Hiri Motu", "Tetum", "Tahitian", "Chamorro", "Marshallese", "Palauan",
            "Gilbertese", "Bislama", "Nauruan", "Chuukese", "Kosraean", "Rapanui", "Niuean",
            "Tuvaluan",
        ],
    },
];

/// (category, feature, values)
const SAMPLE_FEATURES: &[(&str, &str, &[&str])] = &[
    (
        "Phonology",
        "Consonant-Vowel Ratio",
        &["Low", "Moderately low", "Average", "Moderately high", "High"],
    ),
    (
        "Phonology",
        "Vowel Quality Inventory",
        &["Small (2-4)", "Medium (5-6)", "Large (7-14)", "Very large (>14)"],
    ),
    (
        "Phonology",
        "Consonant Inventory",
        &["Small", "Moderately small", "Average", "Moderately large", "Large"],
    ),
    ("Phonology", "Tone System", &["No tones", "Simple tone system", "Complex tone system"]),
    (
        "Morphology",
        "Prefixing vs. Suffixing",
        &[
            "Strongly suffixing",
            "Weakly suffixing",
            "Equal prefixing and suffixing",
            "Weakly prefixing",
            "Strongly prefixing",
        ],
    ),
    (
        "Morphology",
        "Fusion of Selected Inflectional Formatives",
        &[
            "Exclusively concatenative",
            "Predominantly concatenative",
            "Mixture of concatenative and fusion",
            "Predominantly fusional",
            "Exclusively fusional",
        ],
    ),
    (
        "Word Order",
        "Order of Subject, Object and Verb",
        &["SOV", "SVO", "VSO", "VOS", "OVS", "OSV", "No dominant order"],
    ),
    (
        "Word Order",
        "Order of Adjective and Noun",
        &[
            "Adjective-Noun",
            "Noun-Adjective",
            "No dominant order",
            "Both orders with neither dominant",
        ],
    ),
    (
        "Nominal Categories",
        "Definite Articles",
        &[
            "No definite article",
            "Definite word distinct from demonstrative",
            "Definite affix",
            "Demonstrative used as definite article",
        ],
    ),
    ("Nominal Categories", "Number of Genders", &["None", "Two", "Three", "Four", "Five or more"]),
    (
        "Nominal Syntax",
        "Possessive Classification",
        &["None", "Two classes", "Three to five classes", "Six or more classes"],
    ),
    (
        "Verbal Categories",
        "Perfective/Imperfective Aspect",
        &["No grammatical marking", "Grammatical marking", "Perfective/imperfective distinct"],
    ),
    (
        "Simple Clauses",
        "Alignment of Case Marking of Full Noun Phrases",
        &[
            "Nominative - accusative",
            "Ergative - absolutive",
            "Active - stative",
            "Tripartite",
            "Neutral",
        ],
    ),
];

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// 5 to 10 randomly chosen features, one random value each.
fn sample_features(rng: &mut SimpleRng) -> BTreeMap<String, String> {
    let count = 5 + rng.below(6);
    let mut order: Vec<usize> = (0..SAMPLE_FEATURES.len()).collect();
    rng.shuffle(&mut order);
    order
        .into_iter()
        .take(count)
        .map(|i| {
            let (category, feature, values) = SAMPLE_FEATURES[i];
            (format!("{category}: {feature}"), rng.pick(values).to_string())
        })
        .collect()
}

/// Generate `count` languages: the real reference list first, then
/// languages scattered around regional centres. Same seed, same output.
pub fn generate_languages(count: usize, seed: u64) -> Vec<Language> {
    let mut rng = SimpleRng::new(seed);
    let mut languages: Vec<Language> = REAL_LANGUAGES
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, &(name, family, lat, lon, iso))| Language {
            id: format!("lang-{i}"),
            name: name.to_string(),
            family: family.to_string(),
            latitude: lat,
            longitude: lon,
            macroarea: None,
            speakers: Some(100_000 + (rng.next_f64() * 900_000_000.0) as u64),
            iso_code: Some(iso.to_string()),
            genus: None,
            country_code: None,
            features: sample_features(&mut rng),
        })
        .collect();

    let base = languages.len();
    for i in 0..count.saturating_sub(base) {
        let region = rng.pick(SAMPLE_REGIONS);
        let angle = rng.next_f64() * std::f64::consts::TAU;
        let distance = rng.next_f64() * region.radius;
        let latitude = (region.lat + distance * angle.cos()).clamp(-85.0, 85.0);
        let longitude = region.lon + distance * angle.sin();
        let family = rng.pick(region.families);

        let names = region.names;
        let stem = names[i % names.len()];
        let name = if i >= names.len() {
            format!("{stem} (Variant {})", i / names.len() + 1)
        } else {
            stem.to_string()
        };

        languages.push(Language {
            id: format!("lang-{}", base + i),
            name,
            family: family.to_string(),
            latitude,
            longitude,
            macroarea: Some(region.name.to_string()),
            speakers: Some(10_000 + (rng.next_f64() * 10_000_000.0) as u64),
            iso_code: None,
            genus: None,
            country_code: None,
            features: sample_features(&mut rng),
        });
    }
    languages
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn same_seed_same_collection() {
        assert_eq!(generate_languages(120, 42), generate_languages(120, 42));
        assert_ne!(generate_languages(120, 42), generate_languages(120, 43));
    }

    #[test]
    fn ids_are_unique_and_count_is_exact() {
        let langs = generate_languages(300, 1);
        assert_eq!(langs.len(), 300);
        let ids: HashSet<&str> = langs.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids.len(), 300);
    }

    #[test]
    fn small_counts_truncate_reference_list() {
        let langs = generate_languages(3, 1);
        assert_eq!(langs.len(), 3);
        assert_eq!(langs[0].name, "English");
    }

    #[test]
    fn features_and_coordinates_stay_in_range() {
        for lang in generate_languages(200, 9) {
            assert!((5..=10).contains(&lang.features.len()), "{}", lang.features.len());
            assert!(lang.latitude.abs() <= 90.0);
            assert!(lang.features.keys().all(|k| k.contains(": ")));
        }
    }

    #[test]
    fn generated_languages_carry_macroarea() {
        let langs = generate_languages(100, 5);
        assert!(langs[..REAL_LANGUAGES.len()].iter().all(|l| l.macroarea.is_none()));
        assert!(langs[REAL_LANGUAGES.len()..].iter().all(|l| l.macroarea.is_some()));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SimpleRng::new(3);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
