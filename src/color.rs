use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::OTHER_CATEGORY;

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Family colours
// ---------------------------------------------------------------------------

const FAMILY_COLORS: &[(&str, u32)] = &[
    ("Indo-European", 0x5D9CEC),
    ("Sino-Tibetan", 0x48CFAD),
    ("Niger-Congo", 0xFC6E51),
    ("Austronesian", 0xEC87C0),
    ("Afro-Asiatic", 0x4A89DC),
    ("Dravidian", 0xF6BB42),
    ("Turkic", 0x8E44AD),
    ("Uralic", 0xE9573F),
    ("Japonic", 0x37BC9B),
    ("Koreanic", 0xD770AD),
    ("Tai-Kadai", 0x3BAFB9),
    ("Mongolic", 0xF6B042),
    ("Hmong-Mien", 0x967ADC),
    ("Austroasiatic", 0x3BAFB9),
    ("Language Isolate", 0xAC92EC),
    ("Na-Dene", 0xED5565),
    ("Algic", 0x4FC1E9),
    ("Iroquoian", 0xA0D468),
    ("Uto-Aztecan", 0xEC87C0),
    ("Eskimo-Aleut", 0x5D9CEC),
];

fn from_hex(hex: u32) -> Color32 {
    Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Stable colour for a family label.
///
/// Well-known families use a fixed table; anything else gets a saturated hue
/// hashed from the label, so the same family always draws the same colour.
pub fn family_color(family: &str) -> Color32 {
    if let Some((_, hex)) = FAMILY_COLORS.iter().find(|(name, _)| *name == family) {
        return from_hex(*hex);
    }
    let hash = family
        .chars()
        .fold(0i32, |h, c| (c as i32).wrapping_add(h.wrapping_shl(5).wrapping_sub(h)));
    let hue = (hash.unsigned_abs() % 360) as f32;
    hsl_to_color32(hue, 0.8, 0.65)
}

// ---------------------------------------------------------------------------
// Category colours
// ---------------------------------------------------------------------------

const CATEGORY_COLORS: &[(&str, u32)] = &[
    ("Phonology", 0xD3E4FD),
    ("Morphology", 0xE5DEFF),
    ("Nominal Categories", 0xFEC6A1),
    ("Nominal Syntax", 0xFEF7CD),
    ("Verbal Categories", 0xF2FCE2),
    ("Word Order", 0xFFD6E2),
    ("Simple Clauses", 0xFDE1D3),
    ("Complex Sentences", 0xF1F0FB),
    ("Lexicon", 0xFFDEE2),
    (OTHER_CATEGORY, 0xF6F6F7),
];

/// Accent colour for a feature category header.
pub fn category_color(category: &str) -> Color32 {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, hex)| from_hex(*hex))
        .unwrap_or(from_hex(0xE5E7EB))
}

/// Fill for bars in the feature value chart.
pub const VALUE_BAR_COLOR: Color32 = Color32::from_rgb(0x9B, 0x87, 0xF5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_family_uses_table() {
        assert_eq!(family_color("Indo-European"), Color32::from_rgb(0x5D, 0x9C, 0xEC));
    }

    #[test]
    fn unknown_family_is_stable() {
        let a = family_color("Made-Up Family");
        assert_eq!(a, family_color("Made-Up Family"));
        assert_ne!(a, Color32::BLACK);
    }

    #[test]
    fn unknown_category_falls_back() {
        assert_eq!(category_color("Phonology"), from_hex(0xD3E4FD));
        assert_eq!(category_color("Nope"), from_hex(0xE5E7EB));
    }
}
