use std::fmt;

use super::model::Language;

// ---------------------------------------------------------------------------
// Zoom target
// ---------------------------------------------------------------------------

/// Where and how far the map should reframe for a family or region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTarget {
    pub center_lat: f64,
    pub center_lon: f64,
    pub scale: f64,
}

/// Clamp range for computed zoom scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    /// Coordinate span (degrees) that maps to a scale of 1.0.
    pub reference_span_deg: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.8,
            max: 2.5,
            reference_span_deg: 90.0,
        }
    }
}

/// Spreads below this many degrees count as a single point.
const MIN_SPREAD_DEG: f64 = 1e-6;

impl ZoomLimits {
    /// Scale for a bounding box whose larger side spans `span` degrees.
    pub fn scale_for_span(&self, span: f64) -> f64 {
        if !span.is_finite() || span < MIN_SPREAD_DEG {
            return self.max;
        }
        (self.reference_span_deg / span).clamp(self.min, self.max)
    }
}

/// Frame a set of languages: bounding-box midpoint, scale from the wider side.
pub fn zoom_to_fit<'a>(
    languages: impl IntoIterator<Item = &'a Language>,
    limits: &ZoomLimits,
) -> Option<ZoomTarget> {
    let mut iter = languages.into_iter();
    let first = iter.next()?;
    let (mut min_lat, mut max_lat) = (first.latitude, first.latitude);
    let (mut min_lon, mut max_lon) = (first.longitude, first.longitude);
    for lang in iter {
        min_lat = min_lat.min(lang.latitude);
        max_lat = max_lat.max(lang.latitude);
        min_lon = min_lon.min(lang.longitude);
        max_lon = max_lon.max(lang.longitude);
    }
    let span = (max_lat - min_lat).max(max_lon - min_lon);
    Some(ZoomTarget {
        center_lat: (min_lat + max_lat) / 2.0,
        center_lon: (min_lon + max_lon) / 2.0,
        scale: limits.scale_for_span(span),
    })
}

// ---------------------------------------------------------------------------
// Region – named filter regions with bounding-box heuristics
// ---------------------------------------------------------------------------

/// Latitude/longitude rectangle, exclusive bounds.
#[derive(Debug, Clone, Copy)]
struct GeoBox {
    lat: (f64, f64),
    lon: (f64, f64),
}

impl GeoBox {
    const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        GeoBox {
            lat: (lat_min, lat_max),
            lon: (lon_min, lon_max),
        }
    }

    fn contains(&self, lat: f64, lon: f64) -> bool {
        lat > self.lat.0 && lat < self.lat.1 && lon > self.lon.0 && lon < self.lon.1
    }
}

const AFRICA: &[GeoBox] = &[GeoBox::new(-35.0, 37.0, -20.0, 55.0)];
const EUROPE: &[GeoBox] = &[GeoBox::new(36.0, 72.0, -25.0, 40.0)];
const ASIA: &[GeoBox] = &[
    GeoBox::new(0.0, 82.0, 40.0, 180.0),
    GeoBox::new(0.0, 40.0, 30.0, 40.0),
];
const NORTH_AMERICA: &[GeoBox] = &[GeoBox::new(15.0, 90.0, -170.0, -30.0)];
const SOUTH_AMERICA: &[GeoBox] = &[GeoBox::new(-60.0, 15.0, -90.0, -30.0)];
// East and west of the antimeridian.
const OCEANIA: &[GeoBox] = &[
    GeoBox::new(-50.0, 0.0, 110.0, 180.0),
    GeoBox::new(-50.0, 30.0, 130.0, 180.0),
    GeoBox::new(-50.0, 30.0, -180.0, -130.0),
];

/// The named regions offered by the region filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Africa,
    Europe,
    Asia,
    NorthAmerica,
    SouthAmerica,
    Oceania,
}

impl Region {
    pub fn all() -> &'static [Region] {
        &[
            Region::Africa,
            Region::Europe,
            Region::Asia,
            Region::NorthAmerica,
            Region::SouthAmerica,
            Region::Oceania,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Oceania => "Oceania",
        }
    }

    pub fn from_label(label: &str) -> Option<Region> {
        Region::all().iter().copied().find(|r| r.label() == label)
    }

    fn boxes(&self) -> &'static [GeoBox] {
        match self {
            Region::Africa => AFRICA,
            Region::Europe => EUROPE,
            Region::Asia => ASIA,
            Region::NorthAmerica => NORTH_AMERICA,
            Region::SouthAmerica => SOUTH_AMERICA,
            Region::Oceania => OCEANIA,
        }
    }

    /// Geographic heuristic only; ignores any macroarea label.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.boxes().iter().any(|b| b.contains(lat, lon))
    }

    /// Fixed framing used when a region is picked without a family zoom.
    pub fn default_zoom(&self) -> ZoomTarget {
        let (center_lat, center_lon, scale) = match self {
            Region::Africa => (5.0, 20.0, 1.6),
            Region::Europe => (50.0, 10.0, 2.2),
            Region::Asia => (35.0, 100.0, 1.4),
            Region::NorthAmerica => (45.0, -100.0, 1.5),
            Region::SouthAmerica => (-20.0, -60.0, 1.7),
            Region::Oceania => (-15.0, 150.0, 1.5),
        };
        ZoomTarget {
            center_lat,
            center_lon,
            scale,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether `language` belongs to the region named `region_name`.
///
/// A non-blank macroarea decides by equality. Otherwise the region's boxes
/// are consulted; boxes overlap, so a language may match several regions.
/// A name that is not a known region matches everything.
pub fn matches_region(language: &Language, region_name: &str) -> bool {
    if let Some(area) = language
        .macroarea
        .as_deref()
        .filter(|a| !a.trim().is_empty())
    {
        return area == region_name;
    }
    match Region::from_label(region_name) {
        Some(region) => region.contains(language.latitude, language.longitude),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::lang;

    #[test]
    fn oceania_wraps_the_antimeridian() {
        assert!(matches_region(&lang("fij", "Austronesian", -18.0, 178.0), "Oceania"));
        assert!(matches_region(&lang("ton", "Austronesian", -18.0, -175.0), "Oceania"));
        assert!(!matches_region(&lang("eng", "Indo-European", 52.0, 0.0), "Oceania"));
    }

    #[test]
    fn macroarea_is_authoritative() {
        let mut l = lang("x", "Uralic", 52.0, 10.0);
        l.macroarea = Some("Asia".to_string());
        assert!(matches_region(&l, "Asia"));
        assert!(!matches_region(&l, "Europe"));
    }

    #[test]
    fn blank_macroarea_falls_back_to_boxes() {
        let mut l = lang("x", "Indo-European", 50.0, 10.0);
        l.macroarea = Some(String::new());
        assert!(matches_region(&l, "Europe"));
        l.macroarea = Some("  ".to_string());
        assert!(matches_region(&l, "Europe"));
        assert!(!matches_region(&l, "Africa"));
    }

    #[test]
    fn overlapping_boxes_match_both_regions() {
        // Anatolia sits in both the Europe and Asia boxes.
        let l = lang("tur", "Turkic", 39.0, 35.0);
        assert!(matches_region(&l, "Europe"));
        assert!(matches_region(&l, "Asia"));
        assert!(!matches_region(&l, "Africa"));
    }

    #[test]
    fn unknown_region_name_matches() {
        assert!(matches_region(&lang("x", "Uralic", 0.0, 0.0), "Atlantis"));
    }

    #[test]
    fn labels_round_trip() {
        for region in Region::all() {
            assert_eq!(Region::from_label(region.label()), Some(*region));
        }
    }

    #[test]
    fn fit_uses_bounding_box_midpoint() {
        let members = [
            lang("a", "F", 10.0, 10.0),
            lang("b", "F", 10.0, 20.0),
            lang("c", "F", 10.0, 0.0),
        ];
        let limits = ZoomLimits::default();
        let target = zoom_to_fit(&members, &limits).unwrap();
        assert_eq!(target.center_lon, 10.0);
        assert_eq!(target.center_lat, 10.0);
        assert!(target.scale >= limits.min && target.scale <= limits.max);
    }

    #[test]
    fn single_point_uses_max_scale() {
        let limits = ZoomLimits::default();
        let target = zoom_to_fit(&[lang("a", "F", 1.0, 2.0)], &limits).unwrap();
        assert_eq!(target.scale, limits.max);
        assert!(zoom_to_fit(&[] as &[Language], &limits).is_none());
    }

    #[test]
    fn wide_spread_clamps_to_min_scale() {
        let limits = ZoomLimits::default();
        assert_eq!(limits.scale_for_span(300.0), limits.min);
        assert!((limits.scale_for_span(90.0) - 1.0).abs() < 1e-12);
    }
}
