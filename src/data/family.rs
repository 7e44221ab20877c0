use std::collections::HashMap;

use super::model::Language;
use super::region::{zoom_to_fit, ZoomLimits, ZoomTarget};

/// Bars shown in the family comparison chart.
pub const FAMILY_CHART_TOP_N: usize = 12;

/// One bar of the family comparison chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyCount {
    pub family: String,
    pub count: usize,
}

/// Count languages per family, most populous first.
///
/// Ties keep the order in which families first appear in the input.
/// `limit` truncates to the top N.
pub fn count_by_family<'a>(
    languages: impl IntoIterator<Item = &'a Language>,
    limit: Option<usize>,
) -> Vec<FamilyCount> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<FamilyCount> = Vec::new();
    for lang in languages {
        let family = lang.family_label();
        match slots.get(family) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(family, counts.len());
                counts.push(FamilyCount {
                    family: family.to_string(),
                    count: 1,
                });
            }
        }
    }
    // `sort_by` is stable, so first-appearance order survives ties.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(n) = limit {
        counts.truncate(n);
    }
    counts
}

/// Group languages by family, families in first-appearance order.
pub fn family_lineage<'a>(
    languages: impl IntoIterator<Item = &'a Language>,
) -> Vec<(&'a str, Vec<&'a Language>)> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(&'a str, Vec<&'a Language>)> = Vec::new();
    for lang in languages {
        let family = lang.family_label();
        match slots.get(family) {
            Some(&slot) => groups[slot].1.push(lang),
            None => {
                slots.insert(family, groups.len());
                groups.push((family, vec![lang]));
            }
        }
    }
    groups
}

/// Framing for "zoom to family": bounding-box midpoint of the members,
/// scale clamped to `limits`. `None` for an empty family.
pub fn family_zoom_target<'a>(
    members: impl IntoIterator<Item = &'a Language>,
    limits: &ZoomLimits,
) -> Option<ZoomTarget> {
    zoom_to_fit(members, limits)
}
