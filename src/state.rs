use std::sync::Arc;

use eframe::egui;

use crate::config::AtlasConfig;
use crate::data::family::{count_by_family, family_zoom_target, FamilyCount};
use crate::data::model::{Atlas, Language};
use crate::data::region::{matches_region, Region, ZoomLimits, ZoomTarget};
use crate::data::source::{LanguageSource, LoadChannel};
use crate::projection::ViewTransform;

/// Search results listed below the search box.
const SEARCH_LIMIT: usize = 12;

// ---------------------------------------------------------------------------
// View state – selection, filters and zoom
// ---------------------------------------------------------------------------

/// What produced the active zoom target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomOrigin {
    Family,
    Region,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zoom {
    pub target: ZoomTarget,
    pub origin: ZoomOrigin,
}

/// Everything the user has picked, over an immutable [`Atlas`].
///
/// Transitions only touch this struct; the rendered view is recomputed from
/// it with [`derive_view`].
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub atlas: Atlas,
    /// Id of the language shown in the info panel.
    pub selected_language: Option<String>,
    pub selected_family: Option<String>,
    pub selected_region: Option<Region>,
    pub zoom: Option<Zoom>,
    pub search_query: String,
    pub limits: ZoomLimits,
    pub chart_top_n: usize,
}

impl ViewState {
    pub fn new(limits: ZoomLimits, chart_top_n: usize) -> Self {
        Self {
            limits,
            chart_top_n,
            ..Self::default()
        }
    }

    /// Swap in a freshly loaded collection. Selections referring to the old
    /// one are dropped; the search text survives.
    pub fn set_atlas(&mut self, atlas: Atlas) {
        self.atlas = atlas;
        self.selected_language = None;
        self.clear_filters();
    }

    pub fn select_family(&mut self, family: Option<&str>) {
        log::debug!("select family {family:?}");
        self.selected_family = family.map(str::to_string);
        self.zoom = family.and_then(|f| {
            let members = self.atlas.languages.iter().filter(|l| l.family_label() == f);
            family_zoom_target(members, &self.limits).map(|target| Zoom {
                target,
                origin: ZoomOrigin::Family,
            })
        });
    }

    /// A region only reframes the map when no family zoom is active.
    pub fn select_region(&mut self, region: Option<Region>) {
        log::debug!("select region {region:?}");
        self.selected_region = region;
        let family_zoom = matches!(self.zoom, Some(z) if z.origin == ZoomOrigin::Family);
        match region {
            Some(r) if !family_zoom => {
                self.zoom = Some(Zoom {
                    target: r.default_zoom(),
                    origin: ZoomOrigin::Region,
                });
            }
            Some(_) => {}
            None if !family_zoom => self.zoom = None,
            None => {}
        }
    }

    pub fn clear_filters(&mut self) {
        log::debug!("clear filters");
        self.selected_family = None;
        self.selected_region = None;
        self.zoom = None;
    }

    pub fn clear_zoom(&mut self) {
        self.zoom = None;
    }

    /// Returns false (and changes nothing) for an unknown id.
    pub fn select_language(&mut self, id: &str) -> bool {
        if self.atlas.index_of(id).is_none() {
            log::debug!("ignoring selection of unknown language {id}");
            return false;
        }
        self.selected_language = Some(id.to_string());
        true
    }

    pub fn clear_language(&mut self) {
        self.selected_language = None;
    }

    pub fn set_search(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    pub fn zoom_target(&self) -> Option<ZoomTarget> {
        self.zoom.map(|z| z.target)
    }

    pub fn selected_language(&self) -> Option<&Language> {
        let id = self.selected_language.as_deref()?;
        self.atlas.index_of(id).and_then(|i| self.atlas.get(i))
    }

    /// Indices of languages passing the family AND region filters.
    pub fn filtered_indices(&self) -> Vec<usize> {
        let region = self.selected_region.map(|r| r.label());
        self.atlas
            .languages
            .iter()
            .enumerate()
            .filter(|(_, lang)| {
                self.selected_family
                    .as_deref()
                    .map_or(true, |f| lang.family_label() == f)
            })
            .filter(|(_, lang)| region.map_or(true, |r| matches_region(lang, r)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of languages whose name, family or ISO code contains the
    /// query, case-insensitively. Searching never filters the map.
    pub fn search_matches(&self) -> Vec<usize> {
        let query = self.search_query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.atlas
            .languages
            .iter()
            .enumerate()
            .filter(|(_, lang)| {
                lang.name.to_lowercase().contains(&query)
                    || lang.family_label().to_lowercase().contains(&query)
                    || lang
                        .iso_code
                        .as_deref()
                        .is_some_and(|iso| iso.to_lowercase().contains(&query))
            })
            .map(|(i, _)| i)
            .take(SEARCH_LIMIT)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Derived view model
// ---------------------------------------------------------------------------

/// Everything the panels draw, computed from a [`ViewState`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub visible: Vec<usize>,
    /// Per-family counts of the visible set, largest first.
    pub family_counts: Vec<FamilyCount>,
    /// The first `chart_top_n` of `family_counts`.
    pub top_families: Vec<FamilyCount>,
    pub zoom_target: Option<ZoomTarget>,
    pub search_matches: Vec<usize>,
}

impl ViewModel {
    pub fn family_total(&self) -> usize {
        self.family_counts.len()
    }
}

pub fn derive_view(state: &ViewState) -> ViewModel {
    let visible = state.filtered_indices();
    let family_counts = count_by_family(state.atlas.select(&visible), None);
    let top_families = family_counts
        .iter()
        .take(state.chart_top_n)
        .cloned()
        .collect();
    ViewModel {
        visible,
        family_counts,
        top_families,
        zoom_target: state.zoom_target(),
        search_matches: state.search_matches(),
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Progress of the current data load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading { source: String },
    Loaded { source: String },
    Failed { source: String, message: String },
}

/// Value picked in the feature tree window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSelection {
    pub category: String,
    pub feature: String,
    pub value: String,
}

/// Which floating windows are open.
#[derive(Debug, Clone, Default)]
pub struct Windows {
    pub analysis: bool,
    pub attribute_tree: bool,
    pub feature_tree: bool,
    pub lineage: bool,
    pub guide: bool,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AtlasConfig,
    pub view: ViewState,
    /// Cached [`derive_view`] of `view`.
    pub model: ViewModel,
    pub load: LoadState,
    loader: LoadChannel,
    last_source: Option<Arc<dyn LanguageSource>>,

    /// Transform currently drawn, eased toward `target_transform`.
    pub transform: ViewTransform,
    pub target_transform: ViewTransform,

    pub windows: Windows,
    pub tree_selection: Option<TreeSelection>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AtlasConfig::default())
    }
}

impl AppState {
    pub fn new(config: AtlasConfig) -> Self {
        let view = ViewState::new(config.zoom_limits(), config.family_chart_top_n);
        Self {
            model: derive_view(&view),
            view,
            config,
            load: LoadState::Idle,
            loader: LoadChannel::new(),
            last_source: None,
            transform: ViewTransform::IDENTITY,
            target_transform: ViewTransform::IDENTITY,
            windows: Windows::default(),
            tree_selection: None,
        }
    }

    // ---- Loading ----

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    /// Begin loading from `source`. Ignored while a load is in flight.
    pub fn start_load(&mut self, source: Arc<dyn LanguageSource>, ctx: Option<&egui::Context>) {
        let label = source.describe();
        if self.loader.start(source.clone(), ctx.cloned()) {
            self.last_source = Some(source);
            self.load = LoadState::Loading { source: label };
        }
    }

    /// Re-run the last source.
    pub fn retry(&mut self, ctx: Option<&egui::Context>) {
        if let Some(source) = self.last_source.clone() {
            self.start_load(source, ctx);
        }
    }

    /// Pick up a finished load, if any.
    pub fn poll_load(&mut self) {
        let Some(result) = self.loader.poll() else {
            return;
        };
        let source = match &self.load {
            LoadState::Loading { source } => source.clone(),
            _ => String::new(),
        };
        match result {
            Ok(languages) => {
                log::info!("Loaded {} languages from {source}", languages.len());
                self.set_languages(languages);
                self.load = LoadState::Loaded { source };
            }
            Err(e) => {
                log::error!("Failed to load languages: {e}");
                self.load = LoadState::Failed {
                    source,
                    message: e.to_string(),
                };
            }
        }
    }

    /// Discard any pending load.
    pub fn shutdown(&mut self) {
        self.loader.cancel();
    }

    pub fn set_languages(&mut self, languages: Vec<Language>) {
        self.view.set_atlas(Atlas::from_languages(languages));
        self.tree_selection = None;
        self.refresh();
    }

    // ---- Transitions ----

    /// Recompute the view model and retarget the map if the zoom changed.
    pub fn refresh(&mut self) {
        let previous = self.model.zoom_target;
        self.model = derive_view(&self.view);
        if self.model.zoom_target != previous {
            self.target_transform = self
                .model
                .zoom_target
                .as_ref()
                .map(ViewTransform::toward)
                .unwrap_or(ViewTransform::IDENTITY);
        }
    }

    pub fn select_family(&mut self, family: Option<&str>) {
        self.view.select_family(family);
        self.refresh();
        self.apply_zoom_target();
    }

    pub fn select_region(&mut self, region: Option<Region>) {
        self.view.select_region(region);
        self.refresh();
        self.apply_zoom_target();
    }

    /// A zoom request always lands on its target, even when the user has
    /// panned or scrolled away from the same target since.
    fn apply_zoom_target(&mut self) {
        if let Some(target) = &self.model.zoom_target {
            self.target_transform = ViewTransform::toward(target);
        }
    }

    pub fn clear_filters(&mut self) {
        self.view.clear_filters();
        self.refresh();
    }

    pub fn clear_zoom(&mut self) {
        self.view.clear_zoom();
        self.refresh();
    }

    pub fn set_search(&mut self, query: &str) {
        self.view.set_search(query);
        self.model.search_matches = self.view.search_matches();
    }

    pub fn select_language(&mut self, id: &str) {
        self.view.select_language(id);
    }

    pub fn clear_language(&mut self) {
        self.view.clear_language();
        self.windows.analysis = false;
        self.windows.attribute_tree = false;
    }

    // ---- Map motion ----

    /// Ease the drawn transform toward its target. Returns true while moving.
    pub fn animate(&mut self, dt: f64) -> bool {
        if self.transform.settled_at(&self.target_transform) {
            self.transform = self.target_transform;
            return false;
        }
        // Roughly 90% of the remaining distance per 1/3 s.
        let t = 1.0 - (-7.0 * dt).exp();
        self.transform.ease_toward(&self.target_transform, t);
        true
    }

    /// Manual pan; applied immediately and kept as the new target.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        for transform in [&mut self.transform, &mut self.target_transform] {
            transform.pan.0 += dx;
            transform.pan.1 += dy;
        }
    }

    /// Manual zoom, clamped to the configured limits.
    pub fn zoom_by(&mut self, factor: f64) {
        let limits = self.view.limits;
        let zoom = (self.target_transform.zoom * factor).clamp(limits.min * 0.5, limits.max * 2.0);
        self.target_transform.zoom = zoom;
        self.transform.zoom = zoom;
    }

    pub fn reset_view(&mut self) {
        self.clear_zoom();
        self.target_transform = ViewTransform::IDENTITY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::lang;

    fn state() -> ViewState {
        let mut s = ViewState::new(ZoomLimits::default(), 12);
        let mut basque = lang("eus", "Language Isolate", 43.0, -2.0);
        basque.macroarea = Some("Europe".into());
        s.set_atlas(Atlas::from_languages(vec![
            lang("eng", "Indo-European", 52.0, 0.0),
            lang("hin", "Indo-European", 25.0, 77.0),
            lang("fin", "Uralic", 61.0, 25.0),
            lang("haw", "Austronesian", 19.6, -155.5),
            basque,
        ]));
        s
    }

    #[test]
    fn family_round_trip_restores_unfiltered_view() {
        let mut s = state();
        let all = s.filtered_indices();
        s.select_family(Some("Indo-European"));
        assert_eq!(s.filtered_indices(), vec![0, 1]);
        assert_eq!(s.zoom.map(|z| z.origin), Some(ZoomOrigin::Family));
        s.select_family(None);
        assert_eq!(s.filtered_indices(), all);
        assert!(s.zoom.is_none());
    }

    #[test]
    fn family_zoom_targets_bounding_box_midpoint() {
        let mut s = state();
        s.select_family(Some("Indo-European"));
        let target = s.zoom_target().unwrap();
        assert!((target.center_lon - 38.5).abs() < 1e-9);
        assert!((0.8..=2.5).contains(&target.scale));
    }

    #[test]
    fn region_zoom_yields_to_family_zoom() {
        let mut s = state();
        s.select_region(Some(Region::Europe));
        assert_eq!(s.zoom_target(), Some(Region::Europe.default_zoom()));

        s.select_family(Some("Uralic"));
        let family_target = s.zoom_target();
        s.select_region(Some(Region::Asia));
        assert_eq!(s.zoom_target(), family_target);

        s.select_region(None);
        assert_eq!(s.zoom_target(), family_target);
    }

    #[test]
    fn clearing_region_drops_region_zoom() {
        let mut s = state();
        s.select_region(Some(Region::Oceania));
        s.select_region(None);
        assert!(s.zoom.is_none());
    }

    #[test]
    fn filters_compose_with_and() {
        let mut s = state();
        s.select_region(Some(Region::Europe));
        // Basque by macroarea; English and Finnish by box.
        assert_eq!(s.filtered_indices(), vec![0, 2, 4]);
        s.select_family(Some("Indo-European"));
        assert_eq!(s.filtered_indices(), vec![0]);
        s.clear_filters();
        assert_eq!(s.filtered_indices().len(), 5);
        assert!(s.zoom.is_none());
    }

    #[test]
    fn language_selection_leaves_filters_alone() {
        let mut s = state();
        s.select_family(Some("Uralic"));
        assert!(s.select_language("haw"));
        assert_eq!(s.selected_family.as_deref(), Some("Uralic"));
        assert_eq!(s.selected_language().map(|l| l.id.as_str()), Some("haw"));
        assert!(!s.select_language("nope"));
        assert_eq!(s.selected_language.as_deref(), Some("haw"));
        s.clear_language();
        assert!(s.selected_language().is_none());
        assert_eq!(s.filtered_indices(), vec![2]);
    }

    #[test]
    fn search_matches_name_family_and_iso() {
        let mut s = state();
        s.atlas.languages[3].iso_code = Some("HAW".into());
        s.set_search("uralic");
        assert_eq!(s.search_matches(), vec![2]);
        s.set_search("haw");
        assert_eq!(s.search_matches(), vec![3]);
        s.set_search("   ");
        assert!(s.search_matches().is_empty());
    }

    #[test]
    fn derived_view_counts_visible_families() {
        let mut s = state();
        s.select_region(Some(Region::Europe));
        let model = derive_view(&s);
        assert_eq!(model.visible.len(), 3);
        assert_eq!(model.family_total(), 3);
        let total: usize = model.family_counts.iter().map(|c| c.count).sum();
        assert_eq!(total, model.visible.len());
        assert_eq!(model.zoom_target, Some(Region::Europe.default_zoom()));
    }

    #[test]
    fn app_state_retargets_on_zoom_change() {
        let mut app = AppState::default();
        app.set_languages(state().atlas.languages);
        app.select_region(Some(Region::Asia));
        assert_eq!(
            app.target_transform,
            ViewTransform::toward(&Region::Asia.default_zoom())
        );
        app.clear_filters();
        assert_eq!(app.target_transform, ViewTransform::IDENTITY);
        while app.animate(0.1) {}
        assert_eq!(app.transform, ViewTransform::IDENTITY);
    }

    #[test]
    fn repeated_family_zoom_overrides_manual_motion() {
        let mut app = AppState::default();
        app.set_languages(state().atlas.languages);
        app.select_family(Some("Uralic"));
        let zoomed = app.target_transform;
        assert_eq!(zoomed.pan, (0.0, 0.0));

        app.pan_by(300.0, 0.0);
        app.zoom_by(0.5);
        assert_ne!(app.target_transform, zoomed);

        app.select_family(Some("Uralic"));
        assert_eq!(app.target_transform, zoomed);
    }
}
