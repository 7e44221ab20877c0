//! Collection-wide windows: feature tree analysis, family lineage and the
//! category guide.

use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::{category_color, family_color};
use crate::data::analysis::category_guide;
use crate::data::family::{count_by_family, family_lineage};
use crate::data::features::{build_feature_tree, sort_feature_values, value_distribution};
use crate::data::model::Language;
use crate::state::{AppState, TreeSelection};
use crate::ui::charts;

/// Rows shown before "Show more".
const LIST_PREVIEW: usize = 5;

/// A list of languages that shows the first few and expands on demand.
/// Returns the id of a clicked language.
pub fn expandable_language_list(ui: &mut Ui, id: &str, languages: &[&Language]) -> Option<String> {
    if languages.is_empty() {
        ui.weak("None.");
        return None;
    }
    let key = egui::Id::new(("expandable_list", id));
    let expanded = ui.data(|d| d.get_temp::<bool>(key)).unwrap_or(false);
    let shown = if expanded {
        languages.len()
    } else {
        LIST_PREVIEW.min(languages.len())
    };

    let mut picked = None;
    for lang in &languages[..shown] {
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(family_color(lang.family_label()), "●");
            if ui.link(&lang.name).clicked() {
                picked = Some(lang.id.clone());
            }
            ui.weak(lang.family_label());
        });
    }

    if languages.len() > LIST_PREVIEW {
        let label = if expanded {
            "Show less".to_string()
        } else {
            format!("Show {} more", languages.len() - LIST_PREVIEW)
        };
        if ui.small_button(label).clicked() {
            ui.data_mut(|d| d.insert_temp(key, !expanded));
        }
    }
    picked
}

// ---------------------------------------------------------------------------
// Feature tree analysis
// ---------------------------------------------------------------------------

/// Languages of the visible set grouped category → feature → value, with a
/// chart for the picked feature.
pub fn feature_tree_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.windows.feature_tree;
    let mut picked_value: Option<TreeSelection> = None;
    let mut picked_language: Option<String> = None;

    let tree = build_feature_tree(state.view.atlas.select(&state.model.visible));
    let selection = state.tree_selection.clone();

    egui::Window::new("Feature tree analysis")
        .open(&mut open)
        .default_size([820.0, 560.0])
        .show(ctx, |ui: &mut Ui| {
            ui.label(format!(
                "{} visible languages grouped by major structural attributes.",
                state.model.visible.len()
            ));
            ui.separator();

            if tree.is_empty() {
                ui.weak("No features in the major categories.");
                return;
            }

            ui.columns(2, |cols| {
                // ---- Left: category / feature / value tree ----
                ScrollArea::vertical()
                    .id_salt("feature_tree_scroll")
                    .show(&mut cols[0], |ui: &mut Ui| {
                        for (category, features) in &tree {
                            egui::CollapsingHeader::new(
                                RichText::new(category).color(category_color(category)).strong(),
                            )
                            .id_salt(("feature_tree", category))
                            .show(ui, |ui: &mut Ui| {
                                for (feature, values) in features {
                                    ui.label(RichText::new(feature).strong());
                                    ui.indent(("feature_values", category, feature), |ui: &mut Ui| {
                                        for value in sort_feature_values(feature, values) {
                                            let count = values.get(value).map_or(0, Vec::len);
                                            let active = selection.as_ref().is_some_and(|s| {
                                                s.category == *category
                                                    && s.feature == *feature
                                                    && s.value == value
                                            });
                                            let text = if value.is_empty() {
                                                "(empty)"
                                            } else {
                                                value
                                            };
                                            if ui
                                                .selectable_label(
                                                    active,
                                                    format!("{text}  ({count})"),
                                                )
                                                .clicked()
                                            {
                                                picked_value = Some(TreeSelection {
                                                    category: category.clone(),
                                                    feature: feature.clone(),
                                                    value: value.to_string(),
                                                });
                                            }
                                        }
                                    });
                                }
                            });
                        }
                    });

                // ---- Right: details of the picked value ----
                let ui = &mut cols[1];
                let Some(sel) = &selection else {
                    ui.weak("Select a feature value to see its languages.");
                    return;
                };
                let Some(values) = tree.get(&sel.category).and_then(|f| f.get(&sel.feature)) else {
                    ui.weak("The selected feature is not in the current view.");
                    return;
                };
                ScrollArea::vertical()
                    .id_salt("feature_detail_scroll")
                    .show(ui, |ui: &mut Ui| {
                        ui.heading(&sel.feature);
                        ui.label(RichText::new(&sel.category).color(category_color(&sel.category)));
                        charts::feature_value_chart(ui, &sel.feature, &value_distribution(values));
                        ui.separator();

                        let members: &[&Language] =
                            values.get(&sel.value).map(Vec::as_slice).unwrap_or(&[]);
                        ui.strong(format!("Languages with \"{}\" ({})", sel.value, members.len()));
                        if let Some(id) =
                            expandable_language_list(ui, "feature_value_languages", members)
                        {
                            picked_language = Some(id);
                        }
                        ui.add_space(6.0);
                        ui.strong("Language family comparison for this value");
                        let counts = count_by_family(
                            members.iter().copied(),
                            Some(state.config.family_chart_top_n),
                        );
                        charts::family_bar_chart(ui, &counts);
                    });
            });
        });

    state.windows.feature_tree = open;
    if picked_value.is_some() {
        state.tree_selection = picked_value;
    }
    if let Some(id) = picked_language {
        state.select_language(&id);
    }
}

// ---------------------------------------------------------------------------
// Family lineage
// ---------------------------------------------------------------------------

pub fn lineage_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.windows.lineage;
    let mut picked_language = None;
    let mut zoom_family: Option<String> = None;

    egui::Window::new("Family lineage")
        .open(&mut open)
        .default_size([380.0, 480.0])
        .show(ctx, |ui: &mut Ui| {
            let groups = family_lineage(state.view.atlas.select(&state.model.visible));
            ui.label(format!("{} families in view", groups.len()));
            ui.separator();
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for (family, members) in &groups {
                    let header = RichText::new(format!("{family} ({})", members.len()))
                        .color(family_color(family))
                        .strong();
                    egui::CollapsingHeader::new(header)
                        .id_salt(("lineage", *family))
                        .show(ui, |ui: &mut Ui| {
                            if ui.small_button("Zoom to family").clicked() {
                                zoom_family = Some(family.to_string());
                            }
                            if let Some(id) = expandable_language_list(ui, family, members) {
                                picked_language = Some(id);
                            }
                        });
                }
            });
        });

    state.windows.lineage = open;
    if let Some(family) = zoom_family {
        state.select_family(Some(&family));
    }
    if let Some(id) = picked_language {
        state.select_language(&id);
    }
}

// ---------------------------------------------------------------------------
// Category guide
// ---------------------------------------------------------------------------

pub fn guide_window(ctx: &egui::Context, state: &mut AppState) {
    egui::Window::new("Category guide")
        .open(&mut state.windows.guide)
        .default_width(420.0)
        .show(ctx, |ui: &mut Ui| {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                for guide in category_guide() {
                    ui.label(
                        RichText::new(guide.category)
                            .color(category_color(guide.category))
                            .strong(),
                    );
                    ui.label(guide.definition);
                    for (value, explanation) in guide.examples {
                        ui.horizontal_wrapped(|ui: &mut Ui| {
                            ui.monospace(*value);
                            ui.label(*explanation);
                        });
                    }
                    ui.add_space(6.0);
                }
            });
        });
}
