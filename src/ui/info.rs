//! Per-language views: the info side panel, the analysis window and the
//! attribute tree window.

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::{category_color, family_color};
use crate::data::analysis::{insights, key_features};
use crate::data::features::group_features_by_category;
use crate::data::model::Language;
use crate::state::AppState;
use crate::ui::tree::expandable_language_list;

/// Things the info panel asks the app to do once borrows are released.
enum InfoAction {
    Close,
    ZoomToFamily(String),
    Select(String),
}

fn family_badge(ui: &mut Ui, family: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.colored_label(family_color(family), "●");
        ui.strong(family);
    });
}

fn optional_row(ui: &mut Ui, label: &str, value: Option<String>) {
    if let Some(value) = value {
        ui.label(RichText::new(label).strong());
        ui.label(value);
        ui.end_row();
    }
}

/// Right panel with the selected language's facts and grouped features.
pub fn info_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(language) = state.view.selected_language() else {
        return;
    };
    let mut action = None;

    ui.horizontal(|ui: &mut Ui| {
        ui.heading(&language.name);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.small_button("✕").on_hover_text("Close").clicked() {
                action = Some(InfoAction::Close);
            }
        });
    });
    family_badge(ui, language.family_label());
    ui.add_space(4.0);

    egui::Grid::new("language_facts")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label(RichText::new("Latitude").strong());
            ui.label(format!("{:.2}", language.latitude));
            ui.end_row();
            ui.label(RichText::new("Longitude").strong());
            ui.label(format!("{:.2}", language.longitude));
            ui.end_row();
            optional_row(ui, "Macroarea", language.macroarea.clone());
            optional_row(ui, "Speakers", language.speakers.map(|s| s.to_string()));
            optional_row(ui, "ISO code", language.iso_code.clone());
            optional_row(ui, "Genus", language.genus.clone());
            optional_row(ui, "Country", language.country_code.clone());
        });

    ui.add_space(4.0);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        if ui.button("Analysis").clicked() {
            state.windows.analysis = true;
        }
        if ui.button("Attribute tree").clicked() {
            state.windows.attribute_tree = true;
        }
        if ui.button("Zoom to family").clicked() {
            action = Some(InfoAction::ZoomToFamily(language.family_label().to_string()));
        }
    });
    ui.separator();

    let grouped = group_features_by_category(language);
    if grouped.is_empty() {
        ui.weak("No features recorded.");
    } else {
        ui.strong("Language features");
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                for (category, entries) in &grouped {
                    egui::CollapsingHeader::new(
                        RichText::new(*category).color(category_color(category)),
                    )
                    .id_salt(("info_category", *category))
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        for entry in entries {
                            ui.label(RichText::new(entry.name).strong());
                            ui.label(RichText::new(entry.value).color(Color32::from_gray(190)));
                            ui.add_space(2.0);
                        }
                    });
                }
            });
    }

    apply(state, action);
}

fn apply(state: &mut AppState, action: Option<InfoAction>) {
    match action {
        Some(InfoAction::Close) => state.clear_language(),
        Some(InfoAction::ZoomToFamily(family)) => state.select_family(Some(&family)),
        Some(InfoAction::Select(id)) => state.select_language(&id),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Analysis window
// ---------------------------------------------------------------------------

fn analysis_body(ui: &mut Ui, language: &Language, relatives: &[&Language]) -> Option<InfoAction> {
    let mut action = None;
    let color = family_color(language.family_label());

    ui.strong("Language lineage");
    ui.label(RichText::new(language.family_label()).color(color).strong());
    ui.indent("lineage_genus", |ui: &mut Ui| {
        if let Some(genus) = &language.genus {
            ui.label(format!("↳ {genus}"));
        }
        ui.label(format!("↳ {}", language.name));
    });
    ui.add_space(6.0);

    ui.strong("Key features");
    let features = key_features(language);
    if features.is_empty() {
        ui.weak("No key features recorded.");
    }
    egui::Grid::new("key_features")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for f in &features {
                ui.label(RichText::new(f.category).color(category_color(f.category)));
                ui.label(format!("{}: {}", f.name, f.value));
                ui.end_row();
            }
        });
    ui.add_space(6.0);

    ui.strong("Insights");
    for line in insights(language) {
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.colored_label(color, "•");
            ui.label(line);
        });
    }
    ui.add_space(6.0);

    ui.strong(format!("Other {} languages", language.family_label()));
    if let Some(id) = expandable_language_list(ui, "analysis_relatives", relatives) {
        action = Some(InfoAction::Select(id));
    }
    action
}

pub fn analysis_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(language) = state.view.selected_language() else {
        state.windows.analysis = false;
        return;
    };
    let mut open = state.windows.analysis;
    let mut action = None;
    let relatives: Vec<&Language> = state
        .view
        .atlas
        .family_members(language.family_label())
        .into_iter()
        .filter(|l| l.id != language.id)
        .collect();

    egui::Window::new(format!("Analysis – {}", language.name))
        .id(egui::Id::new("analysis_window"))
        .open(&mut open)
        .default_width(380.0)
        .show(ctx, |ui: &mut Ui| {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                action = analysis_body(ui, language, &relatives);
            });
        });

    state.windows.analysis = open;
    apply(state, action);
}

// ---------------------------------------------------------------------------
// Attribute tree window
// ---------------------------------------------------------------------------

pub fn attribute_tree_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(language) = state.view.selected_language() else {
        state.windows.attribute_tree = false;
        return;
    };
    let mut open = state.windows.attribute_tree;

    egui::Window::new(format!("Attribute tree – {}", language.name))
        .id(egui::Id::new("attribute_tree_window"))
        .open(&mut open)
        .default_width(420.0)
        .show(ctx, |ui: &mut Ui| {
            let grouped = group_features_by_category(language);
            if grouped.is_empty() {
                ui.weak("No features recorded.");
                return;
            }
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                ui.label(RichText::new(&language.name).heading());
                for (category, entries) in &grouped {
                    let color = category_color(category);
                    egui::CollapsingHeader::new(RichText::new(*category).color(color).strong())
                        .id_salt(("attribute_tree", *category))
                        .default_open(true)
                        .show(ui, |ui: &mut Ui| {
                            for entry in entries {
                                ui.horizontal_wrapped(|ui: &mut Ui| {
                                    ui.colored_label(color, "├");
                                    ui.label(RichText::new(entry.name).strong());
                                    ui.label(entry.value);
                                });
                            }
                        });
                }
            });
        });

    state.windows.attribute_tree = open;
}
