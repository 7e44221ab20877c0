use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::family_color;
use crate::data::region::Region;
use crate::data::source::FileSource;
use crate::state::{AppState, LoadState};
use crate::ui::charts;

// ---------------------------------------------------------------------------
// Left side panel – filters, search and statistics
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.view.atlas.is_empty() {
        ui.label(if state.is_loading() {
            "Waiting for data…"
        } else {
            "No languages loaded."
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            family_filter(ui, state);
            region_filter(ui, state);

            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Clear filters").clicked() {
                    state.clear_filters();
                }
                if ui
                    .add_enabled(state.view.zoom.is_some(), egui::Button::new("Clear zoom"))
                    .clicked()
                {
                    state.clear_zoom();
                }
            });
            ui.separator();

            search_box(ui, state);
            ui.separator();

            stats(ui, state);
            ui.separator();

            egui::CollapsingHeader::new(RichText::new("Language families").strong())
                .id_salt("family_chart")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    charts::family_bar_chart(ui, &state.model.top_families);
                });
        });
}

fn family_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Family");
    let families = state.view.atlas.families.clone();
    let current = state.view.selected_family.clone();
    egui::ComboBox::from_id_salt("family_filter")
        .selected_text(current.as_deref().unwrap_or("All families"))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current.is_none(), "All families")
                .clicked()
            {
                state.select_family(None);
            }
            for family in &families {
                let text = RichText::new(family).color(family_color(family));
                if ui
                    .selectable_label(current.as_deref() == Some(family.as_str()), text)
                    .clicked()
                {
                    state.select_family(Some(family.as_str()));
                }
            }
        });
}

fn region_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Region");
    let current = state.view.selected_region;
    egui::ComboBox::from_id_salt("region_filter")
        .selected_text(current.map(|r| r.label()).unwrap_or("All regions"))
        .width(ui.available_width() - 8.0)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), "All regions").clicked() {
                state.select_region(None);
            }
            for &region in Region::all() {
                if ui
                    .selectable_label(current == Some(region), region.label())
                    .clicked()
                {
                    state.select_region(Some(region));
                }
            }
        });
}

fn search_box(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Search");
    let mut query = state.view.search_query.clone();
    let edit = egui::TextEdit::singleline(&mut query).hint_text("Search languages…");
    if ui.add(edit).changed() {
        state.set_search(&query);
    }

    if query.trim().is_empty() {
        return;
    }
    if state.model.search_matches.is_empty() {
        ui.weak("No languages found.");
        return;
    }

    let mut picked = None;
    for lang in state.view.atlas.select(&state.model.search_matches) {
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(family_color(lang.family_label()), "●");
            if ui
                .selectable_label(false, format!("{} ({})", lang.name, lang.family_label()))
                .clicked()
            {
                picked = Some(lang.id.clone());
            }
        });
    }
    if let Some(id) = picked {
        state.select_language(&id);
    }
}

fn stats(ui: &mut Ui, state: &AppState) {
    ui.strong("Language stats");
    ui.label(format!("Total languages: {}", state.model.visible.len()));
    ui.label(format!("Families: {}", state.model.family_total()));
    ui.add_space(4.0);
    ui.label("Top families:");
    for fc in state.model.family_counts.iter().take(state.config.stats_top_n) {
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(family_color(&fc.family), "■");
            ui.label(format!("{}: {}", fc.family, fc.count));
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), state);
                ui.close_menu();
            }
            if ui.button("Load sample data").clicked() {
                let source = state.config.synthetic_source();
                state.start_load(source, Some(ui.ctx()));
                ui.close_menu();
            }
        });

        ui.menu_button("View", |ui: &mut Ui| {
            ui.checkbox(&mut state.windows.feature_tree, "Feature tree analysis");
            ui.checkbox(&mut state.windows.lineage, "Family lineage");
            ui.checkbox(&mut state.windows.guide, "Category guide");
            ui.separator();
            if ui.button("Reset map").clicked() {
                state.reset_view();
                ui.close_menu();
            }
        });

        ui.separator();

        match state.load.clone() {
            LoadState::Idle => {
                ui.label("No data loaded");
            }
            LoadState::Loading { source } => {
                ui.spinner();
                ui.label(format!("Loading {source}…"));
            }
            LoadState::Loaded { .. } => {
                ui.label(format!(
                    "{} languages loaded, {} visible",
                    state.view.atlas.len(),
                    state.model.visible.len()
                ));
            }
            LoadState::Failed { source, message } => {
                ui.label(
                    RichText::new(format!("Failed to load {source}: {message}"))
                        .color(Color32::RED),
                );
                if ui.button("Retry").clicked() {
                    state.retry(Some(ui.ctx()));
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open language data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.start_load(Arc::new(FileSource::new(path)), Some(ctx));
    }
}
