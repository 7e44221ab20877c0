use eframe::egui;

use crate::config::AtlasConfig;
use crate::state::{AppState, LoadState};
use crate::ui::{info, map, panels, tree};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WalsExplorerApp {
    pub state: AppState,
}

impl WalsExplorerApp {
    /// Build the app and kick off the initial synthetic load.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AtlasConfig) -> Self {
        let mut state = AppState::new(config);
        let source = state.config.synthetic_source();
        state.start_load(source, Some(&cc.egui_ctx));
        Self { state }
    }
}

impl eframe::App for WalsExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();

        let dt = ctx.input(|i| i.stable_dt).min(0.1) as f64;
        if self.state.animate(dt) {
            ctx.request_repaint();
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: selected language ----
        if self.state.view.selected_language().is_some() {
            egui::SidePanel::right("info_panel")
                .default_width(300.0)
                .resizable(true)
                .show(ctx, |ui| {
                    info::info_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: map ----
        let load = self.state.load.clone();
        egui::CentralPanel::default().show(ctx, |ui| match load {
            LoadState::Loading { .. } if self.state.view.atlas.is_empty() => {
                ui.centered_and_justified(|ui| {
                    ui.horizontal_centered(|ui| {
                        ui.spinner();
                        ui.heading("Loading language data…");
                    });
                });
            }
            LoadState::Failed { message, .. } if self.state.view.atlas.is_empty() => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.heading("Failed to load language data");
                    ui.label(message);
                    if ui.button("Retry").clicked() {
                        self.state.retry(Some(ui.ctx()));
                    }
                });
            }
            _ => map::world_map(ui, &mut self.state),
        });

        // ---- Floating windows ----
        if self.state.windows.analysis {
            info::analysis_window(ctx, &mut self.state);
        }
        if self.state.windows.attribute_tree {
            info::attribute_tree_window(ctx, &mut self.state);
        }
        if self.state.windows.feature_tree {
            tree::feature_tree_window(ctx, &mut self.state);
        }
        if self.state.windows.lineage {
            tree::lineage_window(ctx, &mut self.state);
        }
        if self.state.windows.guide {
            tree::guide_window(ctx, &mut self.state);
        }
    }
}

impl Drop for WalsExplorerApp {
    fn drop(&mut self) {
        self.state.shutdown();
    }
}
