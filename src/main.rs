use eframe::egui;
use wals_explorer::app::WalsExplorerApp;
use wals_explorer::config::AtlasConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AtlasConfig::load_from_env();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "WALS Explorer",
        options,
        Box::new(|cc| Ok(Box::new(WalsExplorerApp::new(cc, config)))),
    )
}
