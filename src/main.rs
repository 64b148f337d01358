mod app;
mod color;
mod state;
mod ui;

use app::FtirApp;
use eframe::egui;
use ftir_peak_analyzer::analysis::catalog::ReferenceCatalog;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let catalog = ReferenceCatalog::builtin();
    log::info!("Reference catalog: {} substances", catalog.len());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FTIR Peak Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(FtirApp::new(AppState::new(catalog))))),
    )
}
