mod app;
mod color;
mod state;
mod ui;

use aging_atlas::config::Settings;
use app::AgingAtlasApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::resolve(std::env::args().skip(1))?;
    log::info!("Dataset: {}", settings.dataset_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Aging Atlas – Cognitive Health & Aging",
        options,
        Box::new(move |_cc| Ok(Box::new(AgingAtlasApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
