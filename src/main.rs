mod app;
mod color;
mod config;
mod data;
mod error;
mod inference;
mod state;
mod ui;

use anyhow::Context;
use app::WineQualityApp;
use config::AppConfig;
use data::loader::Artifacts;
use eframe::egui;
use ui::background::Background;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::load()?;

    // Everything the page needs is loaded up front; any failure here stops
    // the window from opening.
    let background = Background::load(&config.background_path)?;
    let artifacts = Artifacts::load(&config.scaler_path, &config.classifier_path)
        .inspect_err(|e| log::error!("{}", e.startup_hint()))
        .context("loading model artifacts")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([480.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(move |cc| Ok(Box::new(WineQualityApp::new(cc, artifacts, background)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
