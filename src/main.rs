mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use app::PenguinsApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load().context("loading dashboard configuration")?;

    // A missing or broken dataset is fatal: there is no degraded mode.
    let dataset = match config.resolve_data_path(std::env::args_os().nth(1).map(PathBuf::from)) {
        Some(path) => data::loader::load_file(&path)?,
        None => data::loader::load_bundled()?,
    };
    log::info!(
        "Loaded {} penguins ({} species)",
        dataset.len(),
        dataset.species().len()
    );
    let dataset = Arc::new(dataset);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(PenguinsApp::new(dataset, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
