mod app;
mod color;
mod data;
mod state;
mod ui;

use anyhow::Context;
use app::RenewatchApp;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // File-missing or schema errors are fatal at startup; everything after
    // this point works off the immutable cached table.
    let table = data::loader::load().context("loading renewable energy dataset")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Renewatch – Global Renewable Energy Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(RenewatchApp::new(table)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
