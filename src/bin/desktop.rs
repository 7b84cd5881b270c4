use anyhow::Result;
use eframe::egui;
use env_logger::Env;

use rusty_listings::app::ListingsApp;
use rusty_listings::config::DashboardConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_process()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Listings – Smartphone Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(ListingsApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running viewer: {e}"))
}
