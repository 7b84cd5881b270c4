use std::sync::Arc;

use anyhow::{Context, Result};
use env_logger::Env;

use rusty_listings::config::DashboardConfig;
use rusty_listings::data::loader;
use rusty_listings::server;
use rusty_listings::state::Dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_process()?;
    let table = loader::load(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let dashboard = Arc::new(Dashboard::new(
        table,
        config.view_settings(),
        config.price_step,
    ));
    server::serve(dashboard, config.bind)
        .await
        .context("serving dashboard")
}
