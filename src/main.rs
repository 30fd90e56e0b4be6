mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod export;
mod layout;
mod selector;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use config::Config;
use state::AppState;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();
    log::debug!("{config:#?}");

    let selectors = config.selectors().context("invalid selector value")?;

    let table = match data::loader::load_file(&config.data) {
        Ok(table) => Arc::new(table),
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", config.data.display());
            return Err(e).context("loading customer data");
        }
    };

    if let Some(path) = &config.export {
        let charts = chart::resolve(&selectors, &table);
        return export::write_charts(path, &charts);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    let state = AppState::new(table, selectors, config.debug);
    eframe::run_native(
        "Análisis de Clientes",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
