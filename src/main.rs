mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::Path;

use app::AgriDashApp;
use config::{CONFIG_FILE, DashboardConfig};
use eframe::egui;
use state::Session;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Agri Dash – Soil, Crop & Fertilizer Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(AgriDashApp::new(Session::new(config))))),
    )
}
