mod app;
mod color;
mod config;
mod data;
mod prefs;
mod refresh;
mod state;
mod ui;

use app::BbmDashboardApp;
use config::Config;
use eframe::egui;
use prefs::PreferenceStore;

fn main() -> eframe::Result {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e:#}");
            eprintln!("Invalid configuration: {e:#}");
            std::process::exit(2);
        }
    };

    let prefs = PreferenceStore::open(&config.prefs_path).unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable preferences: {e:#}");
        PreferenceStore::empty(&config.prefs_path)
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "BBM Dashboard – Fuel Monitoring",
        options,
        Box::new(|cc| Ok(Box::new(BbmDashboardApp::new(cc, config, prefs)))),
    )
}
