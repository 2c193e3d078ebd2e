//! Collision Insight - Motor Vehicle Collision Dashboard
//!
//! Loads a CSV of collision records and shows where and when people are
//! injured: a map, an hourly heat layer, a minute breakdown and the most
//! dangerous streets.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use config::{DashboardConfig, CONFIG_FILE};
use eframe::egui;
use gui::CollisionApp;
use std::path::Path;
use tracing::info;

fn init_logging() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("collision_insight=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config = DashboardConfig::load_or_default(Path::new(CONFIG_FILE));
    info!(
        "Starting Collision Insight with {} (max {} rows)",
        config.data_path.display(),
        config.max_rows
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Collision Insight"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Collision Insight",
        options,
        Box::new(|cc| Ok(Box::new(CollisionApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start dashboard: {}", e))
}
