//! Collision Insight Main Application
//! Main window with control panel and dashboard views.

use crate::charts::ChartRenderer;
use crate::config::DashboardConfig;
use crate::data::DatasetCache;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info};

/// Main application window.
pub struct CollisionApp {
    config: DashboardConfig,
    cache: DatasetCache,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl CollisionApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.category()),
            chart_viewer: ChartViewer::new(
                config.heat_cell_meters,
                config.top_streets_limit,
                config.raw_preview_rows,
            ),
            cache: DatasetCache::new(),
            config,
        };
        app.load_source(app.config.data_path.clone());
        app
    }

    /// Load a CSV through the cache and reset the views for it.
    fn load_source(&mut self, path: PathBuf) {
        self.control_panel
            .set_status(&format!("Loading {}...", path.display()));

        match self.cache.get_or_load(&path, self.config.max_rows) {
            Ok(dataset) => {
                let count = dataset.len();
                self.control_panel
                    .update_dataset(path, count, dataset.max_injured());
                self.chart_viewer.set_dataset(dataset);
                self.control_panel
                    .set_status(&format!("Loaded {} records", count));
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.chart_viewer.clear();
                self.control_panel.update_dataset(path, 0, 0);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.load_source(path);
        }
    }

    /// Export the current minute breakdown to PNG
    fn handle_export_chart(&mut self) {
        if !self.chart_viewer.has_data() {
            self.control_panel.set_status("No chart to export");
            return;
        }

        let hour = self.control_panel.settings.hour;
        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(format!("minute_breakdown_{:02}.png", hour))
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match ChartRenderer::export_and_open(
            &self.chart_viewer.views.minute_buckets,
            hour,
            &output_path,
        ) {
            Ok(()) => {
                info!("Chart exported to {}", output_path.display());
                self.control_panel
                    .set_status(&format!("Exported {}", output_path.display()));
            }
            Err(e) => {
                error!("Chart export failed: {}", e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for CollisionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        self.chart_viewer.refresh(&self.control_panel.settings);

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, &self.control_panel.settings);
        });
    }
}
