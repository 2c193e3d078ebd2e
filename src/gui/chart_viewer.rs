//! Chart Viewer Widget
//! Central scrollable panel showing the map, heat layer, minute breakdown,
//! street ranking and raw data for the current filter settings.

use crate::charts::ChartPlotter;
use crate::data::{Category, DataProcessor, Dataset};
use crate::gui::control_panel::UserSettings;
use crate::stats::{DensityCell, HistogramBucket, StatsCalculator, StreetRanking};
use egui::{Color32, RichText, ScrollArea};
use std::rc::Rc;
use tracing::{debug, warn};

const SECTION_SPACING: f32 = 20.0;

/// Views derived from the snapshot. Each group is rebuilt only when the
/// input it depends on changes.
#[derive(Default)]
pub struct DashboardViews {
    /// Records at or above the injury threshold
    pub injury_map: Dataset,
    /// Records within the selected hour
    pub hour_data: Dataset,
    pub centroid: Option<(f64, f64)>,
    pub heat_cells: Vec<DensityCell>,
    pub minute_buckets: Vec<HistogramBucket>,
    pub rankings: Vec<StreetRanking>,
}

pub struct ChartViewer {
    /// Unfiltered dataset shared with the cache
    snapshot: Option<Rc<Dataset>>,
    pub views: DashboardViews,
    threshold: Option<u32>,
    hour: Option<u32>,
    category: Option<Category>,
    heat_cell_meters: f64,
    top_streets_limit: usize,
    raw_preview_rows: usize,
}

impl ChartViewer {
    pub fn new(heat_cell_meters: f64, top_streets_limit: usize, raw_preview_rows: usize) -> Self {
        Self {
            snapshot: None,
            views: DashboardViews::default(),
            threshold: None,
            hour: None,
            category: None,
            heat_cell_meters,
            top_streets_limit,
            raw_preview_rows,
        }
    }

    pub fn set_dataset(&mut self, snapshot: Rc<Dataset>) {
        self.clear();
        self.snapshot = Some(snapshot);
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
        self.views = DashboardViews::default();
        self.threshold = None;
        self.hour = None;
        self.category = None;
    }

    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Rebuild the views whose inputs differ from the last refresh.
    pub fn refresh(&mut self, settings: &UserSettings) {
        let Some(snapshot) = self.snapshot.clone() else {
            return;
        };

        if self.threshold != Some(settings.min_injured) {
            self.views.injury_map =
                DataProcessor::filter_by_min_injured(&snapshot, settings.min_injured);
            self.threshold = Some(settings.min_injured);
            debug!(
                "Injury map: {} records with >= {} injured",
                self.views.injury_map.len(),
                settings.min_injured
            );
        }

        if self.hour != Some(settings.hour) {
            let hour_data = DataProcessor::filter_by_hour(&snapshot, settings.hour);
            self.views.centroid = StatsCalculator::centroid(&hour_data);
            self.views.heat_cells =
                match StatsCalculator::density_grid(&hour_data, self.heat_cell_meters) {
                    Ok(cells) => cells,
                    Err(e) => {
                        warn!("Heat layer skipped: {}", e);
                        Vec::new()
                    }
                };
            self.views.minute_buckets = StatsCalculator::minute_histogram(&hour_data);
            self.views.hour_data = hour_data;
            self.hour = Some(settings.hour);
        }

        if self.category != Some(settings.category) {
            self.views.rankings =
                StatsCalculator::top_streets(&snapshot, settings.category, self.top_streets_limit);
            self.category = Some(settings.category);
        }
    }

    fn hour_window(hour: u32) -> String {
        format!("between {}:00 and {}:00", hour % 24, (hour + 1) % 24)
    }

    fn section_header(ui: &mut egui::Ui, text: &str) {
        ui.add_space(SECTION_SPACING);
        ui.label(RichText::new(text).size(18.0).strong());
        ui.add_space(8.0);
    }

    /// Draw all dashboard sections
    pub fn show(&self, ui: &mut egui::Ui, settings: &UserSettings) {
        let Some(snapshot) = self.snapshot.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };
        let views = &self.views;
        let window = Self::hour_window(settings.hour);

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::section_header(ui, "Where are the most people injured in NYC?");
                ui.label(format!(
                    "{} collisions with at least {} injured",
                    views.injury_map.len(),
                    settings.min_injured
                ));
                ChartPlotter::draw_point_map(ui, "injury_map", &views.injury_map);

                Self::section_header(
                    ui,
                    "How many people are injured during a given time of the day?",
                );
                ui.label(
                    RichText::new(format!("Vehicle collisions {}", window))
                        .size(14.0)
                        .strong(),
                );
                match views.centroid {
                    Some(centroid) => {
                        ChartPlotter::draw_heat_layer(ui, "heat_layer", &views.heat_cells, centroid);
                    }
                    None => {
                        ui.label(
                            RichText::new("No collisions recorded in this hour")
                                .color(Color32::GRAY),
                        );
                    }
                }

                Self::section_header(ui, &format!("Breakdown by minute {}", window));
                ChartPlotter::draw_minute_chart(ui, "minute_chart", &views.minute_buckets);

                Self::section_header(ui, "Top dangerous streets by affected type");
                ChartPlotter::draw_ranking_table(ui, settings.category, &views.rankings);

                if settings.show_raw {
                    Self::section_header(ui, "Raw Data");
                    ChartPlotter::draw_raw_table(ui, &snapshot, self.raw_preview_rows);
                }
            });
    }
}
