//! Chart Plotter Module
//! Draws the dashboard views with egui_plot: collision maps, the heat
//! layer, the minute breakdown and the tabular views.

use crate::data::{Category, Dataset};
use crate::stats::{DensityCell, HistogramBucket, StreetRanking};
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

pub const MAP_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
pub const BAR_COLOR: Color32 = Color32::from_rgb(100, 149, 237); // Cornflower
pub const CENTER_COLOR: Color32 = Color32::from_rgb(52, 73, 94); // Dark slate

/// Heat layer bands from sparse to dense
pub const HEAT_PALETTE: [Color32; 5] = [
    Color32::from_rgb(255, 255, 178),
    Color32::from_rgb(254, 204, 92),
    Color32::from_rgb(253, 141, 60),
    Color32::from_rgb(240, 59, 32),
    Color32::from_rgb(189, 0, 38),
];

const MAP_HEIGHT: f32 = 380.0;
const CHART_HEIGHT: f32 = 300.0;
/// Half the width of the initial map view around the centroid, in degrees.
const VIEW_HALF_SPAN: f64 = 0.08;

pub struct ChartPlotter;

impl ChartPlotter {
    /// Heat band for a cell count relative to the densest cell.
    pub fn heat_band(count: usize, max_count: usize) -> usize {
        if max_count == 0 {
            return 0;
        }
        let ratio = count as f64 / max_count as f64;
        ((ratio * HEAT_PALETTE.len() as f64).ceil() as usize).clamp(1, HEAT_PALETTE.len()) - 1
    }

    /// Horizontal stretch of one degree of longitude at `latitude`.
    fn map_aspect(latitude: f64) -> f32 {
        latitude.to_radians().cos().abs().max(0.1) as f32
    }

    /// Scatter of collision locations.
    pub fn draw_point_map(ui: &mut egui::Ui, id: &str, dataset: &Dataset) {
        let points = dataset.coordinates();
        let aspect = points
            .first()
            .map(|p| Self::map_aspect(p[1]))
            .unwrap_or(1.0);

        Plot::new(id)
            .height(MAP_HEIGHT)
            .data_aspect(aspect)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if points.is_empty() {
                    return;
                }
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(1.5)
                        .color(MAP_COLOR.gamma_multiply(0.6))
                        .name("Collisions"),
                );
            });
    }

    /// Density cells drawn in bands, centred on the dataset centroid.
    pub fn draw_heat_layer(
        ui: &mut egui::Ui,
        id: &str,
        cells: &[DensityCell],
        centroid: (f64, f64),
    ) {
        let (center_lat, center_lon) = centroid;
        let max_count = cells.iter().map(|c| c.count).max().unwrap_or(0);

        let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); HEAT_PALETTE.len()];
        for cell in cells {
            bands[Self::heat_band(cell.count, max_count)].push([cell.longitude, cell.latitude]);
        }

        Plot::new(id)
            .height(MAP_HEIGHT)
            .data_aspect(Self::map_aspect(center_lat))
            .include_x(center_lon - VIEW_HALF_SPAN)
            .include_x(center_lon + VIEW_HALF_SPAN)
            .include_y(center_lat - VIEW_HALF_SPAN)
            .include_y(center_lat + VIEW_HALF_SPAN)
            .x_axis_label("Longitude")
            .y_axis_label("Latitude")
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (band, points) in bands.iter().enumerate() {
                    if points.is_empty() {
                        continue;
                    }
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(2.0 + band as f32 * 1.5)
                            .color(HEAT_PALETTE[band])
                            .name(format!("Density band {}", band + 1)),
                    );
                }

                plot_ui.points(
                    Points::new(PlotPoints::from_iter([[center_lon, center_lat]]))
                        .radius(4.0)
                        .shape(egui_plot::MarkerShape::Cross)
                        .color(CENTER_COLOR)
                        .name("Midpoint"),
                );
            });
    }

    /// Bar chart of crashes per minute.
    pub fn draw_minute_chart(ui: &mut egui::Ui, id: &str, buckets: &[HistogramBucket]) {
        let bars: Vec<Bar> = buckets
            .iter()
            .map(|b| {
                Bar::new(b.minute as f64, b.crashes as f64)
                    .width(0.8)
                    .name(format!("minute {}", b.minute))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .x_axis_label("Minutes")
            .y_axis_label("Crashes")
            .include_x(-1.0)
            .include_x(60.0)
            .include_y(0.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR).name("Crashes"));
            });
    }

    /// Street ranking table.
    pub fn draw_ranking_table(ui: &mut egui::Ui, category: Category, rankings: &[StreetRanking]) {
        if rankings.is_empty() {
            ui.label(RichText::new("No injured people in this category").color(Color32::GRAY));
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("street_ranking")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("#").strong());
                        ui.label(RichText::new("On street name").strong());
                        ui.label(RichText::new(format!("Injured {}", category)).strong());
                        ui.end_row();

                        for (rank, entry) in rankings.iter().enumerate() {
                            ui.label((rank + 1).to_string());
                            ui.label(&entry.street_name);
                            ui.label(entry.injury_count.to_string());
                            ui.end_row();
                        }
                    });
            });
    }

    /// First `max_rows` records as a scrollable table.
    pub fn draw_raw_table(ui: &mut egui::Ui, dataset: &Dataset, max_rows: usize) {
        ui.label(
            RichText::new(format!(
                "Showing {} of {} records",
                dataset.len().min(max_rows),
                dataset.len()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );

        ScrollArea::both()
            .id_salt("raw_data")
            .max_height(320.0)
            .show(ui, |ui| {
                egui::Grid::new("raw_data_grid")
                    .striped(true)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        for header in [
                            "date/time",
                            "latitude",
                            "longitude",
                            "injured_persons",
                            "injured_pedestrians",
                            "injured_cyclists",
                            "injured_motorists",
                            "on_street_name",
                        ] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for r in dataset.iter().take(max_rows) {
                            ui.label(r.timestamp.format("%Y-%m-%d %H:%M").to_string());
                            ui.label(format!("{:.5}", r.latitude));
                            ui.label(format!("{:.5}", r.longitude));
                            ui.label(r.injured_persons.to_string());
                            ui.label(r.injured_pedestrians.to_string());
                            ui.label(r.injured_cyclists.to_string());
                            ui.label(r.injured_motorists.to_string());
                            ui.label(r.on_street_name.as_deref().unwrap_or("-"));
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_band_bounds() {
        assert_eq!(ChartPlotter::heat_band(0, 0), 0);
        assert_eq!(ChartPlotter::heat_band(1, 100), 0);
        assert_eq!(ChartPlotter::heat_band(100, 100), HEAT_PALETTE.len() - 1);
        assert_eq!(ChartPlotter::heat_band(50, 100), 2);
    }
}
