//! Control Panel Widget
//! Left side panel with the data source and the view filters.

use crate::data::Category;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Filter inputs chosen by the user.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub min_injured: u32,
    pub hour: u32,
    pub category: Category,
    pub show_raw: bool,
}

/// Left side control panel with file selection and filter widgets.
pub struct ControlPanel {
    pub settings: UserSettings,
    /// Upper bound of the injury slider, taken from the full dataset
    pub max_injured: u32,
    pub record_count: usize,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            max_injured: 0,
            record_count: 0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new(category: Category) -> Self {
        let mut panel = Self::default();
        panel.settings.category = category;
        panel
    }

    /// Reset the slider bounds for a newly loaded dataset.
    pub fn update_dataset(&mut self, path: PathBuf, record_count: usize, max_injured: u32) {
        self.settings.csv_path = Some(path);
        self.record_count = record_count;
        self.max_injured = max_injured;
        self.settings.min_injured = self.settings.min_injured.min(max_injured);
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🚗 Collision Insight")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Motor Vehicle Collisions in NYC")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .settings
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.settings.csv_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
                ui.label(
                    RichText::new(format!("{} records", self.record_count))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("🔧 Filters").size(14.0).strong());
        ui.add_space(8.0);

        ui.label("Number of people injured in vehicle collisions");
        ui.add(egui::Slider::new(
            &mut self.settings.min_injured,
            0..=self.max_injured,
        ));

        ui.add_space(8.0);

        ui.label("Hour to look at");
        ui.add(egui::Slider::new(&mut self.settings.hour, 0..=23));

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.add_sized([110.0, 20.0], egui::Label::new("Affected type:"));
            ComboBox::from_id_salt("category")
                .width(150.0)
                .selected_text(self.settings.category.label())
                .show_ui(ui, |ui| {
                    for category in Category::ALL {
                        ui.selectable_value(
                            &mut self.settings.category,
                            category,
                            category.label(),
                        );
                    }
                });
        });

        ui.add_space(8.0);
        ui.checkbox(&mut self.settings.show_raw, "Show raw data");

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.record_count > 0, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Chart").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    ExportChart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dataset_clamps_threshold() {
        let mut panel = ControlPanel::new(Category::Motorists);
        panel.settings.min_injured = 9;

        panel.update_dataset(PathBuf::from("crashes.csv"), 42, 4);

        assert_eq!(panel.settings.min_injured, 4);
        assert_eq!(panel.max_injured, 4);
        assert_eq!(panel.record_count, 42);
        assert_eq!(panel.settings.category, Category::Motorists);
    }
}
