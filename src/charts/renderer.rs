//! Static Chart Renderer
//! Renders the minute breakdown to a PNG file with plotters.

use crate::stats::HistogramBucket;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const BAR_COLOR: RGBColor = RGBColor(100, 149, 237);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Image size must be non-zero, got {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("Chart rendering failed: {0}")]
    Render(String),
    #[error("Failed to open exported chart: {0}")]
    Open(#[from] std::io::Error),
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Upper bound of the y axis with some headroom above the tallest bar.
    pub fn y_axis_max(buckets: &[HistogramBucket]) -> u32 {
        let max = buckets.iter().map(|b| b.crashes).max().unwrap_or(0) as u32;
        max + max / 10 + 1
    }

    pub fn hour_caption(hour: u32) -> String {
        format!(
            "Breakdown by minute between {}:00 and {}:00",
            hour % 24,
            (hour + 1) % 24
        )
    }

    /// Write a bar chart of `buckets` to `path` as PNG.
    pub fn render_minute_histogram(
        buckets: &[HistogramBucket],
        hour: u32,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        if width == 0 || height == 0 {
            return Err(ExportError::InvalidSize(width, height));
        }
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| ExportError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(Self::hour_caption(hour), ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..60u32).into_segmented(), 0u32..Self::y_axis_max(buckets))
            .map_err(|e| ExportError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Minutes")
            .y_desc("Crashes")
            .draw()
            .map_err(|e| ExportError::Render(e.to_string()))?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(BAR_COLOR.filled())
                    .margin(1)
                    .data(buckets.iter().map(|b| (b.minute, b.crashes as u32))),
            )
            .map_err(|e| ExportError::Render(e.to_string()))?;

        root.present().map_err(|e| ExportError::Render(e.to_string()))?;
        info!("Exported minute chart to {}", path.display());
        Ok(())
    }

    /// Render, then open the PNG with the system image viewer.
    pub fn export_and_open(
        buckets: &[HistogramBucket],
        hour: u32,
        path: &Path,
    ) -> Result<(), ExportError> {
        Self::render_minute_histogram(buckets, hour, path, 1200, 600)?;
        open::that(path)?;
        Ok(())
    }
}
