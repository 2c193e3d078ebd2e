//! Statistics Calculator Module
//! Aggregations behind the dashboard views: minute histogram, street
//! rankings, map centroid and the density grid for the heat layer.

use crate::data::{Category, Dataset};
use std::collections::HashMap;
use thiserror::Error;

/// Number of minute buckets in an hourly histogram.
pub const MINUTES_PER_HOUR: usize = 60;

/// Default number of streets in a ranking.
pub const DEFAULT_TOP_STREETS: usize = 5;

/// Approximate length of one degree of latitude.
const METERS_PER_DEGREE: f64 = 111_320.0;

#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("Density cell size must be a positive number of meters, got {0}")]
    InvalidCellSize(f64),
}

/// Crash count for one minute of the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramBucket {
    pub minute: u32,
    pub crashes: usize,
}

/// One row of a street ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetRanking {
    pub street_name: String,
    pub injury_count: u32,
}

/// Square map cell of the heat layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityCell {
    pub latitude: f64,
    pub longitude: f64,
    pub count: usize,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Count records per timestamp minute.
    ///
    /// Always returns 60 buckets in ascending minute order. Callers pass the
    /// subset for a single hour.
    pub fn minute_histogram(dataset: &Dataset) -> Vec<HistogramBucket> {
        let mut counts = [0usize; MINUTES_PER_HOUR];
        for record in dataset {
            counts[record.minute() as usize] += 1;
        }

        counts
            .iter()
            .enumerate()
            .map(|(minute, &crashes)| HistogramBucket {
                minute: minute as u32,
                crashes,
            })
            .collect()
    }

    /// Streets with the highest injury count for `category`.
    ///
    /// Rows with a zero count or no street name are skipped. Equal counts
    /// are ordered by street name, then by row order. Must be given the
    /// unfiltered dataset.
    pub fn top_streets(original: &Dataset, category: Category, limit: usize) -> Vec<StreetRanking> {
        let mut ranked: Vec<StreetRanking> = original
            .iter()
            .filter_map(|record| {
                let injury_count = category.injured(record);
                if injury_count < 1 {
                    return None;
                }
                record.on_street_name.as_ref().map(|name| StreetRanking {
                    street_name: name.clone(),
                    injury_count,
                })
            })
            .collect();

        // Stable sort keeps row order for full ties.
        ranked.sort_by(|a, b| {
            b.injury_count
                .cmp(&a.injury_count)
                .then_with(|| a.street_name.cmp(&b.street_name))
        });
        ranked.truncate(limit);
        ranked
    }

    /// Mean latitude and longitude, `None` for an empty dataset.
    pub fn centroid(dataset: &Dataset) -> Option<(f64, f64)> {
        use statrs::statistics::Statistics;

        if dataset.is_empty() {
            return None;
        }
        let latitude = dataset.iter().map(|r| r.latitude).mean();
        let longitude = dataset.iter().map(|r| r.longitude).mean();
        Some((latitude, longitude))
    }

    /// Bin coordinates into square cells roughly `cell_meters` on a side.
    ///
    /// Longitude width is corrected by the cosine of the mean latitude.
    /// Cells come back densest first.
    pub fn density_grid(dataset: &Dataset, cell_meters: f64) -> Result<Vec<DensityCell>, StatsError> {
        if !cell_meters.is_finite() || cell_meters <= 0.0 {
            return Err(StatsError::InvalidCellSize(cell_meters));
        }
        let Some((mean_lat, _)) = Self::centroid(dataset) else {
            return Ok(Vec::new());
        };

        let lat_step = cell_meters / METERS_PER_DEGREE;
        let lon_step = lat_step / mean_lat.to_radians().cos().abs().max(0.01);

        let mut counts: HashMap<(i64, i64), usize> = HashMap::new();
        for record in dataset {
            let key = (
                (record.latitude / lat_step).floor() as i64,
                (record.longitude / lon_step).floor() as i64,
            );
            *counts.entry(key).or_default() += 1;
        }

        let mut keyed: Vec<((i64, i64), usize)> = counts.into_iter().collect();
        keyed.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        Ok(keyed
            .into_iter()
            .map(|((row, col), count)| DensityCell {
                latitude: (row as f64 + 0.5) * lat_step,
                longitude: (col as f64 + 0.5) * lon_step,
                count,
            })
            .collect())
    }
}
