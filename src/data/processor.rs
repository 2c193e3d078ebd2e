//! Data Processor Module
//! Row filters applied to a dataset for the map and hourly views.

use super::dataset::{CollisionRecord, Dataset};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("Unknown category '{0}', expected pedestrians, cyclists or motorists")]
    UnknownCategory(String),
}

/// Victim category selecting which injury count drives a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pedestrians,
    Cyclists,
    Motorists,
}

impl Default for Category {
    fn default() -> Self {
        Category::Pedestrians
    }
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Pedestrians,
        Category::Cyclists,
        Category::Motorists,
    ];

    /// Injury count of this category for one record.
    pub fn injured(&self, record: &CollisionRecord) -> u32 {
        match self {
            Category::Pedestrians => record.injured_pedestrians,
            Category::Cyclists => record.injured_cyclists,
            Category::Motorists => record.injured_motorists,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Pedestrians => "Pedestrians",
            Category::Cyclists => "Cyclists",
            Category::Motorists => "Motorists",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ProcessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pedestrians" => Ok(Category::Pedestrians),
            "cyclists" => Ok(Category::Cyclists),
            "motorists" => Ok(Category::Motorists),
            _ => Err(ProcessorError::UnknownCategory(s.to_string())),
        }
    }
}

/// Stateless filters; each returns a new dataset and leaves the input untouched.
pub struct DataProcessor;

impl DataProcessor {
    /// Keep records with at least `threshold` injured persons.
    pub fn filter_by_min_injured(dataset: &Dataset, threshold: u32) -> Dataset {
        dataset
            .iter()
            .filter(|r| r.injured_persons >= threshold)
            .cloned()
            .collect()
    }

    /// Keep records whose timestamp hour equals `hour`.
    pub fn filter_by_hour(dataset: &Dataset, hour: u32) -> Dataset {
        dataset
            .iter()
            .filter(|r| r.hour() == hour)
            .cloned()
            .collect()
    }
}
