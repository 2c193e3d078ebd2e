//! Dashboard configuration.
//!
//! Settings are read from an optional JSON file in the working directory.
//! Missing fields fall back to their defaults.

use crate::data::Category;
use crate::stats::DEFAULT_TOP_STREETS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "collision_insight.json";

pub const DEFAULT_DATA_PATH: &str = "Motor_Vehicle_Collisions_-_Crashes.csv";
pub const DEFAULT_MAX_ROWS: usize = 100_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV loaded at startup
    pub data_path: PathBuf,

    /// Row cap applied when reading the CSV
    pub max_rows: usize,

    /// Entries shown in the dangerous streets table
    pub top_streets_limit: usize,

    /// Edge length of a heat layer cell in meters
    pub heat_cell_meters: f64,

    /// Rows shown when the raw data table is enabled
    pub raw_preview_rows: usize,

    /// Category selected when the window opens
    pub default_category: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            max_rows: DEFAULT_MAX_ROWS,
            top_streets_limit: DEFAULT_TOP_STREETS,
            heat_cell_meters: 100.0,
            raw_preview_rows: 200,
            default_category: Category::default().label().to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists, otherwise defaults. Errors are logged and
    /// replaced by defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Category named by `default_category`, falling back to pedestrians.
    pub fn category(&self) -> Category {
        self.default_category.parse().unwrap_or_else(|e| {
            warn!("{}", e);
            Category::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.max_rows, 100_000);
        assert_eq!(config.top_streets_limit, 5);
        assert_eq!(config.category(), Category::Pedestrians);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{ "max_rows": 500, "default_category": "cyclists" }"#).unwrap();

        let config = DashboardConfig::load(&path).unwrap();

        assert_eq!(config.max_rows, 500);
        assert_eq!(config.category(), Category::Cyclists);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_PATH));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{ max_rows: ").unwrap();

        assert!(matches!(
            DashboardConfig::load(&path),
            Err(ConfigError::Json { .. })
        ));
        assert_eq!(DashboardConfig::load_or_default(&path), DashboardConfig::default());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = DashboardConfig::load_or_default(Path::new("/nonexistent/config.json"));
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let config = DashboardConfig {
            default_category: "horses".to_string(),
            ..DashboardConfig::default()
        };
        assert_eq!(config.category(), Category::Pedestrians);
    }
}
