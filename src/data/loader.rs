//! CSV Data Loader Module
//! Reads the collision CSV with Polars, normalizes its columns and converts
//! the frame into typed records.

use super::dataset::{CollisionRecord, Dataset};
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Source date column, matched case-insensitively.
pub const DATE_COLUMN: &str = "crash_date";
/// Source time column, matched case-insensitively.
pub const TIME_COLUMN: &str = "crash_time";
/// Name of the merged date/time column after lowercasing.
pub const MERGED_COLUMN: &str = "crash_date_crash_time";
/// Canonical name of the merged timestamp column.
pub const TIMESTAMP_COLUMN: &str = "date/time";

pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";
pub const INJURED_PERSONS_COLUMN: &str = "injured_persons";
pub const INJURED_PEDESTRIANS_COLUMN: &str = "injured_pedestrians";
pub const INJURED_CYCLISTS_COLUMN: &str = "injured_cyclists";
pub const INJURED_MOTORISTS_COLUMN: &str = "injured_motorists";
pub const STREET_COLUMN: &str = "on_street_name";

/// Long source labels mapped to the short canonical names.
const COLUMN_ALIASES: [(&str, &str); 4] = [
    ("number_of_persons_injured", INJURED_PERSONS_COLUMN),
    ("number_of_pedestrians_injured", INJURED_PEDESTRIANS_COLUMN),
    ("number_of_cyclist_injured", INJURED_CYCLISTS_COLUMN),
    ("number_of_motorist_injured", INJURED_MOTORISTS_COLUMN),
];

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
    #[error("Row {row}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },
}

/// Loads collision CSV files into a [`Dataset`].
pub struct DataLoader;

impl DataLoader {
    /// Load at most `max_rows` rows from `path`.
    ///
    /// Rows without latitude or longitude are discarded after the row cap
    /// is applied, so the result never exceeds `max_rows`.
    pub fn load(path: &Path, max_rows: usize) -> Result<Dataset, LoaderError> {
        if max_rows == 0 {
            debug!("Row cap is zero, skipping read of {}", path.display());
            return Ok(Dataset::default());
        }

        let df = Self::read_normalized(path, max_rows)?;
        let records = Self::to_records(&df)?;
        info!(
            "Loaded {} collision records from {}",
            records.len(),
            path.display()
        );
        Ok(Dataset::new(records))
    }

    /// Read the CSV and run the column normalization steps.
    pub fn read_normalized(path: &Path, max_rows: usize) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .with_n_rows(Some(max_rows))
            .finish()?
            .collect()?;
        let read_rows = df.height();

        let df = Self::merge_date_time(df)?;
        let df = Self::drop_missing_coordinates(df)?;
        debug!(
            "Dropped {} rows without coordinates",
            read_rows - df.height()
        );

        let mut df = Self::lowercase_columns(df)?;
        Self::rename_timestamp(&mut df)?;
        Ok(df)
    }

    /// Lowercase a header label, turn inner spaces into underscores and
    /// resolve known aliases.
    pub fn canonical_label(label: &str) -> String {
        let lowered = label.trim().to_lowercase().replace(' ', "_");
        COLUMN_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(lowered)
    }

    /// Parse a merged "date time" string.
    pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
        let text = text.trim();
        TIMESTAMP_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    }

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Find a source column whose canonical label equals `wanted`.
    fn find_column(df: &DataFrame, wanted: &str) -> Result<String, LoaderError> {
        Self::column_names(df)
            .into_iter()
            .find(|name| Self::canonical_label(name) == wanted)
            .ok_or_else(|| LoaderError::MissingColumn(wanted.to_string()))
    }

    /// Replace the date and time columns with one `<DATE>_<TIME>` text column.
    fn merge_date_time(df: DataFrame) -> Result<DataFrame, LoaderError> {
        let date_col = Self::find_column(&df, DATE_COLUMN)?;
        let time_col = Self::find_column(&df, TIME_COLUMN)?;

        let dates = df.column(&date_col)?.cast(&DataType::String)?;
        let times = df.column(&time_col)?.cast(&DataType::String)?;
        let merged: Vec<Option<String>> = dates
            .str()?
            .into_iter()
            .zip(times.str()?.into_iter())
            .map(|(d, t)| match (d, t) {
                (Some(d), Some(t)) => Some(format!("{} {}", d.trim(), t.trim())),
                _ => None,
            })
            .collect();

        let merged_name = format!("{}_{}", date_col, time_col);
        let mut df = df.drop(&date_col)?.drop(&time_col)?;
        df.with_column(Column::new(merged_name.into(), merged))?;
        Ok(df)
    }

    fn drop_missing_coordinates(df: DataFrame) -> Result<DataFrame, LoaderError> {
        let lat_col = Self::find_column(&df, LATITUDE_COLUMN)?;
        let lon_col = Self::find_column(&df, LONGITUDE_COLUMN)?;

        let filtered = df
            .lazy()
            .filter(
                col(lat_col.as_str())
                    .is_not_null()
                    .and(col(lon_col.as_str()).is_not_null()),
            )
            .collect()?;
        Ok(filtered)
    }

    fn lowercase_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        let names: Vec<String> = Self::column_names(&df)
            .iter()
            .map(|name| Self::canonical_label(name))
            .collect();
        df.set_column_names(names)?;
        Ok(df)
    }

    /// Rename the merged column to `date/time`. A missing merged column is a
    /// hard error.
    fn rename_timestamp(df: &mut DataFrame) -> Result<(), LoaderError> {
        if !Self::column_names(df).iter().any(|n| n == MERGED_COLUMN) {
            return Err(LoaderError::MissingColumn(MERGED_COLUMN.to_string()));
        }
        df.rename(MERGED_COLUMN, TIMESTAMP_COLUMN.into())?;
        Ok(())
    }

    fn required(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Column, LoaderError> {
        let column = df
            .column(name)
            .map_err(|_| LoaderError::MissingColumn(name.to_string()))?;
        Ok(column.cast(dtype)?)
    }

    /// Convert the normalized frame into records.
    fn to_records(df: &DataFrame) -> Result<Vec<CollisionRecord>, LoaderError> {
        let timestamps = Self::required(df, TIMESTAMP_COLUMN, &DataType::String)?;
        let latitudes = Self::required(df, LATITUDE_COLUMN, &DataType::Float64)?;
        let longitudes = Self::required(df, LONGITUDE_COLUMN, &DataType::Float64)?;
        let persons = Self::required(df, INJURED_PERSONS_COLUMN, &DataType::Int64)?;
        let pedestrians = Self::required(df, INJURED_PEDESTRIANS_COLUMN, &DataType::Int64)?;
        let cyclists = Self::required(df, INJURED_CYCLISTS_COLUMN, &DataType::Int64)?;
        let motorists = Self::required(df, INJURED_MOTORISTS_COLUMN, &DataType::Int64)?;
        let streets = Self::required(df, STREET_COLUMN, &DataType::String)?;

        let timestamps = timestamps.str()?;
        let latitudes = latitudes.f64()?;
        let longitudes = longitudes.f64()?;
        let persons = persons.i64()?;
        let pedestrians = pedestrians.i64()?;
        let cyclists = cyclists.i64()?;
        let motorists = motorists.i64()?;
        let streets = streets.str()?;

        let count = |v: Option<i64>| v.and_then(|v| u32::try_from(v).ok()).unwrap_or(0);

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let raw = timestamps.get(i).unwrap_or_default();
            let timestamp =
                Self::parse_timestamp(raw).ok_or_else(|| LoaderError::InvalidTimestamp {
                    row: i,
                    value: raw.to_string(),
                })?;

            // Casting can still null out a coordinate that was non-numeric text.
            let (Some(latitude), Some(longitude)) = (latitudes.get(i), longitudes.get(i)) else {
                continue;
            };

            let on_street_name = streets
                .get(i)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            records.push(CollisionRecord {
                timestamp,
                latitude,
                longitude,
                injured_persons: count(persons.get(i)),
                injured_pedestrians: count(pedestrians.get(i)),
                injured_cyclists: count(cyclists.get(i)),
                injured_motorists: count(motorists.get(i)),
                on_street_name,
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "CRASH_DATE,CRASH_TIME,LATITUDE,LONGITUDE,NUMBER OF PERSONS INJURED,NUMBER OF PEDESTRIANS INJURED,NUMBER OF CYCLIST INJURED,NUMBER OF MOTORIST INJURED,ON STREET NAME";

    fn write_csv(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn sample_csv() -> String {
        [
            HEADER,
            "07/14/2019,5:10,40.7,-73.9,2,1,0,1,BROADWAY",
            "07/14/2019,5:10,40.8,-73.8,0,0,0,0,",
            "07/14/2019,13:45,,-73.8,1,1,0,0,PARK AVENUE",
            "07/15/2019,23:59,40.6,,4,0,2,2,  ATLANTIC AVENUE  ",
            "07/15/2019,0:01,40.65,-73.95,3,0,3,0,  ATLANTIC AVENUE  ",
        ]
        .join("\n")
    }

    #[test]
    fn test_load_drops_rows_without_coordinates() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "crashes.csv", &sample_csv());

        let ds = DataLoader::load(&path, 100).unwrap();

        assert_eq!(ds.len(), 3);
        assert!(ds.iter().all(|r| r.latitude.is_finite() && r.longitude.is_finite()));
    }

    #[test]
    fn test_load_parses_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "crashes.csv", &sample_csv());

        let ds = DataLoader::load(&path, 100).unwrap();
        let first = &ds.records()[0];

        assert_eq!(first.hour(), 5);
        assert_eq!(first.minute(), 10);
        assert_eq!(first.injured_persons, 2);
        assert_eq!(first.injured_pedestrians, 1);
        assert_eq!(first.injured_motorists, 1);
        assert_eq!(first.on_street_name.as_deref(), Some("BROADWAY"));

        assert_eq!(ds.records()[1].on_street_name, None);
        assert_eq!(
            ds.records()[2].on_street_name.as_deref(),
            Some("ATLANTIC AVENUE")
        );
    }

    #[test]
    fn test_load_respects_row_cap() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "crashes.csv", &sample_csv());

        for cap in 0..7 {
            let ds = DataLoader::load(&path, cap).unwrap();
            assert!(ds.len() <= cap, "cap {} returned {}", cap, ds.len());
        }
        assert_eq!(DataLoader::load(&path, 2).unwrap().len(), 2);
        assert_eq!(DataLoader::load(&path, 3).unwrap().len(), 2);
    }

    #[test]
    fn test_load_normalizes_column_labels() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "crashes.csv", &sample_csv());

        let df = DataLoader::read_normalized(&path, 100).unwrap();
        let names = DataLoader::column_names(&df);

        assert!(names.contains(&TIMESTAMP_COLUMN.to_string()));
        assert!(names.contains(&INJURED_PERSONS_COLUMN.to_string()));
        assert!(names.contains(&STREET_COLUMN.to_string()));
        assert!(!names.iter().any(|n| n == MERGED_COLUMN));
        assert!(names.iter().all(|n| *n == n.to_lowercase()));
    }

    #[test]
    fn test_load_accepts_short_count_labels() {
        let dir = TempDir::new().unwrap();
        let body = [
            "CRASH_DATE,CRASH_TIME,LATITUDE,LONGITUDE,INJURED_PERSONS,INJURED_PEDESTRIANS,INJURED_CYCLISTS,INJURED_MOTORISTS,ON_STREET_NAME",
            "2019-07-14,8:30,40.7,-73.9,1,0,1,0,WEST STREET",
        ]
        .join("\n");
        let path = write_csv(&dir, "short.csv", &body);

        let ds = DataLoader::load(&path, 10).unwrap();

        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].injured_cyclists, 1);
        assert_eq!(ds.records()[0].hour(), 8);
    }

    #[test]
    fn test_load_missing_time_column_fails() {
        let dir = TempDir::new().unwrap();
        let body = [
            "CRASH_DATE,LATITUDE,LONGITUDE,NUMBER OF PERSONS INJURED",
            "07/14/2019,40.7,-73.9,1",
        ]
        .join("\n");
        let path = write_csv(&dir, "broken.csv", &body);

        let err = DataLoader::load(&path, 10).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == TIME_COLUMN));
    }

    #[test]
    fn test_rename_without_merged_column_fails() {
        let mut df = DataFrame::new(vec![Column::new("latitude".into(), vec![40.7])]).unwrap();

        let err = DataLoader::rename_timestamp(&mut df).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(ref c) if c == MERGED_COLUMN));
    }

    #[test]
    fn test_load_mixed_case_headers() {
        let dir = TempDir::new().unwrap();
        let body = [
            "Crash Date,Crash Time ,Latitude,Longitude,Number of Persons Injured,Number of Pedestrians Injured,Number of Cyclist Injured,Number of Motorist Injured,On Street Name",
            "07/14/2019,1:00,40.7,-73.9,1,1,0,0,BROADWAY",
        ]
        .join("\n");
        let path = write_csv(&dir, "mixed.csv", &body);

        let ds = DataLoader::load(&path, 10).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].hour(), 1);
    }

    #[test]
    fn test_load_invalid_timestamp_fails() {
        let dir = TempDir::new().unwrap();
        let body = [HEADER, "not a date,5:10,40.7,-73.9,2,1,0,1,BROADWAY"].join("\n");
        let path = write_csv(&dir, "bad_ts.csv", &body);

        let err = DataLoader::load(&path, 10).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidTimestamp { row: 0, .. }));
    }

    #[test]
    fn test_load_nonexistent_file_fails() {
        let result = DataLoader::load(Path::new("/nonexistent/crashes.csv"), 10);
        assert!(result.is_err());
    }

    #[test]
    fn test_canonical_label() {
        assert_eq!(DataLoader::canonical_label("CRASH DATE"), "crash_date");
        assert_eq!(
            DataLoader::canonical_label("NUMBER OF CYCLIST INJURED"),
            INJURED_CYCLISTS_COLUMN
        );
        assert_eq!(DataLoader::canonical_label("date/time"), "date/time");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let a = DataLoader::parse_timestamp("07/14/2019 0:05").unwrap();
        let b = DataLoader::parse_timestamp("2019-07-14 00:05:00").unwrap();
        assert_eq!(a, b);
        assert!(DataLoader::parse_timestamp("14.07.2019 00:05").is_none());
    }
}
