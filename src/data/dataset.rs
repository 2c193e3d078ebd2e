//! Collision Record Model
//! Typed rows produced by the loader and consumed by filters and stats.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

/// One motor vehicle collision event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionRecord {
    pub timestamp: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub injured_persons: u32,
    pub injured_pedestrians: u32,
    pub injured_cyclists: u32,
    pub injured_motorists: u32,
    pub on_street_name: Option<String>,
}

impl CollisionRecord {
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn minute(&self) -> u32 {
        self.timestamp.minute()
    }
}

/// Ordered collection of collision records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<CollisionRecord>,
}

impl Dataset {
    pub fn new(records: Vec<CollisionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CollisionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CollisionRecord> {
        self.records.iter()
    }

    /// Largest `injured_persons` value, 0 when empty.
    ///
    /// Drives the upper bound of the injury slider, so call it on the
    /// unfiltered snapshot.
    pub fn max_injured(&self) -> u32 {
        self.records
            .iter()
            .map(|r| r.injured_persons)
            .max()
            .unwrap_or(0)
    }

    /// Coordinate pairs as `[longitude, latitude]` for plotting.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.records
            .iter()
            .map(|r| [r.longitude, r.latitude])
            .collect()
    }
}

impl FromIterator<CollisionRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = CollisionRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a CollisionRecord;
    type IntoIter = std::slice::Iter<'a, CollisionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::NaiveDate;

    /// Build a record at the given clock time with the other fields zeroed.
    pub fn record(hour: u32, minute: u32, lat: f64, lon: f64, injured: u32) -> CollisionRecord {
        let timestamp = NaiveDate::from_ymd_opt(2019, 7, 14)
            .and_then(|d| d.and_hms_opt(hour, minute, 0))
            .unwrap();
        CollisionRecord {
            timestamp,
            latitude: lat,
            longitude: lon,
            injured_persons: injured,
            injured_pedestrians: 0,
            injured_cyclists: 0,
            injured_motorists: 0,
            on_street_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn max_injured_of_empty_dataset_is_zero() {
        assert_eq!(Dataset::default().max_injured(), 0);
    }

    #[test]
    fn max_injured_picks_largest_count() {
        let ds: Dataset = vec![
            record(1, 0, 40.7, -73.9, 3),
            record(2, 0, 40.7, -73.9, 7),
            record(3, 0, 40.7, -73.9, 0),
        ]
        .into_iter()
        .collect();
        assert_eq!(ds.max_injured(), 7);
    }

    #[test]
    fn coordinates_are_lon_lat_pairs() {
        let ds = Dataset::new(vec![record(5, 10, 40.7, -73.9, 2)]);
        assert_eq!(ds.coordinates(), vec![[-73.9, 40.7]]);
    }

    #[test]
    fn hour_and_minute_come_from_timestamp() {
        let r = record(17, 42, 40.7, -73.9, 0);
        assert_eq!(r.hour(), 17);
        assert_eq!(r.minute(), 42);
    }
}
