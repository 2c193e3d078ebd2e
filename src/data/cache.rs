//! Dataset cache keyed by source path and row cap.

use super::dataset::Dataset;
use super::loader::{DataLoader, LoaderError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Memoizes loaded datasets for the lifetime of the process.
///
/// Source files are treated as immutable, so entries are never invalidated.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, usize), Rc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached dataset for `(path, max_rows)`, loading it on a miss.
    ///
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, path: &Path, max_rows: usize) -> Result<Rc<Dataset>, LoaderError> {
        let key = (path.to_path_buf(), max_rows);
        if let Some(dataset) = self.entries.get(&key) {
            debug!("Cache hit for {} ({} rows)", path.display(), max_rows);
            return Ok(Rc::clone(dataset));
        }

        let dataset = Rc::new(DataLoader::load(path, max_rows)?);
        self.entries.insert(key, Rc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_sample(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("crashes.csv");
        let body = [
            "CRASH_DATE,CRASH_TIME,LATITUDE,LONGITUDE,NUMBER OF PERSONS INJURED,NUMBER OF PEDESTRIANS INJURED,NUMBER OF CYCLIST INJURED,NUMBER OF MOTORIST INJURED,ON STREET NAME",
            "07/14/2019,5:10,40.7,-73.9,2,1,0,1,BROADWAY",
            "07/14/2019,6:20,40.8,-73.8,0,0,0,0,WEST STREET",
        ]
        .join("\n");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_cache_hit_returns_same_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path, 10).unwrap();
        let second = cache.get_or_load(&path, 10).unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_does_not_reread_file() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(&path, 10).unwrap();
        fs::remove_file(&path).unwrap();
        let second = cache.get_or_load(&path, 10).unwrap();

        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_cache_keys_on_row_cap() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let mut cache = DatasetCache::new();

        let one = cache.get_or_load(&path, 1).unwrap();
        let all = cache.get_or_load(&path, 10).unwrap();

        assert_eq!(one.len(), 1);
        assert_eq!(all.len(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_skips_failed_loads() {
        let mut cache = DatasetCache::new();
        assert!(cache.get_or_load(Path::new("/nonexistent.csv"), 10).is_err());
        assert!(cache.is_empty());
    }
}
