//! Data module - CSV loading, caching and filtering

mod cache;
mod dataset;
mod loader;
mod processor;

pub use cache::DatasetCache;
pub use dataset::{CollisionRecord, Dataset};
pub use loader::{DataLoader, LoaderError};
pub use processor::{Category, DataProcessor, ProcessorError};

#[cfg(test)]
pub(crate) use dataset::test_support;
