//! Stats module - Aggregations over collision datasets

mod calculator;

pub use calculator::{
    DensityCell, HistogramBucket, StatsCalculator, StatsError, StreetRanking,
    DEFAULT_TOP_STREETS, MINUTES_PER_HOUR,
};
