//! Data model of the aggregation engine.
//!
//! - [`observation`] - the dated input points handed to the bucketer.
//! - [`series`] - dense bucketed series and their per-granularity bundles.
//! - [`report`] - per-source metric reports and the consolidated statistics report.

pub mod observation;
pub mod report;
pub mod series;

pub use observation::Observation;
pub use report::{
    DoctorRankingEntry, Headcounts, MetricReport, OccupancyReport, RoomOccupancyCounts,
    SourceFailure, StatisticsReport, TotalMoneyReport,
};
pub use series::{AggregationMode, BucketedSeries, GranularSeries};
