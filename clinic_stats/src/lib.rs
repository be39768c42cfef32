//! Statistics aggregation engine for the clinic dashboard.
//!
//! The engine fans out one read task per metric source, turns the raw dated rows into dense
//! calendar-bucketed series and assembles a single [`models::report::StatisticsReport`]:
//!
//! - [`aggregate`] buckets observations per day / ISO week / month / year.
//! - [`compose`] re-windows and merges series (total money across sources).
//! - [`fetchers`] wraps each collaborator read into a typed metric result.
//! - [`orchestrator`] runs all fetchers concurrently and joins on all of them.
//! - [`assemble`] derives the cross-source fields once every fetcher is done.
//!
//! Data access is abstracted behind [`source::ReaderFactory`]; `clinic_store` provides the SQLite
//! implementation and `memory` (feature `test-util`) an in-memory one.

pub mod aggregate;
pub mod assemble;
pub mod bucket;
pub mod compose;
pub mod config;
pub mod errors;
pub mod fetchers;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod models;
pub mod orchestrator;
pub mod source;

pub use errors::{SourceError, StatsError};
pub use orchestrator::AggregationOrchestrator;
