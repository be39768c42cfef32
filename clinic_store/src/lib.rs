//! SQLite store behind the clinic statistics engine.
//!
//! Holds the diesel schema and embedded migrations of the clinic tables, and
//! [`SqliteConnector`], the [`clinic_stats::source::ReaderFactory`] the `clinic-stats` binary
//! hands to the orchestrator.

pub mod config;
pub mod dates;
pub mod db;
pub mod models;
pub mod repo;
pub mod schema;

pub use repo::{SqliteConnector, SqliteStatsReader};
