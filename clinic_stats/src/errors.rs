use std::time::Duration;

use thiserror::Error;

use crate::source::SourceKind;

/// Errors raised by a data collaborator while serving one read.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A handle to the data source could not be opened.
    #[error("Could not open data source: {0}")]
    Connect(String),

    /// The read itself failed (query error, connectivity, ...).
    #[error("Query failed: {0}")]
    Query(String),

    /// A row came back in a shape the fetcher cannot use.
    #[error("Malformed row: {0}")]
    Malformed(String),

    /// The fetcher panicked; caught at the task boundary.
    #[error("Fetcher panicked: {0}")]
    Panicked(String),
}

/// The unified error type of the aggregation engine.
#[derive(Debug, Error)]
pub enum StatsError {
    /// A fetcher's underlying read failed.
    #[error("Statistics source {kind} unavailable: {source}")]
    SourceUnavailable {
        /// The failed source.
        kind: SourceKind,
        /// What the collaborator reported.
        source: SourceError,
    },

    /// Series could not be brought onto one bucket window.
    #[error("Misaligned series: {0}")]
    MisalignedSeries(String),

    /// The caller's deadline expired before every fetcher finished.
    #[error("Statistics report timed out after {0:?}")]
    Timeout(Duration),

    /// The runtime for the blocking entry point could not be started.
    #[error("Failed to start async runtime")]
    Runtime(#[from] std::io::Error),
}
