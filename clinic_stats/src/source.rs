//! Collaborator contracts for raw statistics reads.
//!
//! The engine never builds queries itself. A [`ReaderFactory`] hands out one [`StatsReader`]
//! per fetcher task; each reader is used by exactly one task and dropped when that task ends,
//! so implementations backed by handles that are not safe to share (a SQLite connection, for
//! example) open a fresh one in [`ReaderFactory::open`].
//!
//! Reads are synchronous; the orchestrator runs each fetcher on the blocking pool.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use clinic_stats::SourceError;
//! use clinic_stats::models::{DoctorRankingEntry, Headcounts, RoomOccupancyCounts};
//! use clinic_stats::source::{DateSource, DatedSource, ReaderFactory, StatsReader};
//!
//! struct Nothing;
//!
//! impl StatsReader for Nothing {
//!     fn fetch_dated_values(&mut self, _: DatedSource) -> Result<Vec<(NaiveDate, f64)>, SourceError> {
//!         Ok(vec![])
//!     }
//!     fn fetch_dates(&mut self, _: DateSource) -> Result<Vec<NaiveDate>, SourceError> {
//!         Ok(vec![])
//!     }
//!     fn fetch_doctor_ranking(&mut self) -> Result<Vec<DoctorRankingEntry>, SourceError> {
//!         Ok(vec![])
//!     }
//!     fn fetch_room_occupancy_counts(&mut self) -> Result<RoomOccupancyCounts, SourceError> {
//!         Ok(RoomOccupancyCounts::default())
//!     }
//!     fn fetch_headcounts(&mut self) -> Result<Headcounts, SourceError> {
//!         Ok(Headcounts::default())
//!     }
//! }
//!
//! struct NothingFactory;
//!
//! impl ReaderFactory for NothingFactory {
//!     type Reader = Nothing;
//!     fn open(&self) -> Result<Nothing, SourceError> {
//!         Ok(Nothing)
//!     }
//! }
//! ```

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::SourceError;
use crate::models::{AggregationMode, DoctorRankingEntry, Headcounts, RoomOccupancyCounts};

/// Every independent metric source of the report, one fetcher task each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// `(date, result price)` per appointment.
    Appointments,
    /// `(start date, price)` per hospitalization.
    Hospitalizations,
    /// `(date, amount)` per additional payment.
    AdditionalPayments,
    /// `(worker creation date, salary)` per worker.
    Salaries,
    /// Creation date per worker.
    WorkerRegistrations,
    /// Creation date per medical card.
    PatientRegistrations,
    /// Per-doctor appointment count and earned money.
    BestDoctors,
    /// Bed-room and open-hospitalization counts.
    RoomOccupancy,
    /// Staff and patient totals.
    Headcounts,
}

impl SourceKind {
    /// The fixed fetcher set, in report order.
    pub const ALL: [SourceKind; 9] = [
        SourceKind::Appointments,
        SourceKind::Hospitalizations,
        SourceKind::AdditionalPayments,
        SourceKind::Salaries,
        SourceKind::WorkerRegistrations,
        SourceKind::PatientRegistrations,
        SourceKind::BestDoctors,
        SourceKind::RoomOccupancy,
        SourceKind::Headcounts,
    ];

    /// Aggregation used for bucketed sources; `None` for the flat ones.
    pub const fn mode(self) -> Option<AggregationMode> {
        match self {
            SourceKind::Appointments | SourceKind::Hospitalizations => {
                Some(AggregationMode::SumAndCount)
            }
            SourceKind::AdditionalPayments => Some(AggregationMode::SumOnly),
            SourceKind::Salaries => Some(AggregationMode::CumulativeSum),
            SourceKind::WorkerRegistrations | SourceKind::PatientRegistrations => {
                Some(AggregationMode::CountOnly)
            }
            SourceKind::BestDoctors | SourceKind::RoomOccupancy | SourceKind::Headcounts => None,
        }
    }

    /// Stable snake_case name, used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            SourceKind::Appointments => "appointments",
            SourceKind::Hospitalizations => "hospitalizations",
            SourceKind::AdditionalPayments => "additional_payments",
            SourceKind::Salaries => "salaries",
            SourceKind::WorkerRegistrations => "worker_registrations",
            SourceKind::PatientRegistrations => "patient_registrations",
            SourceKind::BestDoctors => "best_doctors",
            SourceKind::RoomOccupancy => "room_occupancy",
            SourceKind::Headcounts => "headcounts",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sources read through [`StatsReader::fetch_dated_values`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatedSource {
    /// appointment date, result price
    Appointments,
    /// hospitalization start date, price
    Hospitalizations,
    /// payment date, amount
    AdditionalPayments,
    /// worker creation date, salary
    Salaries,
}

impl From<DatedSource> for SourceKind {
    fn from(s: DatedSource) -> Self {
        match s {
            DatedSource::Appointments => SourceKind::Appointments,
            DatedSource::Hospitalizations => SourceKind::Hospitalizations,
            DatedSource::AdditionalPayments => SourceKind::AdditionalPayments,
            DatedSource::Salaries => SourceKind::Salaries,
        }
    }
}

/// Sources read through [`StatsReader::fetch_dates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateSource {
    /// worker creation date
    WorkerRegistrations,
    /// medical card creation date
    PatientRegistrations,
}

impl From<DateSource> for SourceKind {
    fn from(s: DateSource) -> Self {
        match s {
            DateSource::WorkerRegistrations => SourceKind::WorkerRegistrations,
            DateSource::PatientRegistrations => SourceKind::PatientRegistrations,
        }
    }
}

/// Raw reads consumed by the fetchers.
pub trait StatsReader {
    /// `(date, value)` rows of a valued source, in any order.
    fn fetch_dated_values(
        &mut self,
        source: DatedSource,
    ) -> Result<Vec<(NaiveDate, f64)>, SourceError>;

    /// Dates of a count-only source, in any order.
    fn fetch_dates(&mut self, source: DateSource) -> Result<Vec<NaiveDate>, SourceError>;

    /// Doctors eligible for appointments with their appointment count and summed result price.
    /// Order is not significant.
    fn fetch_doctor_ranking(&mut self) -> Result<Vec<DoctorRankingEntry>, SourceError>;

    /// Bed-room count and number of hospitalizations with no end date.
    fn fetch_room_occupancy_counts(&mut self) -> Result<RoomOccupancyCounts, SourceError>;

    /// Total staff and patients.
    fn fetch_headcounts(&mut self) -> Result<Headcounts, SourceError>;
}

/// Opens a scoped [`StatsReader`] for one fetcher task.
pub trait ReaderFactory: Send + Sync {
    /// Reader type handed to a task; dropped when the task finishes.
    type Reader: StatsReader;

    /// Open a new reader.
    fn open(&self) -> Result<Self::Reader, SourceError>;
}
