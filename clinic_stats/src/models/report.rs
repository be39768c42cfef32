//! Report types handed to the dashboard.
//!
//! Every value here is built fresh for one report request and is never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::models::series::{AggregationMode, GranularSeries};
use crate::source::SourceKind;

/// Bucketed view of one metric source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricReport {
    /// Source the report was built from.
    pub source: SourceKind,
    /// Aggregation applied to the source's observations.
    pub mode: AggregationMode,
    /// Money, count or running-total series, depending on `mode`.
    pub values: GranularSeries,
    /// Observation counts; present only under [`AggregationMode::SumAndCount`].
    pub amount: Option<GranularSeries>,
}

impl MetricReport {
    /// Report of a source that produced no data (or failed): single-zero series everywhere.
    pub fn empty(source: SourceKind, mode: AggregationMode) -> Self {
        Self {
            source,
            mode,
            values: GranularSeries::empty(mode.is_cumulative()),
            amount: matches!(mode, AggregationMode::SumAndCount)
                .then(|| GranularSeries::empty(false)),
        }
    }

    /// The money series, for modes that sum values.
    pub fn money(&self) -> Option<&GranularSeries> {
        match self.mode {
            AggregationMode::CountOnly => None,
            _ => Some(&self.values),
        }
    }
}

/// One row of the best-doctors ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRankingEntry {
    /// Worker id of the doctor.
    pub doctor_id: i64,
    /// First name.
    pub name: String,
    /// Last name.
    pub surname: String,
    /// Login of the doctor's account.
    pub login: String,
    /// Number of appointments held.
    pub appointment_count: i64,
    /// Sum of appointment result prices.
    pub earned_money: f64,
}

/// Raw counts behind [`OccupancyReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOccupancyCounts {
    /// Rooms of the bed-room kind.
    pub eligible_bed_rooms: i64,
    /// Hospitalizations without an end date.
    pub open_hospitalizations: i64,
}

/// Bed usage across all bed-rooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    /// Total beds (`eligible_bed_rooms × beds per room`).
    pub capacity: i64,
    /// `capacity - busy_beds`.
    pub free_beds: i64,
    /// Currently open hospitalizations.
    pub busy_beds: i64,
}

/// Scalar headcounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcounts {
    /// All workers.
    pub staff: i64,
    /// All patients (medical cards).
    pub patients: i64,
}

/// Appointment + hospitalization + additional-payment money, per granularity.
pub type TotalMoneyReport = GranularSeries;

/// A source that could not be read for this report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    /// The failed source.
    pub source: SourceKind,
    /// Human-readable cause.
    pub reason: String,
}

/// The consolidated dashboard report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    /// Appointment money and counts.
    pub appointments: MetricReport,
    /// Hospitalization money and counts.
    pub hospitalizations: MetricReport,
    /// Additional payment money.
    pub additional_payments: MetricReport,
    /// Committed salary as a running total.
    pub salaries: MetricReport,
    /// New workers per bucket.
    pub worker_registrations: MetricReport,
    /// New medical cards per bucket.
    pub patient_registrations: MetricReport,
    /// Element-wise sum of the three money series on a shared window.
    pub total_money: TotalMoneyReport,
    /// Doctors ordered by earned money, descending; ties by ascending id.
    pub best_doctors: Vec<DoctorRankingEntry>,
    /// Bed occupancy.
    pub occupancy: OccupancyReport,
    /// Staff and patient headcounts.
    pub headcounts: Headcounts,
    /// Sources replaced by defaults, in source order. Empty for a complete report.
    pub failed_sources: Vec<SourceFailure>,
}

impl StatisticsReport {
    /// `true` when every source contributed.
    pub fn is_complete(&self) -> bool {
        self.failed_sources.is_empty()
    }
}
