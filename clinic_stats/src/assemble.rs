//! Report assembly.
//!
//! Runs strictly after every fetcher has returned. Collects the tagged fetcher outputs, fills
//! failed sources with defaults and derives the cross-source fields: total money, the sorted
//! doctor ranking and bed occupancy.

use std::collections::BTreeMap;

use tracing::warn;

use crate::compose;
use crate::errors::StatsError;
use crate::fetchers::FetchOutput;
use crate::models::{
    AggregationMode, DoctorRankingEntry, GranularSeries, Headcounts, MetricReport,
    OccupancyReport, RoomOccupancyCounts, SourceFailure, StatisticsReport, TotalMoneyReport,
};
use crate::source::SourceKind;

/// Beds in one bed-room.
pub const BEDS_PER_ROOM: i64 = 4;

/// Everything the fetchers produced for one report request.
#[derive(Debug, Default)]
pub struct SourceResults {
    metrics: BTreeMap<SourceKind, MetricReport>,
    ranking: Option<Vec<DoctorRankingEntry>>,
    occupancy: Option<RoomOccupancyCounts>,
    headcounts: Option<Headcounts>,
    failures: BTreeMap<SourceKind, String>,
}

impl SourceResults {
    /// Store a successful fetcher output.
    pub fn record(&mut self, output: FetchOutput) {
        match output {
            FetchOutput::Metric(m) => {
                self.metrics.insert(m.source, m);
            }
            FetchOutput::Ranking(r) => self.ranking = Some(r),
            FetchOutput::Occupancy(o) => self.occupancy = Some(o),
            FetchOutput::Headcounts(h) => self.headcounts = Some(h),
        }
    }

    /// Mark `kind` as failed.
    pub fn record_failure(&mut self, kind: SourceKind, reason: impl Into<String>) {
        self.failures.insert(kind, reason.into());
    }

    fn has_output(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::BestDoctors => self.ranking.is_some(),
            SourceKind::RoomOccupancy => self.occupancy.is_some(),
            SourceKind::Headcounts => self.headcounts.is_some(),
            _ => self.metrics.contains_key(&kind),
        }
    }

    /// Sources with neither an output nor a recorded failure.
    pub fn missing(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|k| !self.has_output(*k) && !self.failures.contains_key(k))
            .collect()
    }

    fn take_metric(&mut self, kind: SourceKind) -> MetricReport {
        self.metrics.remove(&kind).unwrap_or_else(|| {
            // only called for bucketed kinds, which all have a mode
            MetricReport::empty(kind, kind.mode().unwrap_or(AggregationMode::SumOnly))
        })
    }
}

/// Sort by earned money, highest first; equal earnings by ascending doctor id.
pub fn rank_doctors(mut entries: Vec<DoctorRankingEntry>) -> Vec<DoctorRankingEntry> {
    entries.sort_by(|a, b| {
        b.earned_money
            .total_cmp(&a.earned_money)
            .then_with(|| a.doctor_id.cmp(&b.doctor_id))
    });
    entries
}

/// Beds from room and open-hospitalization counts.
pub fn occupancy(counts: RoomOccupancyCounts) -> OccupancyReport {
    let capacity = counts.eligible_bed_rooms * BEDS_PER_ROOM;
    let busy_beds = counts.open_hospitalizations;
    let free_beds = capacity - busy_beds;
    if free_beds < 0 {
        warn!(capacity, busy_beds, "more open hospitalizations than beds");
    }
    OccupancyReport {
        capacity,
        free_beds,
        busy_beds,
    }
}

/// Appointment + hospitalization + additional-payment money on one shared window.
pub fn total_money(
    appointments: &MetricReport,
    hospitalizations: &MetricReport,
    additional_payments: &MetricReport,
) -> Result<TotalMoneyReport, StatsError> {
    fn money(m: &MetricReport) -> Result<&GranularSeries, StatsError> {
        m.money().ok_or_else(|| {
            StatsError::MisalignedSeries(format!("{} carries no money series", m.source))
        })
    }

    compose::zip_granular(&[
        money(appointments)?,
        money(hospitalizations)?,
        money(additional_payments)?,
    ])
}

/// Build the final report. Sources without output are replaced by defaults and listed in
/// [`StatisticsReport::failed_sources`].
pub fn assemble(mut results: SourceResults) -> Result<StatisticsReport, StatsError> {
    for kind in results.missing() {
        results.record_failure(kind, "fetcher did not complete");
    }

    let appointments = results.take_metric(SourceKind::Appointments);
    let hospitalizations = results.take_metric(SourceKind::Hospitalizations);
    let additional_payments = results.take_metric(SourceKind::AdditionalPayments);
    let total_money = total_money(&appointments, &hospitalizations, &additional_payments)?;

    let failed_sources = std::mem::take(&mut results.failures)
        .into_iter()
        .map(|(source, reason)| SourceFailure { source, reason })
        .collect();

    Ok(StatisticsReport {
        appointments,
        hospitalizations,
        additional_payments,
        salaries: results.take_metric(SourceKind::Salaries),
        worker_registrations: results.take_metric(SourceKind::WorkerRegistrations),
        patient_registrations: results.take_metric(SourceKind::PatientRegistrations),
        total_money,
        best_doctors: rank_doctors(results.ranking.take().unwrap_or_default()),
        occupancy: occupancy(results.occupancy.take().unwrap_or_default()),
        headcounts: results.headcounts.take().unwrap_or_default(),
        failed_sources,
    })
}
