//! One fetcher per metric source.
//!
//! A fetcher reads raw rows through a [`StatsReader`], maps them to [`Observation`]s and buckets
//! them. Each returns its own typed result; [`run_fetcher`] opens a reader for a single
//! [`SourceKind`] and tags the result as a [`FetchOutput`] for the orchestrator.

use tracing::debug;

use crate::aggregate;
use crate::errors::SourceError;
use crate::models::{
    AggregationMode, DoctorRankingEntry, Headcounts, MetricReport, Observation,
    RoomOccupancyCounts,
};
use crate::source::{DateSource, DatedSource, ReaderFactory, SourceKind, StatsReader};

/// Result of one fetcher, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutput {
    /// A bucketed metric source.
    Metric(MetricReport),
    /// The unsorted best-doctors rows.
    Ranking(Vec<DoctorRankingEntry>),
    /// Raw occupancy counts.
    Occupancy(RoomOccupancyCounts),
    /// Staff and patient totals.
    Headcounts(Headcounts),
}

fn dated_metric<R: StatsReader + ?Sized>(
    reader: &mut R,
    source: DatedSource,
    mode: AggregationMode,
) -> Result<MetricReport, SourceError> {
    let rows = reader.fetch_dated_values(source)?;
    debug!(source = %SourceKind::from(source), rows = rows.len(), "fetched dated values");

    let observations: Vec<Observation> = rows.into_iter().map(Observation::from).collect();
    let bucketed = aggregate::bucket(&observations, mode);
    Ok(MetricReport {
        source: source.into(),
        mode,
        values: bucketed.values,
        amount: bucketed.amount,
    })
}

fn count_metric<R: StatsReader + ?Sized>(
    reader: &mut R,
    source: DateSource,
) -> Result<MetricReport, SourceError> {
    let dates = reader.fetch_dates(source)?;
    debug!(source = %SourceKind::from(source), rows = dates.len(), "fetched dates");

    let observations: Vec<Observation> = dates.into_iter().map(Observation::from).collect();
    let bucketed = aggregate::bucket(&observations, AggregationMode::CountOnly);
    Ok(MetricReport {
        source: source.into(),
        mode: AggregationMode::CountOnly,
        values: bucketed.values,
        amount: None,
    })
}

/// Appointment money (result price) and appointment counts.
pub fn fetch_appointments<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<MetricReport, SourceError> {
    dated_metric(
        reader,
        DatedSource::Appointments,
        AggregationMode::SumAndCount,
    )
}

/// Hospitalization money (by start date) and counts.
pub fn fetch_hospitalizations<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<MetricReport, SourceError> {
    dated_metric(
        reader,
        DatedSource::Hospitalizations,
        AggregationMode::SumAndCount,
    )
}

/// Additional payment money.
pub fn fetch_additional_payments<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<MetricReport, SourceError> {
    dated_metric(
        reader,
        DatedSource::AdditionalPayments,
        AggregationMode::SumOnly,
    )
}

/// Committed salary as of each bucket.
pub fn fetch_salaries<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<MetricReport, SourceError> {
    dated_metric(
        reader,
        DatedSource::Salaries,
        AggregationMode::CumulativeSum,
    )
}

/// New workers per bucket.
pub fn fetch_worker_registrations<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<MetricReport, SourceError> {
    count_metric(reader, DateSource::WorkerRegistrations)
}

/// New medical cards per bucket.
pub fn fetch_patient_registrations<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<MetricReport, SourceError> {
    count_metric(reader, DateSource::PatientRegistrations)
}

/// Best-doctors rows as returned by the collaborator; sorting happens at assembly.
pub fn fetch_doctor_ranking<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<Vec<DoctorRankingEntry>, SourceError> {
    let rows = reader.fetch_doctor_ranking()?;
    debug!(rows = rows.len(), "fetched doctor ranking");
    Ok(rows)
}

/// Bed-room and open-hospitalization counts.
pub fn fetch_room_occupancy<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<RoomOccupancyCounts, SourceError> {
    reader.fetch_room_occupancy_counts()
}

/// Staff and patient totals.
pub fn fetch_headcounts<R: StatsReader + ?Sized>(
    reader: &mut R,
) -> Result<Headcounts, SourceError> {
    reader.fetch_headcounts()
}

/// Open a reader, run the fetcher for `kind` and release the reader.
pub fn run_fetcher<F: ReaderFactory + ?Sized>(
    factory: &F,
    kind: SourceKind,
) -> Result<FetchOutput, SourceError> {
    let mut reader = factory.open()?;
    let r = &mut reader;

    let out = match kind {
        SourceKind::Appointments => FetchOutput::Metric(fetch_appointments(r)?),
        SourceKind::Hospitalizations => FetchOutput::Metric(fetch_hospitalizations(r)?),
        SourceKind::AdditionalPayments => FetchOutput::Metric(fetch_additional_payments(r)?),
        SourceKind::Salaries => FetchOutput::Metric(fetch_salaries(r)?),
        SourceKind::WorkerRegistrations => FetchOutput::Metric(fetch_worker_registrations(r)?),
        SourceKind::PatientRegistrations => {
            FetchOutput::Metric(fetch_patient_registrations(r)?)
        }
        SourceKind::BestDoctors => FetchOutput::Ranking(fetch_doctor_ranking(r)?),
        SourceKind::RoomOccupancy => FetchOutput::Occupancy(fetch_room_occupancy(r)?),
        SourceKind::Headcounts => FetchOutput::Headcounts(fetch_headcounts(r)?),
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ClinicSnapshot, InMemorySource};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn appointments_carry_money_and_amount() {
        let source = InMemorySource::new(ClinicSnapshot {
            appointments: vec![(d(2024, 1, 1), 100.0), (d(2024, 1, 1), 40.0)],
            ..Default::default()
        });
        let FetchOutput::Metric(report) = run_fetcher(&source, SourceKind::Appointments).unwrap()
        else {
            panic!("expected a metric");
        };
        assert_eq!(report.mode, AggregationMode::SumAndCount);
        assert_eq!(report.values.day.values(), &[140.0]);
        assert_eq!(report.amount.unwrap().day.values(), &[2.0]);
    }

    #[test]
    fn salaries_are_cumulative() {
        let source = InMemorySource::new(ClinicSnapshot {
            salaries: vec![(d(2024, 1, 10), 3000.0), (d(2024, 3, 2), 2000.0)],
            ..Default::default()
        });
        let FetchOutput::Metric(report) = run_fetcher(&source, SourceKind::Salaries).unwrap()
        else {
            panic!("expected a metric");
        };
        assert_eq!(report.values.month.values(), &[3000.0, 3000.0, 5000.0]);
        assert!(report.amount.is_none());
    }

    #[test]
    fn registrations_count_dates() {
        let source = InMemorySource::new(ClinicSnapshot {
            patient_registrations: vec![d(2024, 1, 1), d(2024, 1, 1), d(2025, 6, 1)],
            ..Default::default()
        });
        let FetchOutput::Metric(report) =
            run_fetcher(&source, SourceKind::PatientRegistrations).unwrap()
        else {
            panic!("expected a metric");
        };
        assert_eq!(report.source, SourceKind::PatientRegistrations);
        assert_eq!(report.values.year.values(), &[2.0, 1.0]);
    }

    #[test]
    fn failing_read_surfaces_the_source_error() {
        let source = InMemorySource::new(ClinicSnapshot::default())
            .fail_source(SourceKind::Headcounts);
        assert!(matches!(
            run_fetcher(&source, SourceKind::Headcounts),
            Err(SourceError::Query(_))
        ));
        assert!(run_fetcher(&source, SourceKind::RoomOccupancy).is_ok());
        assert_eq!(source.open_handles(), 0);
    }
}
