//! In-memory collaborator.
//!
//! Serves a fixed [`ClinicSnapshot`] and can be told to fail, panic or stall on chosen sources.
//! It also counts readers that are currently open, which lets callers check that every fetcher
//! released its handle.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;

use crate::errors::SourceError;
use crate::models::{DoctorRankingEntry, Headcounts, RoomOccupancyCounts};
use crate::source::{DateSource, DatedSource, ReaderFactory, SourceKind, StatsReader};

/// Raw rows of every source.
#[derive(Debug, Clone, Default)]
pub struct ClinicSnapshot {
    /// `(date, result price)` per appointment.
    pub appointments: Vec<(NaiveDate, f64)>,
    /// `(start date, price)` per hospitalization.
    pub hospitalizations: Vec<(NaiveDate, f64)>,
    /// `(date, amount)` per additional payment.
    pub additional_payments: Vec<(NaiveDate, f64)>,
    /// `(creation date, salary)` per worker.
    pub salaries: Vec<(NaiveDate, f64)>,
    /// Creation date per worker.
    pub worker_registrations: Vec<NaiveDate>,
    /// Creation date per medical card.
    pub patient_registrations: Vec<NaiveDate>,
    /// Ranking rows, any order.
    pub doctors: Vec<DoctorRankingEntry>,
    /// Occupancy counts.
    pub occupancy: RoomOccupancyCounts,
    /// Headcounts.
    pub headcounts: Headcounts,
}

#[derive(Debug, Clone, Default)]
struct Behaviour {
    failing: HashSet<SourceKind>,
    panicking: HashSet<SourceKind>,
    stalled: HashSet<SourceKind>,
    stall_for: Duration,
}

/// [`ReaderFactory`] over a shared [`ClinicSnapshot`].
#[derive(Debug, Clone)]
pub struct InMemorySource {
    snapshot: Arc<ClinicSnapshot>,
    behaviour: Arc<Behaviour>,
    open_handles: Arc<AtomicUsize>,
}

impl InMemorySource {
    /// Serve `snapshot` with no injected faults.
    pub fn new(snapshot: ClinicSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            behaviour: Arc::new(Behaviour::default()),
            open_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn behaviour_mut(&mut self) -> &mut Behaviour {
        Arc::make_mut(&mut self.behaviour)
    }

    /// Reads of `kind` return [`SourceError::Query`].
    pub fn fail_source(mut self, kind: SourceKind) -> Self {
        self.behaviour_mut().failing.insert(kind);
        self
    }

    /// Reads of `kind` panic.
    pub fn panic_source(mut self, kind: SourceKind) -> Self {
        self.behaviour_mut().panicking.insert(kind);
        self
    }

    /// Reads of `kind` block the calling thread for `delay` before answering.
    pub fn stall_source(mut self, kind: SourceKind, delay: Duration) -> Self {
        let b = self.behaviour_mut();
        b.stalled.insert(kind);
        b.stall_for = delay;
        self
    }

    /// Readers opened and not yet dropped.
    pub fn open_handles(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }
}

impl ReaderFactory for InMemorySource {
    type Reader = InMemoryReader;

    fn open(&self) -> Result<InMemoryReader, SourceError> {
        self.open_handles.fetch_add(1, Ordering::SeqCst);
        Ok(InMemoryReader {
            snapshot: Arc::clone(&self.snapshot),
            behaviour: Arc::clone(&self.behaviour),
            open_handles: Arc::clone(&self.open_handles),
        })
    }
}

/// Reader handed out by [`InMemorySource`].
#[derive(Debug)]
pub struct InMemoryReader {
    snapshot: Arc<ClinicSnapshot>,
    behaviour: Arc<Behaviour>,
    open_handles: Arc<AtomicUsize>,
}

impl InMemoryReader {
    fn check(&self, kind: SourceKind) -> Result<(), SourceError> {
        if self.behaviour.stalled.contains(&kind) {
            std::thread::sleep(self.behaviour.stall_for);
        }
        if self.behaviour.panicking.contains(&kind) {
            panic!("injected panic reading {kind}");
        }
        if self.behaviour.failing.contains(&kind) {
            return Err(SourceError::Query(format!(
                "injected failure reading {kind}"
            )));
        }
        Ok(())
    }
}

impl Drop for InMemoryReader {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}

impl StatsReader for InMemoryReader {
    fn fetch_dated_values(
        &mut self,
        source: DatedSource,
    ) -> Result<Vec<(NaiveDate, f64)>, SourceError> {
        self.check(source.into())?;
        let rows = match source {
            DatedSource::Appointments => &self.snapshot.appointments,
            DatedSource::Hospitalizations => &self.snapshot.hospitalizations,
            DatedSource::AdditionalPayments => &self.snapshot.additional_payments,
            DatedSource::Salaries => &self.snapshot.salaries,
        };
        Ok(rows.clone())
    }

    fn fetch_dates(&mut self, source: DateSource) -> Result<Vec<NaiveDate>, SourceError> {
        self.check(source.into())?;
        let rows = match source {
            DateSource::WorkerRegistrations => &self.snapshot.worker_registrations,
            DateSource::PatientRegistrations => &self.snapshot.patient_registrations,
        };
        Ok(rows.clone())
    }

    fn fetch_doctor_ranking(&mut self) -> Result<Vec<DoctorRankingEntry>, SourceError> {
        self.check(SourceKind::BestDoctors)?;
        Ok(self.snapshot.doctors.clone())
    }

    fn fetch_room_occupancy_counts(&mut self) -> Result<RoomOccupancyCounts, SourceError> {
        self.check(SourceKind::RoomOccupancy)?;
        Ok(self.snapshot.occupancy)
    }

    fn fetch_headcounts(&mut self) -> Result<Headcounts, SourceError> {
        self.check(SourceKind::Headcounts)?;
        Ok(self.snapshot.headcounts)
    }
}
