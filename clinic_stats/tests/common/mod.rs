#![allow(dead_code)]

use chrono::NaiveDate;
use clinic_stats::config::{FailurePolicy, StatsConfig};
use clinic_stats::memory::ClinicSnapshot;
use clinic_stats::models::{DoctorRankingEntry, Headcounts, RoomOccupancyCounts};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
}

pub fn doctor(id: i64, appointments: i64, earned: f64) -> DoctorRankingEntry {
    DoctorRankingEntry {
        doctor_id: id,
        name: format!("Name{id}"),
        surname: format!("Surname{id}"),
        login: format!("doctor{id}"),
        appointment_count: appointments,
        earned_money: earned,
    }
}

/// A small clinic with data in every source.
///
/// Appointments span Jan 1..=Jan 3 2024, hospitalizations start on Jan 2 and Jan 5,
/// one additional payment lands on Jan 4.
pub fn clinic() -> ClinicSnapshot {
    ClinicSnapshot {
        appointments: vec![(d(2024, 1, 1), 100.0), (d(2024, 1, 3), 50.0)],
        hospitalizations: vec![(d(2024, 1, 2), 1000.0), (d(2024, 1, 5), 500.0)],
        additional_payments: vec![(d(2024, 1, 4), 25.0)],
        salaries: vec![(d(2024, 1, 1), 3000.0), (d(2024, 1, 3), 2000.0)],
        worker_registrations: vec![d(2024, 1, 1), d(2024, 1, 3)],
        patient_registrations: vec![d(2024, 1, 1), d(2024, 1, 1), d(2024, 1, 2)],
        doctors: vec![doctor(3, 1, 500.0), doctor(1, 1, 500.0), doctor(2, 0, 0.0)],
        occupancy: RoomOccupancyCounts {
            eligible_bed_rooms: 5,
            open_hospitalizations: 3,
        },
        headcounts: Headcounts {
            staff: 2,
            patients: 3,
        },
    }
}

pub fn config(policy: FailurePolicy, timeout_ms: u64) -> StatsConfig {
    StatsConfig {
        timeout_ms,
        failure_policy: policy,
    }
}
