#![allow(dead_code)]

use clinic_store::db::{connection, migrate};
use clinic_store::models::*;
use clinic_store::schema::*;
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use std::path::PathBuf;
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    _dir: TempDir,    // keep alive for the life of the test
    pub path: String, // <tmpdir>/clinic.db
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("clinic.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");
    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal");

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

pub fn add_worker(
    conn: &mut SqliteConnection,
    login: &str,
    salary: f64,
    created_on: &str,
    doctor: bool,
) -> i32 {
    diesel::insert_into(workers::table)
        .values(NewWorker {
            name: "Name",
            surname: login,
            login,
            salary,
            created_on,
            accepts_appointments: doctor,
        })
        .returning(workers::id)
        .get_result(conn)
        .expect("insert worker")
}

pub fn add_patient(conn: &mut SqliteConnection, card_created_on: &str) -> i32 {
    diesel::insert_into(patients::table)
        .values(NewPatient {
            name: "Pat",
            surname: "Ient",
            card_created_on,
        })
        .returning(patients::id)
        .get_result(conn)
        .expect("insert patient")
}

pub fn add_appointment(
    conn: &mut SqliteConnection,
    doctor_id: i32,
    patient_id: i32,
    date: &str,
    result_price: Option<f64>,
) {
    diesel::insert_into(appointments::table)
        .values(NewAppointment {
            doctor_id,
            patient_id,
            date,
            result_price,
        })
        .execute(conn)
        .expect("insert appointment");
}

pub fn add_room(conn: &mut SqliteConnection, number: &str, kind: &str) -> i32 {
    diesel::insert_into(rooms::table)
        .values(NewRoom { number, kind })
        .returning(rooms::id)
        .get_result(conn)
        .expect("insert room")
}

pub fn add_hospitalization(
    conn: &mut SqliteConnection,
    patient_id: i32,
    room_id: i32,
    start_date: &str,
    end_date: Option<&str>,
    price: f64,
) -> i32 {
    diesel::insert_into(hospitalizations::table)
        .values(NewHospitalization {
            patient_id,
            room_id,
            start_date,
            end_date,
            price,
        })
        .returning(hospitalizations::id)
        .get_result(conn)
        .expect("insert hospitalization")
}

pub fn add_payment(
    conn: &mut SqliteConnection,
    hospitalization_id: i32,
    paid_on: &str,
    amount: f64,
) {
    diesel::insert_into(additional_payments::table)
        .values(NewAdditionalPayment {
            hospitalization_id,
            paid_on,
            amount,
        })
        .execute(conn)
        .expect("insert payment");
}

/// Two doctors and a nurse, three patients, five wards and a lab, three open stays.
///
/// Money: appointments 100 on 2024-01-01 and 50 on 2024-01-03, hospitalizations 1000 on
/// 2024-01-02 and 500 on 2024-01-05, one 25 payment on 2024-01-04.
pub fn seed_clinic(conn: &mut SqliteConnection) {
    let house = add_worker(conn, "house", 3000.0, "2024-01-01", true);
    let wilson = add_worker(conn, "wilson", 2000.0, "2024-01-03", true);
    add_worker(conn, "nurse", 1000.0, "2024-01-03T09:00:00Z", false);

    let p1 = add_patient(conn, "2024-01-01");
    let p2 = add_patient(conn, "2024-01-01");
    let p3 = add_patient(conn, "2024-01-02 10:00:00");

    add_appointment(conn, house, p1, "2024-01-01", Some(100.0));
    add_appointment(conn, wilson, p2, "2024-01-03", Some(50.0));
    add_appointment(conn, wilson, p3, "2024-01-03", None);

    let wards: Vec<i32> = (1..=5)
        .map(|n| add_room(conn, &format!("W{n}"), "ward"))
        .collect();
    add_room(conn, "L1", "lab");

    let h1 = add_hospitalization(conn, p1, wards[0], "2024-01-02", None, 1000.0);
    add_hospitalization(conn, p2, wards[1], "2024-01-05", None, 500.0);
    add_hospitalization(conn, p3, wards[1], "2024-01-05", None, 0.0);
    add_payment(conn, h1, "2024-01-04", 25.0);
}
