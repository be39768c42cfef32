use chrono::NaiveDate;
use clinic_stats::SourceError;
use clinic_stats::source::{DateSource, DatedSource, ReaderFactory, StatsReader};
use clinic_store::db::connection::connect_sqlite;
use clinic_store::{SqliteConnector, SqliteStatsReader};
use diesel::connection::SimpleConnection;

mod common;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sorted<T: PartialOrd>(mut v: Vec<T>) -> Vec<T> {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap());
    v
}

#[test]
fn connections_apply_pragmas() {
    let (db, mut conn) = common::setup_db();
    common::assert_sqlite_pragmas(&mut conn);

    let mut second = connect_sqlite(&format!("sqlite://{}", db.path)).expect("connect second");
    common::assert_sqlite_pragmas(&mut second);
}

#[test]
fn dated_values_come_back_per_source() {
    let (db, mut conn) = common::setup_db();
    common::seed_clinic(&mut conn);
    let mut reader = SqliteStatsReader::new(conn, "ward");

    let appointments = sorted(
        reader
            .fetch_dated_values(DatedSource::Appointments)
            .unwrap(),
    );
    // the appointment without a result carries no money
    assert_eq!(
        appointments,
        vec![(d(2024, 1, 1), 100.0), (d(2024, 1, 3), 0.0), (d(2024, 1, 3), 50.0)]
    );

    let payments = reader
        .fetch_dated_values(DatedSource::AdditionalPayments)
        .unwrap();
    assert_eq!(payments, vec![(d(2024, 1, 4), 25.0)]);

    let salaries = sorted(reader.fetch_dated_values(DatedSource::Salaries).unwrap());
    assert_eq!(
        salaries,
        vec![(d(2024, 1, 1), 3000.0), (d(2024, 1, 3), 1000.0), (d(2024, 1, 3), 2000.0)]
    );

    let stays = reader
        .fetch_dated_values(DatedSource::Hospitalizations)
        .unwrap();
    assert_eq!(stays.len(), 3);
    drop(db);
}

#[test]
fn registration_dates_accept_mixed_formats() {
    let (_db, mut conn) = common::setup_db();
    common::seed_clinic(&mut conn);
    let mut reader = SqliteStatsReader::new(conn, "ward");

    let patients = sorted(
        reader
            .fetch_dates(DateSource::PatientRegistrations)
            .unwrap(),
    );
    assert_eq!(patients, vec![d(2024, 1, 1), d(2024, 1, 1), d(2024, 1, 2)]);

    let workers = sorted(reader.fetch_dates(DateSource::WorkerRegistrations).unwrap());
    assert_eq!(workers, vec![d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 3)]);
}

#[test]
fn ranking_covers_doctors_only() {
    let (_db, mut conn) = common::setup_db();
    common::seed_clinic(&mut conn);
    let idle = common::add_worker(&mut conn, "idle", 500.0, "2024-02-01", true);
    let mut reader = SqliteStatsReader::new(conn, "ward");

    let mut ranking = reader.fetch_doctor_ranking().unwrap();
    ranking.sort_by_key(|r| r.doctor_id);

    let logins: Vec<&str> = ranking.iter().map(|r| r.login.as_str()).collect();
    assert_eq!(logins, vec!["house", "wilson", "idle"]);
    assert_eq!(ranking[0].earned_money, 100.0);
    assert_eq!(ranking[1].appointment_count, 2);
    assert_eq!(ranking[1].earned_money, 50.0);
    assert_eq!(ranking[2].doctor_id, i64::from(idle));
    assert_eq!(ranking[2].appointment_count, 0);
    assert_eq!(ranking[2].earned_money, 0.0);
}

#[test]
fn occupancy_counts_use_the_configured_room_kind() {
    let (db, mut conn) = common::setup_db();
    common::seed_clinic(&mut conn);
    conn.batch_execute(
        "UPDATE hospitalizations SET end_date = '2024-01-09' WHERE price = 0",
    )
    .unwrap();

    let mut wards = SqliteStatsReader::new(conn, "ward");
    let counts = wards.fetch_room_occupancy_counts().unwrap();
    assert_eq!(counts.eligible_bed_rooms, 5);
    assert_eq!(counts.open_hospitalizations, 2);

    let mut labs = SqliteConnector::new(db.path.clone(), "lab").open().unwrap();
    assert_eq!(
        labs.fetch_room_occupancy_counts()
            .unwrap()
            .eligible_bed_rooms,
        1
    );
}

#[test]
fn headcounts_count_every_row() {
    let (_db, mut conn) = common::setup_db();
    common::seed_clinic(&mut conn);
    let mut reader = SqliteStatsReader::new(conn, "ward");

    let h = reader.fetch_headcounts().unwrap();
    assert_eq!(h.staff, 3);
    assert_eq!(h.patients, 3);
}

#[test]
fn bad_dates_are_malformed_rows() {
    let (_db, mut conn) = common::setup_db();
    common::add_patient(&mut conn, "last tuesday");
    let mut reader = SqliteStatsReader::new(conn, "ward");

    assert!(matches!(
        reader.fetch_dates(DateSource::PatientRegistrations),
        Err(SourceError::Malformed(_))
    ));
}

#[test]
fn unmigrated_database_fails_the_query_not_the_connection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    let connector = SqliteConnector::new(path.to_string_lossy(), "ward");

    let mut reader = connector.open().expect("sqlite creates the file");
    assert!(matches!(reader.fetch_headcounts(), Err(SourceError::Query(_))));
}

#[test]
fn unreachable_database_is_a_connect_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/clinic.db");
    let connector = SqliteConnector::new(path.to_string_lossy(), "ward");

    assert!(matches!(connector.open(), Err(SourceError::Connect(_))));
}
