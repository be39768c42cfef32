//! SQLite implementation of the statistics reads.
//!
//! [`SqliteConnector`] opens a fresh connection for every fetcher task; a `SqliteConnection` is
//! not shareable across threads, and the orchestrator runs fetchers in parallel. The connection
//! lives inside the [`SqliteStatsReader`] and closes when the task drops it.

use chrono::NaiveDate;
use clinic_stats::SourceError;
use clinic_stats::models::{DoctorRankingEntry, Headcounts, RoomOccupancyCounts};
use clinic_stats::source::{DateSource, DatedSource, ReaderFactory, StatsReader};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Double, Text};
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::dates::parse_date;
use crate::db::connection::connect_sqlite;
use crate::schema::{additional_payments, appointments, hospitalizations, patients, rooms, workers};

/// Opens one [`SqliteStatsReader`] per fetcher.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    database_url: String,
    bed_room_kind: String,
}

impl SqliteConnector {
    pub fn new(database_url: impl Into<String>, bed_room_kind: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            bed_room_kind: bed_room_kind.into(),
        }
    }

    /// Connector for a loaded `[database]` section.
    pub fn from_config(db: &DatabaseConfig) -> anyhow::Result<Self> {
        Ok(Self::new(db.url()?, db.bed_room_kind.as_str()))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

impl ReaderFactory for SqliteConnector {
    type Reader = SqliteStatsReader;

    fn open(&self) -> Result<SqliteStatsReader, SourceError> {
        let conn = connect_sqlite(&self.database_url)
            .map_err(|e| SourceError::Connect(format!("{e:#}")))?;
        Ok(SqliteStatsReader::new(conn, self.bed_room_kind.clone()))
    }
}

/// [`StatsReader`] over one SQLite connection.
pub struct SqliteStatsReader {
    conn: SqliteConnection,
    bed_room_kind: String,
}

#[derive(QueryableByName)]
struct RankingRow {
    #[diesel(sql_type = BigInt)]
    doctor_id: i64,
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    surname: String,
    #[diesel(sql_type = Text)]
    login: String,
    #[diesel(sql_type = BigInt)]
    appointment_count: i64,
    #[diesel(sql_type = Double)]
    earned_money: f64,
}

impl From<RankingRow> for DoctorRankingEntry {
    fn from(r: RankingRow) -> Self {
        DoctorRankingEntry {
            doctor_id: r.doctor_id,
            name: r.name,
            surname: r.surname,
            login: r.login,
            appointment_count: r.appointment_count,
            earned_money: r.earned_money,
        }
    }
}

// Doctors without appointments stay in the ranking with zero earnings.
const RANKING_SQL: &str = "\
    SELECT w.id AS doctor_id, w.name, w.surname, w.login, \
           COUNT(a.id) AS appointment_count, \
           CAST(COALESCE(SUM(a.result_price), 0) AS REAL) AS earned_money \
    FROM workers w \
    LEFT JOIN appointments a ON a.doctor_id = w.id \
    WHERE w.accepts_appointments = 1 \
    GROUP BY w.id, w.name, w.surname, w.login";

fn query_failed(e: diesel::result::Error) -> SourceError {
    SourceError::Query(e.to_string())
}

fn parse_dated(rows: Vec<(String, f64)>) -> Result<Vec<(NaiveDate, f64)>, SourceError> {
    rows.into_iter()
        .map(|(raw, value)| Ok((parse_date(&raw)?, value)))
        .collect()
}

impl SqliteStatsReader {
    pub fn new(conn: SqliteConnection, bed_room_kind: impl Into<String>) -> Self {
        Self {
            conn,
            bed_room_kind: bed_room_kind.into(),
        }
    }
}

impl StatsReader for SqliteStatsReader {
    fn fetch_dated_values(
        &mut self,
        source: DatedSource,
    ) -> Result<Vec<(NaiveDate, f64)>, SourceError> {
        let conn = &mut self.conn;
        let rows: Vec<(String, f64)> = match source {
            DatedSource::Appointments => appointments::table
                .select((appointments::date, appointments::result_price))
                .load::<(String, Option<f64>)>(conn)
                .map_err(query_failed)?
                .into_iter()
                // no result yet, no money; the appointment still counts
                .map(|(date, price)| (date, price.unwrap_or(0.0)))
                .collect(),
            DatedSource::Hospitalizations => hospitalizations::table
                .select((hospitalizations::start_date, hospitalizations::price))
                .load(conn)
                .map_err(query_failed)?,
            DatedSource::AdditionalPayments => additional_payments::table
                .select((additional_payments::paid_on, additional_payments::amount))
                .load(conn)
                .map_err(query_failed)?,
            DatedSource::Salaries => workers::table
                .select((workers::created_on, workers::salary))
                .load(conn)
                .map_err(query_failed)?,
        };
        debug!(?source, rows = rows.len(), "sqlite dated values");
        parse_dated(rows)
    }

    fn fetch_dates(&mut self, source: DateSource) -> Result<Vec<NaiveDate>, SourceError> {
        let conn = &mut self.conn;
        let raw: Vec<String> = match source {
            DateSource::WorkerRegistrations => workers::table
                .select(workers::created_on)
                .load(conn)
                .map_err(query_failed)?,
            DateSource::PatientRegistrations => patients::table
                .select(patients::card_created_on)
                .load(conn)
                .map_err(query_failed)?,
        };
        raw.iter().map(|s| parse_date(s)).collect()
    }

    fn fetch_doctor_ranking(&mut self) -> Result<Vec<DoctorRankingEntry>, SourceError> {
        let rows: Vec<RankingRow> = sql_query(RANKING_SQL)
            .load(&mut self.conn)
            .map_err(query_failed)?;
        Ok(rows.into_iter().map(DoctorRankingEntry::from).collect())
    }

    fn fetch_room_occupancy_counts(&mut self) -> Result<RoomOccupancyCounts, SourceError> {
        let eligible_bed_rooms = rooms::table
            .filter(rooms::kind.eq(&self.bed_room_kind))
            .count()
            .get_result::<i64>(&mut self.conn)
            .map_err(query_failed)?;
        let open_hospitalizations = hospitalizations::table
            .filter(hospitalizations::end_date.is_null())
            .count()
            .get_result::<i64>(&mut self.conn)
            .map_err(query_failed)?;
        Ok(RoomOccupancyCounts {
            eligible_bed_rooms,
            open_hospitalizations,
        })
    }

    fn fetch_headcounts(&mut self) -> Result<Headcounts, SourceError> {
        let staff = workers::table
            .count()
            .get_result::<i64>(&mut self.conn)
            .map_err(query_failed)?;
        let patients = patients::table
            .count()
            .get_result::<i64>(&mut self.conn)
            .map_err(query_failed)?;
        Ok(Headcounts { staff, patients })
    }
}
