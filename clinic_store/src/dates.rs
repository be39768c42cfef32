//! Parsing of the text dates stored in the clinic tables.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clinic_stats::SourceError;

/// Parse a stored date.
///
/// Accepts `YYYY-MM-DD`, SQLite's `YYYY-MM-DD HH:MM:SS` and RFC3339 (converted to its UTC date).
pub fn parse_date(raw: &str) -> Result<NaiveDate, SourceError> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| SourceError::Malformed(format!("unparseable date {raw:?}")))
}
