//! bucket.rs: calendar bucket keys for dated observations
//!
//! - Day: `num_days_from_ce` of the date.
//! - Week: ISO weeks (Monday-aligned); the key is the week's Monday in 7-day units.
//! - Month: linear `(year, month)` index, `year * 12 + (month - 1)`.
//! - Year: the calendar year itself.
//!
//! Consecutive buckets always have consecutive keys, so the dense window between two buckets
//! is just `first..=last`. All dates are naive calendar dates; there is no time-of-day.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar granularity of a bucketed series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketGranularity {
    /// one calendar day
    Day,
    /// ISO week, Monday to Sunday
    Week,
    /// calendar month
    Month,
    /// calendar year
    Year,
}

impl BucketGranularity {
    /// All granularities, finest first.
    pub const ALL: [BucketGranularity; 4] = [
        BucketGranularity::Day,
        BucketGranularity::Week,
        BucketGranularity::Month,
        BucketGranularity::Year,
    ];
}

impl fmt::Display for BucketGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BucketGranularity::Day => "day",
            BucketGranularity::Week => "week",
            BucketGranularity::Month => "month",
            BucketGranularity::Year => "year",
        };
        f.write_str(s)
    }
}

/// Compute the bucket key of a date.
pub fn bucket_key(date: NaiveDate, granularity: BucketGranularity) -> i64 {
    match granularity {
        BucketGranularity::Day => date.num_days_from_ce() as i64,
        BucketGranularity::Week => key_week(date),
        BucketGranularity::Month => key_month(date),
        BucketGranularity::Year => date.year() as i64,
    }
}

/// First calendar date covered by a bucket.
pub fn bucket_start(key: i64, granularity: BucketGranularity) -> NaiveDate {
    match granularity {
        BucketGranularity::Day => start_day(key),
        BucketGranularity::Week => start_week(key),
        BucketGranularity::Month => start_month(key),
        BucketGranularity::Year => NaiveDate::from_ymd_opt(key as i32, 1, 1)
            .expect("getting start date from year key"),
    }
}

/// Last calendar date covered by a bucket (inclusive).
pub fn bucket_end_inclusive(key: i64, granularity: BucketGranularity) -> NaiveDate {
    // widths vary for months and years: step back one day from the next bucket
    bucket_start(key + 1, granularity) - Duration::days(1)
}

/// Display label for a bucket: `2024-01-03`, `2024-W01`, `2024-01` or `2024`.
pub fn bucket_label(key: i64, granularity: BucketGranularity) -> String {
    let start = bucket_start(key, granularity);
    match granularity {
        BucketGranularity::Day => start.format("%Y-%m-%d").to_string(),
        BucketGranularity::Week => {
            let iso = start.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        BucketGranularity::Month => start.format("%Y-%m").to_string(),
        BucketGranularity::Year => start.year().to_string(),
    }
}

// ----- day internals -----

fn start_day(key: i64) -> NaiveDate {
    NaiveDate::from_num_days_from_ce_opt(key as i32).expect("getting start date from day key")
}

// ----- week internals (Monday-aligned) -----

fn key_week(date: NaiveDate) -> i64 {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (monday.num_days_from_ce() as i64).div_euclid(7)
}

fn start_week(key: i64) -> NaiveDate {
    // the 7-day span [key*7, key*7+6] holds exactly one Monday
    let span_start = start_day(key * 7);
    let to_monday = (7 - span_start.weekday().num_days_from_monday() as i64) % 7;
    span_start + Duration::days(to_monday)
}

// ----- month internals (calendar-aware) -----

fn key_month(date: NaiveDate) -> i64 {
    date.year() as i64 * 12 + (date.month0() as i64)
}

fn start_month(key: i64) -> NaiveDate {
    let year = key.div_euclid(12);
    let month = key.rem_euclid(12) as u32 + 1; // 1..=12
    NaiveDate::from_ymd_opt(year as i32, month, 1).expect("getting start date from month key")
}
