//! Dense, calendar-aligned series.
//!
//! A [`BucketedSeries`] always holds at least one value and never has gaps: index `i` is the
//! `i`-th bucket after the first populated one. Charts address buckets by position only, so the
//! series also remembers the key of its first bucket to recover calendar labels and to let the
//! composer re-window several series onto one shared range.

use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::bucket::{self, BucketGranularity};

/// How observations falling into one bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Sum of values plus a parallel series counting the observations.
    SumAndCount,
    /// Sum of values.
    SumOnly,
    /// Number of observations; values are ignored.
    CountOnly,
    /// Running total: every value on or before the bucket's end.
    CumulativeSum,
}

impl AggregationMode {
    /// `true` for the running-total mode.
    pub const fn is_cumulative(self) -> bool {
        matches!(self, AggregationMode::CumulativeSum)
    }
}

/// One dense, zero-filled series for a single granularity.
///
/// Serializes with its calendar `labels` alongside `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketedSeries {
    granularity: BucketGranularity,
    /// Key of the bucket at index 0; `None` when no observation was seen.
    first_key: Option<i64>,
    cumulative: bool,
    values: Vec<f64>,
}

impl BucketedSeries {
    /// The series of an empty window: a single zero bucket.
    pub fn empty(granularity: BucketGranularity, cumulative: bool) -> Self {
        Self {
            granularity,
            first_key: None,
            cumulative,
            values: vec![0.0],
        }
    }

    /// A dense series starting at `first_key`.
    ///
    /// An empty `values` vector is normalised to the single-zero empty window.
    pub fn dense(
        granularity: BucketGranularity,
        first_key: i64,
        cumulative: bool,
        values: Vec<f64>,
    ) -> Self {
        if values.is_empty() {
            return Self::empty(granularity, cumulative);
        }
        Self {
            granularity,
            first_key: Some(first_key),
            cumulative,
            values,
        }
    }

    /// Granularity of every bucket in this series.
    pub fn granularity(&self) -> BucketGranularity {
        self.granularity
    }

    /// Key of the first bucket, `None` for the empty window.
    pub fn first_key(&self) -> Option<i64> {
        self.first_key
    }

    /// Key of the last bucket, `None` for the empty window.
    pub fn last_key(&self) -> Option<i64> {
        self.first_key.map(|k| k + self.values.len() as i64 - 1)
    }

    /// Whether values are running totals.
    pub fn is_cumulative(&self) -> bool {
        self.cumulative
    }

    /// `true` when built from zero observations.
    pub fn is_empty_window(&self) -> bool {
        self.first_key.is_none()
    }

    /// Bucket values in chronological order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of buckets; never zero.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum over all buckets.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Value of the last bucket.
    pub fn last_value(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }

    /// First and last calendar date covered by the series.
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.first_key?;
        let last = self.last_key()?;
        Some((
            bucket::bucket_start(first, self.granularity),
            bucket::bucket_end_inclusive(last, self.granularity),
        ))
    }

    /// One display label per bucket (`2024-01-03`, `2024-W01`, `2024-01`, `2024`).
    pub fn labels(&self) -> Vec<String> {
        match self.first_key {
            Some(first) => (0..self.values.len() as i64)
                .map(|i| bucket::bucket_label(first + i, self.granularity))
                .collect(),
            None => vec!["no data".to_string()],
        }
    }

    /// Consume the series, returning its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

impl Serialize for BucketedSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("BucketedSeries", 5)?;
        st.serialize_field("granularity", &self.granularity)?;
        st.serialize_field("first_key", &self.first_key)?;
        st.serialize_field("cumulative", &self.cumulative)?;
        st.serialize_field("labels", &self.labels())?;
        st.serialize_field("values", &self.values)?;
        st.end()
    }
}

/// The four calendar views of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GranularSeries {
    /// Per-day series.
    pub day: BucketedSeries,
    /// Per-ISO-week series.
    pub week: BucketedSeries,
    /// Per-month series.
    pub month: BucketedSeries,
    /// Per-year series.
    pub year: BucketedSeries,
}

impl GranularSeries {
    /// Build all four views with `f`, called once per granularity.
    pub fn from_fn(mut f: impl FnMut(BucketGranularity) -> BucketedSeries) -> Self {
        Self {
            day: f(BucketGranularity::Day),
            week: f(BucketGranularity::Week),
            month: f(BucketGranularity::Month),
            year: f(BucketGranularity::Year),
        }
    }

    /// Same as [`GranularSeries::from_fn`] for fallible builders.
    pub fn try_from_fn<E>(
        mut f: impl FnMut(BucketGranularity) -> Result<BucketedSeries, E>,
    ) -> Result<Self, E> {
        Ok(Self {
            day: f(BucketGranularity::Day)?,
            week: f(BucketGranularity::Week)?,
            month: f(BucketGranularity::Month)?,
            year: f(BucketGranularity::Year)?,
        })
    }

    /// Single-zero series for every granularity.
    pub fn empty(cumulative: bool) -> Self {
        Self::from_fn(|g| BucketedSeries::empty(g, cumulative))
    }

    /// The series for `granularity`.
    pub fn get(&self, granularity: BucketGranularity) -> &BucketedSeries {
        match granularity {
            BucketGranularity::Day => &self.day,
            BucketGranularity::Week => &self.week,
            BucketGranularity::Month => &self.month,
            BucketGranularity::Year => &self.year,
        }
    }
}
