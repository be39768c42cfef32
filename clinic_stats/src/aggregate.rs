//! Time bucketing of dated observations.
//!
//! [`bucket`] turns a slice of [`Observation`]s into dense day / week / month / year series
//! under one [`AggregationMode`]. The algorithm per granularity:
//!
//! 1. Fold every observation into a per-bucket accumulator keyed by its calendar bucket.
//! 2. Take the smallest and largest key actually present and emit every key in between,
//!    zero-filling buckets without observations.
//! 3. For [`AggregationMode::CumulativeSum`], replace the dense sums by their prefix sums.
//!
//! No observations means a single zero bucket for every granularity. The functions are pure:
//! same input, same output, nothing else touched.

use std::collections::BTreeMap;

use crate::bucket::{BucketGranularity, bucket_key};
use crate::models::{AggregationMode, BucketedSeries, GranularSeries, Observation};

/// Output of [`bucket`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bucketed {
    /// Sums, counts or running totals depending on the mode.
    pub values: GranularSeries,
    /// Per-bucket observation counts; only under [`AggregationMode::SumAndCount`].
    pub amount: Option<GranularSeries>,
}

/// Bucket `observations` into all four granularities.
pub fn bucket(observations: &[Observation], mode: AggregationMode) -> Bucketed {
    let values = GranularSeries::from_fn(|g| bucket_series(observations, g, mode));
    let amount = match mode {
        AggregationMode::SumAndCount => Some(GranularSeries::from_fn(|g| {
            bucket_series(observations, g, AggregationMode::CountOnly)
        })),
        _ => None,
    };
    Bucketed { values, amount }
}

/// Bucket `observations` into one granularity.
///
/// Under [`AggregationMode::SumAndCount`] this returns the sum series; use
/// [`AggregationMode::CountOnly`] for the parallel count series.
pub fn bucket_series(
    observations: &[Observation],
    granularity: BucketGranularity,
    mode: AggregationMode,
) -> BucketedSeries {
    let per_bucket = observations
        .iter()
        .fold(BTreeMap::<i64, f64>::new(), |mut acc, obs| {
            let key = bucket_key(obs.occurred_on, granularity);
            *acc.entry(key).or_insert(0.0) += contribution(obs, mode);
            acc
        });

    densify(&per_bucket, granularity, mode.is_cumulative())
}

fn contribution(obs: &Observation, mode: AggregationMode) -> f64 {
    match mode {
        AggregationMode::CountOnly => 1.0,
        AggregationMode::SumAndCount
        | AggregationMode::SumOnly
        | AggregationMode::CumulativeSum => obs.value.unwrap_or(0.0),
    }
}

fn densify(
    per_bucket: &BTreeMap<i64, f64>,
    granularity: BucketGranularity,
    cumulative: bool,
) -> BucketedSeries {
    let (Some(&first), Some(&last)) = (per_bucket.keys().next(), per_bucket.keys().next_back())
    else {
        return BucketedSeries::empty(granularity, cumulative);
    };

    let dense = (first..=last).map(|key| per_bucket.get(&key).copied().unwrap_or(0.0));

    let values: Vec<f64> = if cumulative {
        dense
            .scan(0.0, |running, v| {
                *running += v;
                Some(*running)
            })
            .collect()
    } else {
        dense.collect()
    };

    BucketedSeries::dense(granularity, first, cumulative, values)
}
