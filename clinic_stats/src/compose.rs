//! Aligning and merging bucketed series.
//!
//! Series built from different sources start and end on different buckets, so index `i` of one
//! is not index `i` of another. [`zip`] first re-derives every input over the union of their
//! windows and only then sums position by position. Inputs that cannot share a window
//! (different granularities, or running totals mixed with period sums) are rejected with
//! [`StatsError::MisalignedSeries`].

use crate::errors::StatsError;
use crate::models::{BucketedSeries, GranularSeries};

/// Extend `series` onto the window `first..=last`.
///
/// Buckets before the series' own window are zero. Buckets after it are zero for period series
/// and repeat the last value for cumulative ones. The target window must contain the series'
/// window; an empty-window series becomes all zeros.
pub fn rewindow(
    series: &BucketedSeries,
    first: i64,
    last: i64,
) -> Result<BucketedSeries, StatsError> {
    if last < first {
        return Err(StatsError::MisalignedSeries(format!(
            "empty target window {first}..={last}"
        )));
    }
    let width = (last - first + 1) as usize;

    let (Some(own_first), Some(own_last)) = (series.first_key(), series.last_key()) else {
        return Ok(BucketedSeries::dense(
            series.granularity(),
            first,
            series.is_cumulative(),
            vec![0.0; width],
        ));
    };

    if own_first < first || own_last > last {
        return Err(StatsError::MisalignedSeries(format!(
            "{} series window {own_first}..={own_last} does not fit in {first}..={last}",
            series.granularity()
        )));
    }

    let lead = (own_first - first) as usize;
    let tail = (last - own_last) as usize;
    let tail_value = if series.is_cumulative() {
        series.last_value()
    } else {
        0.0
    };

    let mut values = Vec::with_capacity(width);
    values.extend(std::iter::repeat_n(0.0, lead));
    values.extend_from_slice(series.values());
    values.extend(std::iter::repeat_n(tail_value, tail));

    Ok(BucketedSeries::dense(
        series.granularity(),
        first,
        series.is_cumulative(),
        values,
    ))
}

/// Sum several series bucket by bucket over their shared window.
pub fn zip(series: &[&BucketedSeries]) -> Result<BucketedSeries, StatsError> {
    let Some(head) = series.first() else {
        return Err(StatsError::MisalignedSeries("nothing to compose".into()));
    };
    let granularity = head.granularity();
    let cumulative = head.is_cumulative();

    for s in series {
        if s.granularity() != granularity {
            return Err(StatsError::MisalignedSeries(format!(
                "cannot merge {} series with {} series",
                granularity,
                s.granularity()
            )));
        }
        if s.is_cumulative() != cumulative {
            return Err(StatsError::MisalignedSeries(
                "cannot merge running totals with period sums".into(),
            ));
        }
    }

    // Union window over the series that saw data.
    let first = series.iter().filter_map(|s| s.first_key()).min();
    let last = series.iter().filter_map(|s| s.last_key()).max();
    let (Some(first), Some(last)) = (first, last) else {
        return Ok(BucketedSeries::empty(granularity, cumulative));
    };

    let mut sum = vec![0.0; (last - first + 1) as usize];
    for s in series {
        let aligned = rewindow(s, first, last)?;
        for (acc, v) in sum.iter_mut().zip(aligned.values()) {
            *acc += v;
        }
    }

    Ok(BucketedSeries::dense(granularity, first, cumulative, sum))
}

/// [`zip`] applied to every granularity.
pub fn zip_granular(series: &[&GranularSeries]) -> Result<GranularSeries, StatsError> {
    GranularSeries::try_from_fn(|g| {
        let per_granularity: Vec<&BucketedSeries> = series.iter().map(|s| s.get(g)).collect();
        zip(&per_granularity)
    })
}
