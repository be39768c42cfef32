use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One dated data point fed into the bucketer.
///
/// `value` is money (or any additive quantity) for valued sources and `None` for pure
/// date-count sources such as registrations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar date the observation belongs to.
    pub occurred_on: NaiveDate,
    /// Optional numeric payload.
    pub value: Option<f64>,
}

impl Observation {
    /// An observation carrying a numeric value.
    pub const fn valued(occurred_on: NaiveDate, value: f64) -> Self {
        Self {
            occurred_on,
            value: Some(value),
        }
    }

    /// A date-only observation.
    pub const fn dated(occurred_on: NaiveDate) -> Self {
        Self {
            occurred_on,
            value: None,
        }
    }
}

impl From<(NaiveDate, f64)> for Observation {
    fn from((occurred_on, value): (NaiveDate, f64)) -> Self {
        Self::valued(occurred_on, value)
    }
}

impl From<NaiveDate> for Observation {
    fn from(occurred_on: NaiveDate) -> Self {
        Self::dated(occurred_on)
    }
}
