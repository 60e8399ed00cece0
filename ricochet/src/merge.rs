//! # Merge Module - Combining Sessions
//!
//! Several sessions of the same scenario can be collapsed into a single synthetic
//! session. The date, the time of day and the stat values are each reduced with their
//! own [`ReduceMode`], so a caller can e.g. pair the earliest date with the mean time.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metric::MetricValue;
use crate::session::SessionRecord;
use crate::{Timestamp, from_epoch_micros};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("Nothing to merge")]
    Empty,

    #[error("Different scenario names ({0})")]
    Heterogeneous(usize),

    #[error("Invalid {field}: {value}")]
    InvalidMode { field: &'static str, value: u8 },

    #[error("Session of '{scenario}' at {timestamp} is missing the '{key}' stat")]
    MissingMetric {
        scenario: String,
        timestamp: Timestamp,
        key: String,
    },

    #[error("Mean timestamp is out of range")]
    TimestampRange,
}

/// How a set of values is reduced to one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceMode {
    /// `0`
    Min,
    /// `1`
    Max,
    /// `2` - the arithmetic mean. Always yields a float for stat values.
    Mean,
}

impl ReduceMode {
    /// Convert a numeric mode constant, naming `field` in the error
    pub fn from_code(field: &'static str, value: u8) -> Result<Self, MergeError> {
        match value {
            0 => Ok(Self::Min),
            1 => Ok(Self::Max),
            2 => Ok(Self::Mean),
            value => Err(MergeError::InvalidMode { field, value }),
        }
    }

    fn timestamp(self, timestamps: &[Timestamp]) -> Result<Timestamp, MergeError> {
        match self {
            Self::Min => timestamps.iter().min().copied().ok_or(MergeError::Empty),
            Self::Max => timestamps.iter().max().copied().ok_or(MergeError::Empty),
            Self::Mean => mean_timestamp(timestamps),
        }
    }

    fn values(self, values: &[MetricValue]) -> Option<MetricValue> {
        let first = *values.first()?;
        let reduced = match self {
            Self::Min => values
                .iter()
                .copied()
                .fold(first, |min, value| if value < min { value } else { min }),
            Self::Max => values
                .iter()
                .copied()
                .fold(first, |max, value| if value > max { value } else { max }),
            Self::Mean => MetricValue::Float(
                values.iter().map(|value| value.as_f64()).sum::<f64>() / values.len() as f64,
            ),
        };
        Some(reduced)
    }
}

impl TryFrom<u8> for ReduceMode {
    type Error = MergeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code("mode", value)
    }
}

/// Merge sessions of one scenario into a single session
///
/// * `date_mode` - Reduction applied to the calendar dates
/// * `time_mode` - Reduction applied to the times of day
/// * `data_mode` - Reduction applied to every stat of the first session
///
/// The timestamp of the result combines the date of the `date_mode`-reduced timestamp
/// with the time of the `time_mode`-reduced timestamp. The mean timestamp is the mean
/// of the UNIX times of all sessions.
///
/// Stats are taken from the key set of the first session; every other session has to
/// carry the same keys.
pub fn merge(
    records: &[SessionRecord],
    date_mode: ReduceMode,
    time_mode: ReduceMode,
    data_mode: ReduceMode,
) -> Result<SessionRecord, MergeError> {
    let first = records.first().ok_or(MergeError::Empty)?;

    let names: BTreeSet<&str> = records
        .iter()
        .map(|record| record.scenario_name.as_str())
        .collect();
    if names.len() != 1 {
        return Err(MergeError::Heterogeneous(names.len()));
    }

    let timestamps: Vec<Timestamp> = records.iter().map(|record| record.timestamp).collect();
    let date = date_mode.timestamp(&timestamps)?.date();
    let time = time_mode.timestamp(&timestamps)?.time();

    let mut metrics = BTreeMap::new();
    for key in first.metrics.keys() {
        let values = records
            .iter()
            .map(|record| {
                record.get(key).ok_or_else(|| MergeError::MissingMetric {
                    scenario: record.scenario_name.clone(),
                    timestamp: record.timestamp,
                    key: key.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(value) = data_mode.values(&values) {
            metrics.insert(key.clone(), value);
        }
    }

    Ok(SessionRecord {
        scenario_name: first.scenario_name.clone(),
        timestamp: date.and_time(time),
        metrics,
    })
}

/// Merge with numeric mode constants (`0` = min, `1` = max, `2` = mean)
pub fn merge_with_codes(
    records: &[SessionRecord],
    date_mode: u8,
    time_mode: u8,
    data_mode: u8,
) -> Result<SessionRecord, MergeError> {
    merge(
        records,
        ReduceMode::from_code("date_mode", date_mode)?,
        ReduceMode::from_code("time_mode", time_mode)?,
        ReduceMode::from_code("data_mode", data_mode)?,
    )
}

fn mean_timestamp(timestamps: &[Timestamp]) -> Result<Timestamp, MergeError> {
    if timestamps.is_empty() {
        return Err(MergeError::Empty);
    }

    let total: i128 = timestamps
        .iter()
        .map(|timestamp| i128::from(timestamp.and_utc().timestamp_micros()))
        .sum();
    let mean = total.div_euclid(timestamps.len() as i128);

    i64::try_from(mean)
        .ok()
        .and_then(from_epoch_micros)
        .ok_or(MergeError::TimestampRange)
}
