//! # Series Module - Metric Time Series
//!
//! Projects sessions onto `(timestamp, value)` pairs for one [`Metric`] and smooths value
//! sequences with a trailing rolling average.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::Timestamp;
use crate::metric::Metric;
use crate::session::SessionRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Unknown metric: '{0}'")]
    UnknownMetric(String),

    #[error("Session of '{scenario}' at {timestamp} has no '{metric}' stat")]
    MissingMetric {
        scenario: String,
        timestamp: Timestamp,
        metric: Metric,
    },

    #[error("Session of '{scenario}' at {timestamp} fired no shots, accuracy is undefined")]
    ZeroShots {
        scenario: String,
        timestamp: Timestamp,
    },

    #[error("Averaging window must be at least 1")]
    InvalidWindow,
}

/// A single point of a [`TimeSeries`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub timestamp: Timestamp,
    pub value: f64,
}

/// Values of one metric ordered by time
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub metric: Metric,
    pub points: Vec<Point>,
}

impl TimeSeries {
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.points.iter().map(|point| point.timestamp).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }
}

/// Look up `metric` for one session, computing derived metrics
pub fn metric_value(record: &SessionRecord, metric: Metric) -> Result<f64, SeriesError> {
    let missing = || SeriesError::MissingMetric {
        scenario: record.scenario_name.clone(),
        timestamp: record.timestamp,
        metric,
    };

    match metric {
        Metric::Shots => record.shots().map(|shots| shots.as_f64()).ok_or_else(missing),
        Metric::Accuracy => record
            .accuracy()
            .ok_or_else(missing)?
            .ok_or_else(|| SeriesError::ZeroShots {
                scenario: record.scenario_name.clone(),
                timestamp: record.timestamp,
            }),
        stored => record
            .stored(stored)
            .map(|value| value.as_f64())
            .ok_or_else(missing),
    }
}

/// Pair every session's timestamp with its value of `metric`, keeping the input order
pub fn project(records: &[SessionRecord], metric: Metric) -> Result<TimeSeries, SeriesError> {
    let points = records
        .iter()
        .map(|record| {
            metric_value(record, metric).map(|value| Point {
                timestamp: record.timestamp,
                value,
            })
        })
        .collect::<Result<_, _>>()?;

    Ok(TimeSeries { metric, points })
}

/// [`project`] with the metric given by its key, e.g. `"score"`
pub fn project_key(records: &[SessionRecord], metric_key: &str) -> Result<TimeSeries, SeriesError> {
    let metric = Metric::from_str(metric_key)
        .map_err(|_| SeriesError::UnknownMetric(metric_key.to_string()))?;
    project(records, metric)
}

/// Trailing rolling average
///
/// Element `i` of the output is the mean of `values[i + 1 - window..=i]`. Near the start
/// the window shrinks to the available elements. A window of 1 returns the input.
pub fn rolling_average(values: &[f64], window: usize) -> Result<Vec<f64>, SeriesError> {
    if window == 0 {
        return Err(SeriesError::InvalidWindow);
    }

    Ok((0..values.len())
        .map(|i| {
            let slice = &values[(i + 1).saturating_sub(window)..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect())
}
