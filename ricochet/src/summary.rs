use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::round_display;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SummaryError {
    #[error("Cannot summarize an empty series")]
    Empty,
}

/// Display statistics of a series
///
/// `max`, `min` and `avg` are rounded to the nearest integer, `std` to three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub max: i64,
    pub min: i64,
    pub avg: i64,
    /// Population standard deviation
    pub std: f64,
}

/// Summarize a non-empty series
pub fn summarize(values: &[f64]) -> Result<Summary, SummaryError> {
    if values.is_empty() {
        return Err(SummaryError::Empty);
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let (mean, std) = mean_and_std_dev(values);

    Ok(Summary {
        max: round_display(max) as i64,
        min: round_display(min) as i64,
        avg: round_display(mean) as i64,
        std: round_display(std * 1000.0) / 1000.0,
    })
}

/// Mean and population standard deviation of `values`
pub(crate) fn mean_and_std_dev(values: &[f64]) -> (f64, f64) {
    // Welford's online algorithm for numerically stable variance calculation
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for (i, &value) in values.iter().enumerate() {
        let delta = value - mean;
        mean += delta / (i + 1) as f64;
        let delta2 = value - mean;
        m2 += delta * delta2;
    }

    if values.len() <= 1 {
        return (mean, 0.0);
    }

    let variance = m2 / values.len() as f64;
    (mean, variance.sqrt())
}
