use serde::Serialize;

use super::CurveError;
use crate::{Timestamp, from_epoch_micros, round_display};

const QUARTILES: [f64; 3] = [0.25, 0.5, 0.75];

/// Date format of the time axis labels
pub const X_LABEL_FORMAT: &str = "%d-%m";

/// Axis tick positions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ticks {
    /// First, quartiles and last timestamp
    pub x: Vec<Timestamp>,
    /// Rounded, unique and ascending
    pub y: Vec<f64>,
}

impl Ticks {
    /// Place ticks for a series, forcing `bounds` (min, max) onto the value axis
    pub fn new(
        timestamps: &[Timestamp],
        values: &[f64],
        bounds: (f64, f64),
    ) -> Result<Self, CurveError> {
        Ok(Self {
            x: x_ticks(timestamps)?,
            y: y_ticks(values, bounds.0, bounds.1)?,
        })
    }

    pub fn x_labels(&self) -> Vec<String> {
        self.x
            .iter()
            .map(|timestamp| timestamp.format(X_LABEL_FORMAT).to_string())
            .collect()
    }

    pub fn y_labels(&self) -> Vec<String> {
        self.y.iter().map(|value| format!("{value:.0}")).collect()
    }
}

/// Linearly interpolated quantile, `q` between 0.0 and 1.0
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Time axis ticks: first, the three quartiles and last
pub fn x_ticks(timestamps: &[Timestamp]) -> Result<Vec<Timestamp>, CurveError> {
    let (first, last) = timestamps
        .first()
        .zip(timestamps.last())
        .ok_or(CurveError::Empty)?;

    let micros: Vec<f64> = timestamps
        .iter()
        .map(|timestamp| timestamp.and_utc().timestamp_micros() as f64)
        .collect();

    let mut ticks = vec![*first];
    for q in QUARTILES {
        let tick = quantile(&micros, q)
            .and_then(|value| from_epoch_micros(value.round() as i64))
            .ok_or(CurveError::Empty)?;
        ticks.push(tick);
    }
    ticks.push(*last);

    Ok(ticks)
}

/// Value axis ticks
///
/// The minimum, the quartiles and the maximum of `values` are rounded and deduplicated.
/// `min` and `max` are added if their rounded value is not present yet. The result is
/// sorted ascending.
pub fn y_ticks(values: &[f64], min: f64, max: f64) -> Result<Vec<f64>, CurveError> {
    if values.is_empty() {
        return Err(CurveError::Empty);
    }

    let mut ticks = Vec::with_capacity(7);
    ticks.extend(quantile(values, 0.0));
    for q in QUARTILES {
        ticks.extend(quantile(values, q));
    }
    ticks.extend(quantile(values, 1.0));

    let mut ticks: Vec<f64> = ticks.into_iter().map(round_display).collect();
    ticks.sort_by(f64::total_cmp);
    ticks.dedup();

    for forced in [min, max].map(round_display) {
        if !ticks.contains(&forced) {
            ticks.push(forced);
        }
    }
    ticks.sort_by(f64::total_cmp);

    Ok(ticks)
}
