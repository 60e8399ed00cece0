//! # Curve Module - Plot-Ready Trend Lines
//!
//! Resamples a score series and its rolling average into smooth curves using monotone
//! piecewise cubic Hermite interpolation (Fritsch-Carlson). Between two data points the
//! curve never leaves the range spanned by them, so a steadily rising score is drawn
//! without the dips an ordinary cubic spline would add.

use serde::Serialize;
use thiserror::Error;

use crate::{EpochSeconds, Timestamp, epoch_seconds, from_epoch_micros};

mod ticks;

pub use ticks::{Ticks, quantile, x_ticks, y_ticks};

/// How many points a curve is resampled to by default
pub const DEFAULT_SAMPLES: usize = 500;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurveError {
    #[error("Series lengths differ: {timestamps} timestamps, {scores} scores, {averages} averages")]
    LengthMismatch {
        timestamps: usize,
        scores: usize,
        averages: usize,
    },

    #[error("x and y lengths differ: {x} x values, {y} y values")]
    SeriesLengthMismatch { x: usize, y: usize },

    #[error("Timestamps must be strictly increasing (index {0})")]
    NonIncreasing(usize),

    #[error("Curves need at least 2 samples, got {0}")]
    InvalidSamples(usize),

    #[error("Cannot place ticks for an empty series")]
    Empty,
}

/// A score curve and an average curve sharing one time axis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Curve {
    /// Seconds since the UNIX epoch
    pub x: Vec<EpochSeconds>,
    pub score: Vec<f64>,
    pub average: Vec<f64>,
    /// Whether the points were interpolated, or are the input points
    pub interpolated: bool,
}

impl Curve {
    /// Build the curves for a score series and its average
    ///
    /// With fewer than two points, or with repeated timestamps, there is no function of
    /// time to interpolate, and the input points are returned as they are.
    pub fn build(
        timestamps: &[Timestamp],
        scores: &[f64],
        averages: &[f64],
        samples: usize,
    ) -> Result<Self, CurveError> {
        if timestamps.len() != scores.len() || timestamps.len() != averages.len() {
            return Err(CurveError::LengthMismatch {
                timestamps: timestamps.len(),
                scores: scores.len(),
                averages: averages.len(),
            });
        }

        let x: Vec<EpochSeconds> = timestamps.iter().map(epoch_seconds).collect();

        let repeated = x.windows(2).any(|pair| pair[1] <= pair[0]);
        if repeated {
            log::debug!("Timestamps repeat, keeping the {} input points", x.len());
        }

        if x.len() < 2 || repeated {
            return Ok(Self {
                x,
                score: scores.to_vec(),
                average: averages.to_vec(),
                interpolated: false,
            });
        }

        if samples < 2 {
            return Err(CurveError::InvalidSamples(samples));
        }

        let score = MonotoneCubic::new(&x, scores)?;
        let average = MonotoneCubic::new(&x, averages)?;
        let resampled = linspace(x[0], x[x.len() - 1], samples);

        Ok(Self {
            score: resampled.iter().map(|&t| score.evaluate(t)).collect(),
            average: resampled.iter().map(|&t| average.evaluate(t)).collect(),
            x: resampled,
            interpolated: true,
        })
    }

    pub const fn len(&self) -> usize {
        self.x.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The time axis as timestamps
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.x
            .iter()
            .filter_map(|&seconds| from_epoch_micros((seconds * 1_000_000.0).round() as i64))
            .collect()
    }
}

/// Piecewise cubic Hermite interpolant with Fritsch-Carlson slopes
#[derive(Debug, Clone)]
pub struct MonotoneCubic<'a> {
    x: &'a [f64],
    y: &'a [f64],
    slopes: Vec<f64>,
}

impl<'a> MonotoneCubic<'a> {
    /// Needs at least two points with strictly increasing `x`
    pub fn new(x: &'a [f64], y: &'a [f64]) -> Result<Self, CurveError> {
        if x.len() != y.len() {
            return Err(CurveError::SeriesLengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(CurveError::InvalidSamples(x.len()));
        }
        if let Some(index) = x.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(CurveError::NonIncreasing(index + 1));
        }

        Ok(Self {
            x,
            y,
            slopes: slopes(x, y),
        })
    }

    /// Value of the interpolant at `t`. Outside the data the end segments are extended.
    pub fn evaluate(&self, t: f64) -> f64 {
        let last = self.x.len() - 2;
        let k = self
            .x
            .partition_point(|&x| x <= t)
            .saturating_sub(1)
            .min(last);

        let h = self.x[k + 1] - self.x[k];
        let u = (t - self.x[k]) / h;
        let u2 = u * u;
        let u3 = u2 * u;

        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;

        h00 * self.y[k]
            + h10 * h * self.slopes[k]
            + h01 * self.y[k + 1]
            + h11 * h * self.slopes[k + 1]
    }
}

fn slopes(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|pair| pair[1] - pair[0]).collect();
    let delta: Vec<f64> = (0..n - 1).map(|k| (y[k + 1] - y[k]) / h[k]).collect();

    if n == 2 {
        return vec![delta[0]; 2];
    }

    let mut d = vec![0.0; n];

    for k in 1..n - 1 {
        if delta[k - 1] * delta[k] <= 0.0 {
            continue;
        }
        // Weighted harmonic mean of the neighbouring secants
        let w1 = 2.0 * h[k] + h[k - 1];
        let w2 = h[k] + 2.0 * h[k - 1];
        d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
    }

    d[0] = end_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);

    d
}

/// One-sided three-point slope, limited to keep the end segment monotone
fn end_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);

    if sign(d) != sign(delta0) {
        0.0
    } else if sign(delta0) != sign(delta1) && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

// Unlike `f64::signum`, zero has its own sign
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

fn linspace(start: f64, end: f64, samples: usize) -> Vec<f64> {
    let step = (end - start) / (samples - 1) as f64;
    (0..samples)
        .map(|i| {
            if i == samples - 1 {
                end
            } else {
                start + step * i as f64
            }
        })
        .collect()
}
