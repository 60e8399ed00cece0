//! # Configuration Module - Analysis Settings
//!
//! The numeric knobs of a report: which metric to chart, how many days to look back,
//! how sessions are grouped and how wide the rolling average is.
//!
//! ## Usage
//!
//! ```rust
//! use ricochet::{Configuration, Metric};
//!
//! // Use default configuration
//! let config = Configuration::default();
//! assert_eq!(config.days, Some(30));
//!
//! // Custom configuration
//! let config = Configuration {
//!     metric: Metric::Accuracy,
//!     days: None, // Analyze every session ever played
//!     group_hours: Some(24.0 / 5.0), // Training five times a day
//!     ..Configuration::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::DEFAULT_SAMPLES;
use crate::metric::Metric;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Grouping threshold must be a positive number of hours, got {0}")]
    GroupHours(String),

    #[error("The rolling average needs at least 1 session")]
    AverageSessions,

    #[error("Curves need at least 2 samples, got {0}")]
    CurveSamples(usize),
}

/// Settings for building scenario reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// The metric to chart
    ///
    /// **Default**: score
    pub metric: Metric,

    /// Only analyze sessions played at most this many days ago. `None` analyzes all
    /// sessions.
    ///
    /// **Default**: 30
    pub days: Option<u32>,

    /// Group sessions played within this many hours of each other. `None` disables
    /// grouping.
    ///
    /// **Default**: 8.0, three trainings a day
    pub group_hours: Option<f64>,

    /// Number of sessions in the trailing rolling average
    ///
    /// **Default**: 5
    pub average_sessions: usize,

    /// Number of points curves are resampled to
    ///
    /// **Default**: 500
    pub curve_samples: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            metric: Metric::Score,
            days: Some(30),
            group_hours: Some(8.0),
            average_sessions: 5,
            curve_samples: DEFAULT_SAMPLES,
        }
    }
}

impl Configuration {
    /// Check every setting, so bad values fail before any file is read
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(hours) = self
            .group_hours
            .filter(|hours| !(hours.is_finite() && *hours > 0.0))
        {
            return Err(ConfigurationError::GroupHours(hours.to_string()));
        }

        if self.average_sessions == 0 {
            return Err(ConfigurationError::AverageSessions);
        }

        if self.curve_samples < 2 {
            return Err(ConfigurationError::CurveSamples(self.curve_samples));
        }

        Ok(())
    }
}
