//! # Report Module - One Scenario, End to End
//!
//! Builds everything a renderer needs to chart one scenario:
//!
//! 1. keep the sessions of the scenario inside the day window, sorted by time
//! 2. project them onto the target metric and summarize the raw values and their
//!    rolling average
//! 3. group the sessions (if enabled), project again and average the grouped values
//! 4. interpolate the grouped values and their average, and place the axis ticks
//!
//! Summaries always describe the ungrouped sessions. The chart shows grouped sessions,
//! with the ungrouped minimum and maximum forced onto its value axis.

use chrono::NaiveDate;
use derive_more::From;
use serde::Serialize;
use thiserror::Error;

use crate::config::{Configuration, ConfigurationError};
use crate::curve::{Curve, CurveError, Ticks};
use crate::group::{GroupError, group};
use crate::metric::Metric;
use crate::series::{SeriesError, TimeSeries, project, rolling_average};
use crate::session::SessionRecord;
use crate::summary::{Summary, SummaryError, summarize};

#[derive(Debug, From, Error)]
pub enum ReportError {
    #[error("Invalid configuration: {0}")]
    Configuration(ConfigurationError),

    #[error("Failed to group sessions: {0}")]
    Group(GroupError),

    #[error("Failed to build series: {0}")]
    Series(SeriesError),

    #[error("Failed to summarize series: {0}")]
    Summary(SummaryError),

    #[error("Failed to build curve: {0}")]
    Curve(CurveError),
}

/// Everything needed to chart one scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub metric: Metric,
    /// Number of sessions inside the day window
    pub sessions: usize,
    /// Every session
    pub raw: TimeSeries,
    /// Sessions after grouping. Equal to `raw` when grouping is disabled.
    pub grouped: TimeSeries,
    /// Rolling average of `grouped`
    pub grouped_average: Vec<f64>,
    /// Summary of `raw`
    pub raw_summary: Summary,
    /// Summary of the rolling average of `raw`
    pub average_summary: Summary,
    pub curve: Curve,
    pub ticks: Ticks,
}

impl ScenarioReport {
    /// Build the report of `scenario_name` from any set of sessions
    ///
    /// * `records` - Sessions of any scenarios, in any order
    /// * `today` - The reference date of the day window
    ///
    /// Returns `Ok(None)` if no session of the scenario lies inside the day window.
    pub fn build(
        scenario_name: &str,
        records: &[SessionRecord],
        config: &Configuration,
        today: NaiveDate,
    ) -> Result<Option<Self>, ReportError> {
        config.validate()?;

        let mut sessions: Vec<SessionRecord> = records
            .iter()
            .filter(|record| record.scenario_name == scenario_name)
            .filter(|record| within_days(record, config.days, today))
            .cloned()
            .collect();

        if sessions.is_empty() {
            log::debug!("No sessions of '{scenario_name}' to report");
            return Ok(None);
        }

        sessions.sort_by_key(|record| record.timestamp);

        let raw = project(&sessions, config.metric)?;
        let raw_values = raw.values();
        let raw_summary = summarize(&raw_values)?;
        let average_summary = summarize(&rolling_average(&raw_values, config.average_sessions)?)?;

        let grouped = match config.group_hours {
            Some(hours) => project(&group(&sessions, hours)?, config.metric)?,
            None => raw.clone(),
        };
        let grouped_values = grouped.values();
        let grouped_timestamps = grouped.timestamps();
        let grouped_average = rolling_average(&grouped_values, config.average_sessions)?;

        let curve = Curve::build(
            &grouped_timestamps,
            &grouped_values,
            &grouped_average,
            config.curve_samples,
        )?;
        let ticks = Ticks::new(
            &grouped_timestamps,
            &grouped_values,
            (raw_summary.min as f64, raw_summary.max as f64),
        )?;

        log::debug!(
            "'{scenario_name}': {} session(s), {} after grouping",
            sessions.len(),
            grouped.len()
        );

        Ok(Some(Self {
            scenario_name: scenario_name.to_string(),
            metric: config.metric,
            sessions: sessions.len(),
            raw,
            grouped,
            grouped_average,
            raw_summary,
            average_summary,
            curve,
            ticks,
        }))
    }
}

fn within_days(record: &SessionRecord, days: Option<u32>, today: NaiveDate) -> bool {
    days.is_none_or(|days| {
        (record.timestamp.date() - today).num_days().unsigned_abs() <= u64::from(days)
    })
}
