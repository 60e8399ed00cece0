//! # Group Module - Clustering Sessions in Time
//!
//! Players usually run a scenario several times in a row. Grouping collapses every
//! cluster of sessions that start within `gap_hours` of the cluster's first session
//! into one data point, reported at the cluster's start with averaged stats.
//!
//! A good `gap_hours` is `24 / trainings_per_day`, e.g. `8.0` when training three times
//! a day.

use thiserror::Error;

use crate::merge::{MergeError, ReduceMode, merge};
use crate::session::SessionRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("Grouping threshold must be a positive number of hours, got {0}")]
    InvalidThreshold(String),

    #[error("Failed to merge session cluster: {0}")]
    Merge(#[from] MergeError),
}

/// Group sessions that were played close together
///
/// `records` must be sorted by timestamp. A cluster starts at the first session not yet
/// grouped (the anchor) and takes every following session whose timestamp is at most
/// `gap_hours` after the anchor's. Clusters are merged with the earliest date, the
/// earliest time and mean stats.
pub fn group(records: &[SessionRecord], gap_hours: f64) -> Result<Vec<SessionRecord>, GroupError> {
    if !(gap_hours.is_finite() && gap_hours > 0.0) {
        return Err(GroupError::InvalidThreshold(gap_hours.to_string()));
    }

    let threshold = gap_hours * 60.0 * 60.0;
    let mut grouped = Vec::new();
    let mut start = 0;

    while start < records.len() {
        let anchor = records[start].timestamp;
        let end = records[start..]
            .iter()
            .position(|record| {
                let seconds = (record.timestamp - anchor).num_milliseconds() as f64 / 1000.0;
                seconds.abs() > threshold
            })
            .map_or(records.len(), |offset| start + offset);

        log::trace!(
            "Grouping {} session(s) of '{}' starting at {anchor}",
            end - start,
            records[start].scenario_name
        );

        grouped.push(merge(
            &records[start..end],
            ReduceMode::Min,
            ReduceMode::Min,
            ReduceMode::Mean,
        )?);

        start = end;
    }

    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};

    use super::*;
    use crate::{MetricValue, Timestamp};

    fn start() -> Timestamp {
        NaiveDate::from_ymd_opt(2022, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn session(hours: i64, score: i64) -> SessionRecord {
        SessionRecord::new(
            "Tile Frenzy",
            start() + TimeDelta::hours(hours),
            [("score".to_string(), MetricValue::Int(score))]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn test_grouping_clusters_by_anchor() {
        let records = [
            session(0, 100),
            session(1, 200),
            session(3, 300),
            session(20, 400),
        ];

        let grouped = group(&records, 8.0).unwrap();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].timestamp, start());
        assert_eq!(grouped[0].get("score"), Some(MetricValue::Float(200.0)));
        assert_eq!(grouped[1].timestamp, start() + TimeDelta::hours(20));
        assert_eq!(grouped[1].get("score"), Some(MetricValue::Float(400.0)));
    }

    #[test]
    fn test_gap_is_measured_from_the_anchor() {
        // Consecutive gaps are all 5h, but 10h from the anchor ends the first cluster
        let records = [session(0, 1), session(5, 2), session(10, 3), session(15, 4)];

        let grouped = group(&records, 8.0).unwrap();

        let starts: Vec<Timestamp> = grouped.iter().map(|record| record.timestamp).collect();
        assert_eq!(starts, vec![start(), start() + TimeDelta::hours(10)]);
        assert_eq!(grouped[0].get("score"), Some(MetricValue::Float(1.5)));
        assert_eq!(grouped[1].get("score"), Some(MetricValue::Float(3.5)));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let records = [session(0, 1), session(8, 3)];
        assert_eq!(group(&records, 8.0).unwrap().len(), 1);
        assert_eq!(group(&records, 7.99).unwrap().len(), 2);
    }

    #[test]
    fn test_disjoint_sessions_stay_unchanged() {
        let records = [session(0, 10), session(9, 20), session(30, 30), session(100, 40)];

        let grouped = group(&records, 8.0).unwrap();

        assert_eq!(grouped, records.to_vec());
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert_eq!(group(&[], 8.0), Ok(Vec::new()));

        for threshold in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                group(&[session(0, 1)], threshold),
                Err(GroupError::InvalidThreshold(_))
            ));
        }
    }

    #[test]
    fn test_mixed_scenarios_fail() {
        let mut other = session(1, 5);
        other.scenario_name = "Close Long Strafes".to_string();

        assert_eq!(
            group(&[session(0, 1), other], 8.0),
            Err(GroupError::Merge(MergeError::Heterogeneous(2)))
        );
    }
}
