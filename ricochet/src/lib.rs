//! # Ricochet - Aim-Trainer Session Statistics
//!
//! Ricochet turns the per-session stat files written by KovaaK's into time series,
//! summary statistics and plot-ready curves.
//!
//! ## Pipeline
//!
#![doc = simple_mermaid::mermaid!("../diagrams/pipeline.mmd")]
//!
//! ## Usage
//!
//! ```rust
//! use ricochet::{Metric, SessionRecord, group, project, rolling_average, summarize};
//!
//! let contents = "Kill #,Timestamp\n1,13:51:05\n\nWeapon,Shots\nLG,10\n\n\
//! Kills:,12\nScore:,640.5\nHit Count:,30\nMiss Count:,10\nScenario:,Tile Frenzy\n";
//!
//! let record = SessionRecord::parse(
//!     "Tile Frenzy - Challenge - 2022.10.19-13.51.05 Stats.csv",
//!     contents,
//! )
//! .unwrap();
//!
//! let sessions = group(&[record], 8.0).unwrap();
//! let series = project(&sessions, Metric::Score).unwrap();
//! let averaged = rolling_average(&series.values(), 5).unwrap();
//! let summary = summarize(&averaged).unwrap();
//!
//! assert_eq!(summary.max, 640);
//! ```

pub mod config;
pub mod curve;
pub mod folder;
pub mod group;
pub mod merge;
pub mod metric;
pub mod report;
pub mod series;
pub mod session;
pub mod summary;

pub use config::Configuration;
pub use curve::{Curve, CurveError, Ticks};
pub use folder::{FolderError, OnError, StatsFolder};
pub use group::{GroupError, group};
pub use merge::{MergeError, ReduceMode, merge};
pub use metric::{Metric, MetricValue};
pub use report::{ReportError, ScenarioReport};
pub use series::{SeriesError, TimeSeries, project, rolling_average};
pub use session::{ParseError, SessionRecord};
pub use summary::{Summary, SummaryError, summarize};

/// Wall-clock time of a session. Stat file names carry no timezone.
pub type Timestamp = chrono::NaiveDateTime;

/// Seconds since the UNIX epoch, as used on the time axis of curves
pub(crate) type EpochSeconds = f64;

pub(crate) fn epoch_seconds(timestamp: &Timestamp) -> EpochSeconds {
    timestamp.and_utc().timestamp_micros() as EpochSeconds / 1_000_000.0
}

pub(crate) fn from_epoch_micros(micros: i64) -> Option<Timestamp> {
    chrono::DateTime::from_timestamp_micros(micros).map(|datetime| datetime.naive_utc())
}

/// Round a value for display, ties to even.
pub(crate) fn round_display(value: f64) -> f64 {
    value.round_ties_even()
}
