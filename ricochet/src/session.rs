//! # Session Module - Parsing KovaaK's Stat Files
//!
//! Every finished challenge leaves one file in the game's `stats` folder, named
//! `<scenario> - Challenge - YYYY.MM.DD-HH.MM.SS Stats.csv`. The file consists of
//! blank-line separated blocks; the third block holds the `Key:,Value` pairs we care
//! about:
//!
//! ```text
//! Kills:,54
//! Deaths:,0
//! Fight Time:,60.000000
//! Avg TTK:,0.512000
//! ...
//! Scenario:,VoxTargetSwitch Click Small
//! Score:,642.0
//! Game Version:,3.0.0.2022-10-11-13-24
//! ```
//!
//! The session's timestamp is read from the file name, not the file system, so copies
//! of the stats folder produce identical records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::Timestamp;
use crate::metric::{Metric, MetricValue};

/// Separates the scenario name from the timestamp in a stat file name
pub const CHALLENGE_SEPARATOR: &str = " - Challenge - ";

/// Layout of the file name after [`CHALLENGE_SEPARATOR`]
pub const FILE_NAME_TIMESTAMP_FORMAT: &str = "%Y.%m.%d-%H.%M.%S Stats.csv";

const KEY_VALUE_SEPARATOR: &str = ":,";
const STATS_BLOCK: usize = 2;
const SCENARIO_KEY: &str = "scenario";
const IGNORED_KEYS: [&str; 3] = ["hash", "game_version", "challenge_start"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read stat file '{path}': {error}")]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("Stat file has no valid file name: '{path}'")]
    FileName { path: PathBuf },

    #[error(
        "File name '{file_name}' does not match '<scenario> - Challenge - YYYY.MM.DD-HH.MM.SS Stats.csv'"
    )]
    Timestamp { file_name: String },

    #[error("Line {line} of the stats block is missing the ':,' separator: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("Value of '{key}' is not a number: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Stat file does not name its scenario")]
    MissingScenario,
}

/// One completed training session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    /// The drill that was played
    pub scenario_name: String,
    /// When the session was played
    pub timestamp: Timestamp,
    /// Stat values keyed by their canonical key (e.g. `fight_time`)
    pub metrics: BTreeMap<String, MetricValue>,
}

impl SessionRecord {
    pub fn new(
        scenario_name: impl Into<String>,
        timestamp: Timestamp,
        metrics: BTreeMap<String, MetricValue>,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            timestamp,
            metrics,
        }
    }

    /// Read and parse a stat file
    ///
    /// The file is read completely and closed before parsing starts.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| ParseError::FileName {
                path: path.to_path_buf(),
            })?;

        let contents = std::fs::read_to_string(path).map_err(|error| ParseError::Read {
            path: path.to_path_buf(),
            error,
        })?;

        Self::parse(file_name, &contents)
    }

    /// Parse the contents of a stat file
    ///
    /// * `file_name` - The name of the file, which carries the session timestamp
    /// * `contents` - The text of the file
    pub fn parse(file_name: &str, contents: &str) -> Result<Self, ParseError> {
        let timestamp = timestamp_from_file_name(file_name)?;

        let mut scenario_name = None;
        let mut metrics = BTreeMap::new();
        let mut block = 0;

        for (index, line) in contents.lines().enumerate() {
            if line.is_empty() {
                block += 1;
                continue;
            }

            if block < STATS_BLOCK {
                continue;
            }
            if block > STATS_BLOCK {
                break;
            }

            let (raw_key, raw_value) =
                line.split_once(KEY_VALUE_SEPARATOR)
                    .ok_or_else(|| ParseError::MalformedLine {
                        line: index + 1,
                        content: line.to_string(),
                    })?;
            let key = normalize_key(raw_key);

            if key == SCENARIO_KEY {
                scenario_name = Some(raw_value.to_string());
                continue;
            }

            if IGNORED_KEYS.contains(&key.as_str()) {
                continue;
            }

            let value = MetricValue::parse(raw_value).ok_or_else(|| ParseError::InvalidValue {
                key: key.clone(),
                value: raw_value.to_string(),
            })?;
            metrics.insert(key, value);
        }

        let scenario_name = scenario_name
            .filter(|name| !name.is_empty())
            .ok_or(ParseError::MissingScenario)?;

        Ok(Self {
            scenario_name,
            timestamp,
            metrics,
        })
    }

    /// Get the raw value stored under `key`
    pub fn get(&self, key: &str) -> Option<MetricValue> {
        self.metrics.get(key).copied()
    }

    /// Get a stored (non-derived) metric
    pub fn stored(&self, metric: Metric) -> Option<MetricValue> {
        metric.key().and_then(|key| self.get(key))
    }

    /// Total shots fired (`hit_count + miss_count`)
    pub fn shots(&self) -> Option<MetricValue> {
        Some(self.stored(Metric::HitCount)? + self.stored(Metric::MissCount)?)
    }

    /// Fraction of shots that hit, between 0.0 and 1.0
    ///
    /// Returns `None` if the hit or miss count is missing. Returns `Some(None)` if no
    /// shots were fired.
    pub fn accuracy(&self) -> Option<Option<f64>> {
        let hits = self.stored(Metric::HitCount)?;
        let shots = self.shots()?;

        if shots.is_zero() {
            return Some(None);
        }

        Some(Some(hits.as_f64() / shots.as_f64()))
    }
}

/// Lower-case the key and replace spaces with underscores
pub fn normalize_key(raw: &str) -> String {
    raw.to_lowercase().replace(' ', "_")
}

/// The scenario name embedded in a stat file name
pub fn scenario_from_file_name(file_name: &str) -> &str {
    file_name
        .split_once(CHALLENGE_SEPARATOR)
        .map_or(file_name, |(scenario, _)| scenario)
}

/// Parse the session timestamp out of a stat file name
pub fn timestamp_from_file_name(file_name: &str) -> Result<Timestamp, ParseError> {
    let error = || ParseError::Timestamp {
        file_name: file_name.to_string(),
    };

    let (_, remainder) = file_name.split_once(CHALLENGE_SEPARATOR).ok_or_else(error)?;

    NaiveDateTime::parse_from_str(remainder, FILE_NAME_TIMESTAMP_FORMAT).map_err(|_| error())
}
