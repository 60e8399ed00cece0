//! # Metric Module - The Stat-File Vocabulary
//!
//! KovaaK's writes a fixed set of numeric fields for every session. [`Metric`] is the
//! closed enumeration of those fields plus the values derived from them, so selecting a
//! target metric is checked at compile time instead of by string lookup.
//!
//! ```rust
//! use std::str::FromStr;
//! use ricochet::Metric;
//!
//! assert_eq!(Metric::from_str("avg_ttk").unwrap(), Metric::AvgTtk);
//! assert_eq!(Metric::Accuracy.key(), None);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr, VariantNames};

/// A numeric stat value
///
/// The type is decided by the raw text: values containing a decimal point are floats,
/// everything else is an integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    /// Parse a raw stat value
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.contains('.') {
            raw.parse().ok().map(Self::Float)
        } else {
            raw.parse().ok().map(Self::Int)
        }
    }

    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }

    pub const fn is_zero(self) -> bool {
        match self {
            Self::Int(value) => value == 0,
            Self::Float(value) => value == 0.0,
        }
    }
}

// Numeric comparison, so `Int(5) == Float(5.0)`.
impl PartialEq for MetricValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            _ => self.as_f64() == other.as_f64(),
        }
    }
}

impl PartialOrd for MetricValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl std::ops::Add for MetricValue {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            // Sums past the integer range continue as floats
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Float(a as f64 + b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

/// A metric that can be charted
///
/// The string form of every variant is the canonical key the parser produces for it
/// (lower-case, spaces replaced by underscores).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    IntoStaticStr,
    VariantNames,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Kills,
    Deaths,
    FightTime,
    TimeRemaining,
    AvgTtk,
    DamageDone,
    DamageTaken,
    HitCount,
    MissCount,
    Midairs,
    Midaired,
    Directs,
    Directed,
    Reloads,
    DistanceTraveled,
    MbsPoints,
    #[default]
    Score,
    PauseCount,
    PauseDuration,
    /// `hit_count + miss_count`
    Shots,
    /// `hit_count / shots`
    Accuracy,
}

impl Metric {
    /// The stat-file key this metric is stored under, or `None` for derived metrics
    pub fn key(self) -> Option<&'static str> {
        match self {
            Self::Shots | Self::Accuracy => None,
            stored => Some(stored.into()),
        }
    }

    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn is_derived(self) -> bool {
        matches!(self, Self::Shots | Self::Accuracy)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
