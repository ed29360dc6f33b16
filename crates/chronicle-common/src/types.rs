//! Common type definitions shared by the configuration and engine crates.

use crate::error::ChronicleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of activity export a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceDomain {
    /// Music plays (artist / track / album).
    Music,
    /// Podcast episodes (show / episode).
    Podcast,
    /// Reading sessions (author / book).
    Reading,
}

impl SourceDomain {
    /// All domains in declaration order.
    pub const ALL: [Self; 3] = [Self::Music, Self::Podcast, Self::Reading];

    /// Lowercase name used in configuration and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Music => "music",
            Self::Podcast => "podcast",
            Self::Reading => "reading",
        }
    }
}

impl fmt::Display for SourceDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceDomain {
    type Err = ChronicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "music" => Ok(Self::Music),
            "podcast" | "podcasts" => Ok(Self::Podcast),
            "reading" | "books" => Ok(Self::Reading),
            other => Err(ChronicleError::validation_field(
                format!("unknown source domain '{other}'"),
                "domain",
            )),
        }
    }
}

/// How timestamps without an explicit wall-clock interpretation are read.
///
/// `Local` follows the host timezone, the same way a browser's date parsing
/// would; `Utc` keeps results independent of the machine running the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockZone {
    /// Host local time.
    #[default]
    Local,
    /// Coordinated universal time.
    Utc,
}

impl FromStr for ClockZone {
    type Err = ChronicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "utc" => Ok(Self::Utc),
            other => Err(ChronicleError::validation_field(
                format!("unknown clock zone '{other}'"),
                "timezone",
            )),
        }
    }
}

/// Unit a source uses for its duration field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Plain seconds.
    #[default]
    Seconds,
    /// Milliseconds, as most streaming exports use.
    Milliseconds,
    /// Minutes, common for reading logs.
    Minutes,
}

impl DurationUnit {
    /// Converts a raw amount in this unit to seconds.
    pub fn to_seconds(self, amount: f64) -> f64 {
        match self {
            Self::Seconds => amount,
            Self::Milliseconds => amount / 1000.0,
            Self::Minutes => amount * 60.0,
        }
    }
}

/// An inclusive range of hours used to bin activity by time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBracket {
    /// Label shown by renderers (e.g. "MORNING").
    pub label: String,
    /// First hour covered, 0-23.
    pub start_hour: u32,
    /// Last hour covered, inclusive, 0-23.
    pub end_hour: u32,
}

impl TimeBracket {
    /// Creates a bracket covering `start_hour..=end_hour`.
    pub fn new(label: impl Into<String>, start_hour: u32, end_hour: u32) -> Self {
        Self {
            label: label.into(),
            start_hour,
            end_hour,
        }
    }

    /// Whether `hour` falls in this bracket.
    pub const fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }

    /// The four-way split used by the dashboard heatmaps.
    pub fn default_brackets() -> Vec<Self> {
        vec![
            Self::new("NIGHT", 0, 5),
            Self::new("MORNING", 6, 11),
            Self::new("AFTERNOON", 12, 17),
            Self::new("EVENING", 18, 23),
        ]
    }
}
