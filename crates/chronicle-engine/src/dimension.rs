//! Ranking dimensions as a closed table of strategies.
//!
//! Each [`Dimension`] resolves to one [`DimensionStrategy`] that decides which
//! records take part, how they are grouped and labelled, and which indicator
//! accompanies the ranked metric.

use crate::record::ActivityRecord;
use chronicle_common::{is_placeholder, ChronicleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel label for a missing artist.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
/// Sentinel label for a missing track title.
pub const UNKNOWN_TRACK: &str = "Unknown Track";
/// Sentinel label for a missing album.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
/// Sentinel label for a missing podcast show.
pub const UNKNOWN_PODCAST: &str = "Unknown Podcast";

/// Grouping axis for a top-N ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Group plays by artist.
    Artist,
    /// Group plays by song.
    Track,
    /// Group plays by album.
    Album,
    /// Group episodes by show.
    Podcast,
}

impl Dimension {
    /// Every dimension, in table order.
    pub const ALL: [Self; 4] = [Self::Artist, Self::Track, Self::Album, Self::Podcast];

    /// Name used by callers and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Track => "track",
            Self::Album => "album",
            Self::Podcast => "podcast",
        }
    }

    /// The strategy record for this dimension.
    pub fn strategy(self) -> &'static DimensionStrategy {
        match self {
            Self::Artist => &STRATEGIES[0],
            Self::Track => &STRATEGIES[1],
            Self::Album => &STRATEGIES[2],
            Self::Podcast => &STRATEGIES[3],
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ChronicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artist" | "artists" => Ok(Self::Artist),
            "track" | "tracks" | "song" | "songs" => Ok(Self::Track),
            "album" | "albums" => Ok(Self::Album),
            "podcast" | "podcasts" => Ok(Self::Podcast),
            other => Err(ChronicleError::validation_field(
                format!("unknown dimension '{other}'"),
                "dimension",
            )),
        }
    }
}

/// Metric the ranker sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankMetric {
    /// Number of records in the group.
    PlayCount,
    /// Summed minutes of the group.
    TotalMinutes,
}

/// How renderers should format an indicator value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorType {
    /// A 0-100 popularity score.
    Popularity,
    /// A release year.
    Year,
}

/// Secondary scalar shown next to the ranked metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// The value, absent when the source had none.
    pub value: Option<f64>,
    /// Formatting hint, absent for dimensions without an indicator.
    pub kind: Option<IndicatorType>,
}

impl Indicator {
    /// No indicator at all.
    pub const NONE: Self = Self {
        value: None,
        kind: None,
    };
}

/// Rules one dimension applies to records.
#[derive(Debug)]
pub struct DimensionStrategy {
    /// Dimension this strategy serves.
    pub dimension: Dimension,
    /// Filter applied before grouping.
    pub keep: fn(&ActivityRecord) -> bool,
    /// Key that decides group membership.
    pub group_key: fn(&ActivityRecord) -> String,
    /// Human label for the group, taken from its first record.
    pub display_name: fn(&ActivityRecord) -> String,
    /// Indicator for the group, taken from its first record.
    pub indicator: fn(&ActivityRecord) -> Indicator,
    /// Sort metric.
    pub rank_by: RankMetric,
    /// Size of the ranking when the caller does not choose one.
    pub default_limit: usize,
}

static STRATEGIES: [DimensionStrategy; 4] = [
    DimensionStrategy {
        dimension: Dimension::Artist,
        keep: |r| !is_placeholder(r.creator.as_deref(), UNKNOWN_ARTIST),
        group_key: artist_label,
        display_name: artist_label,
        indicator: popularity,
        rank_by: RankMetric::PlayCount,
        default_limit: 10,
    },
    DimensionStrategy {
        dimension: Dimension::Track,
        // A known artist with an unknown title still counts
        keep: |r| {
            !(is_placeholder(r.title.as_deref(), UNKNOWN_TRACK)
                && is_placeholder(r.creator.as_deref(), UNKNOWN_ARTIST))
        },
        group_key: track_key,
        display_name: track_label,
        indicator: popularity,
        rank_by: RankMetric::PlayCount,
        default_limit: 10,
    },
    DimensionStrategy {
        dimension: Dimension::Album,
        keep: |r| {
            !is_placeholder(r.collection.as_deref(), UNKNOWN_ALBUM)
                && !is_placeholder(r.creator.as_deref(), UNKNOWN_ARTIST)
        },
        group_key: |r| format!("{} by {}", album_label(r), artist_label(r)),
        display_name: album_label,
        indicator: |r| Indicator {
            value: r.release_year.map(f64::from),
            kind: Some(IndicatorType::Year),
        },
        rank_by: RankMetric::PlayCount,
        default_limit: 10,
    },
    DimensionStrategy {
        dimension: Dimension::Podcast,
        keep: |r| !is_placeholder(r.creator.as_deref(), UNKNOWN_PODCAST),
        group_key: podcast_label,
        display_name: podcast_label,
        indicator: |_| Indicator::NONE,
        rank_by: RankMetric::TotalMinutes,
        default_limit: 5,
    },
];

fn label_or(value: Option<&str>, fallback: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn artist_label(record: &ActivityRecord) -> String {
    label_or(record.creator.as_deref(), UNKNOWN_ARTIST)
}

fn track_label(record: &ActivityRecord) -> String {
    label_or(record.title.as_deref(), UNKNOWN_TRACK)
}

fn album_label(record: &ActivityRecord) -> String {
    label_or(record.collection.as_deref(), UNKNOWN_ALBUM)
}

fn podcast_label(record: &ActivityRecord) -> String {
    label_or(record.creator.as_deref(), UNKNOWN_PODCAST)
}

fn track_key(record: &ActivityRecord) -> String {
    match record.song_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => key.to_string(),
        _ => format!("{} by {}", track_label(record), artist_label(record)),
    }
}

const fn popularity(record: &ActivityRecord) -> Indicator {
    Indicator {
        value: record.metric_value,
        kind: Some(IndicatorType::Popularity),
    }
}
