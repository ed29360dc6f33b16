//! The normalized activity record every aggregation consumes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One play, episode, or reading session after normalization.
///
/// `creator`, `title` and `collection` are the subject keys of the source
/// domain (artist/track/album for music, show/episode for podcasts,
/// author/book for reading). Text fields are trimmed and never empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Artist, show, or author.
    pub creator: Option<String>,
    /// Track, episode, or book title.
    pub title: Option<String>,
    /// Album or other collection.
    pub collection: Option<String>,
    /// Stable song identifier when the export provides one.
    pub song_key: Option<String>,
    /// Wall-clock time of the activity in the configured clock zone.
    pub timestamp: Option<NaiveDateTime>,
    /// Always finite and non-negative.
    pub duration_seconds: f64,
    /// Popularity score or page count, depending on the source.
    pub metric_value: Option<f64>,
    /// Year parsed from the release date.
    pub release_year: Option<i32>,
    /// Every numeric-coercible source field, keyed by raw field name.
    pub measures: BTreeMap<String, f64>,
}

impl ActivityRecord {
    /// Duration in minutes.
    pub fn minutes(&self) -> f64 {
        chronicle_common::seconds_to_minutes(self.duration_seconds)
    }

    /// Numeric source field by name, zero when absent.
    pub fn measure(&self, field: &str) -> f64 {
        self.measures.get(field).copied().unwrap_or(0.0)
    }

    /// Whether the creator matches `key` exactly.
    pub fn has_creator(&self, key: &str) -> bool {
        self.creator.as_deref() == Some(key)
    }
}
