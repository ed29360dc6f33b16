//! Configuration schema definitions using serde.

use crate::validator::{ConfigError, ConfigValidator};
use chronicle_common::{ClockZone, DurationUnit, LoggingConfig, SourceDomain, TimeBracket};
use serde::{Deserialize, Serialize};

/// Main configuration structure for Chronicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Aggregation engine configuration.
    pub engine: EngineConfig,
    /// Heatmap configuration.
    pub heatmap: HeatmapConfig,
    /// Field layout of each source export.
    pub sources: SourcesConfig,
    /// File-fetch proxy configuration.
    pub proxy: ProxyConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Aggregation engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of entities returned by top-N rankings.
    pub default_top_n: usize,
    /// Number of shows returned by the podcast ranking.
    pub podcast_top_n: usize,
    /// How timestamps are interpreted when binning by day and hour.
    pub timezone: ClockZone,
}

/// Heatmap configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    /// Time-of-day brackets; must cover every hour exactly once.
    pub brackets: Vec<TimeBracket>,
}

/// Field layout for every supported source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Music play exports.
    #[serde(default = "SourceMapping::music")]
    pub music: SourceMapping,
    /// Podcast listening exports.
    #[serde(default = "SourceMapping::podcast")]
    pub podcast: SourceMapping,
    /// Reading session logs.
    #[serde(default = "SourceMapping::reading")]
    pub reading: SourceMapping,
}

impl SourcesConfig {
    /// Mapping for the given domain.
    pub const fn mapping(&self, domain: SourceDomain) -> &SourceMapping {
        match domain {
            SourceDomain::Music => &self.music,
            SourceDomain::Podcast => &self.podcast,
            SourceDomain::Reading => &self.reading,
        }
    }
}

/// Names of the raw fields a source uses for each semantic slot.
///
/// Optional slots set to `None` are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceMapping {
    /// Primary subject: artist, show, or author.
    pub creator: String,
    /// Secondary subject: track, episode, or book title.
    pub title: Option<String>,
    /// Grouping above the title, such as an album.
    pub collection: Option<String>,
    /// Stable identifier for a song across exports.
    pub song_key: Option<String>,
    /// When the activity happened.
    pub timestamp: String,
    /// How long the activity lasted.
    pub duration: Option<String>,
    /// Unit of the duration field.
    pub duration_unit: DurationUnit,
    /// Secondary numeric indicator (popularity, pages).
    pub metric: Option<String>,
    /// Release date used to derive a release year.
    pub release_date: Option<String>,
}

impl Default for SourceMapping {
    fn default() -> Self {
        Self::music()
    }
}

/// File-fetch proxy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Socket address the proxy listens on.
    pub bind_address: String,
    /// Upstream URL with an `{id}` placeholder for the file identifier.
    pub upstream_url_template: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Largest accepted upstream body in bytes.
    pub max_response_bytes: u64,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigValidator::validate(self)
    }
}
