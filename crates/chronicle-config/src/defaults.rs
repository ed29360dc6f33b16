//! Default values for every configuration section.

use crate::schema::*;
use chronicle_common::{ClockZone, DurationUnit, LoggingConfig, TimeBracket};

/// Default number of entities in a top-N ranking.
pub const DEFAULT_TOP_N: usize = 10;
/// Default number of shows in the podcast ranking.
pub const DEFAULT_PODCAST_TOP_N: usize = 5;
/// Default upstream document host template.
pub const DEFAULT_UPSTREAM_TEMPLATE: &str = "https://drive.google.com/uc?export=download&id={id}";
/// Default upstream body limit (10 MiB).
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            heatmap: HeatmapConfig::default(),
            sources: SourcesConfig::default(),
            proxy: ProxyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            podcast_top_n: DEFAULT_PODCAST_TOP_N,
            timezone: ClockZone::Local,
        }
    }
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            brackets: TimeBracket::default_brackets(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            music: SourceMapping::music(),
            podcast: SourceMapping::podcast(),
            reading: SourceMapping::reading(),
        }
    }
}

impl SourceMapping {
    /// Field layout of the music play export.
    pub fn music() -> Self {
        Self {
            creator: "artist_name".to_string(),
            title: Some("track_name".to_string()),
            collection: Some("album_name".to_string()),
            song_key: Some("song_key".to_string()),
            timestamp: "played_at".to_string(),
            duration: Some("duration_ms".to_string()),
            duration_unit: DurationUnit::Milliseconds,
            metric: Some("popularity".to_string()),
            release_date: Some("release_date".to_string()),
        }
    }

    /// Field layout of the podcast listening export.
    pub fn podcast() -> Self {
        Self {
            creator: "podcast_name".to_string(),
            title: Some("episode_name".to_string()),
            collection: None,
            song_key: None,
            timestamp: "played_at".to_string(),
            duration: Some("duration_ms".to_string()),
            duration_unit: DurationUnit::Milliseconds,
            metric: None,
            release_date: None,
        }
    }

    /// Field layout of the reading log.
    pub fn reading() -> Self {
        Self {
            creator: "author".to_string(),
            title: Some("title".to_string()),
            collection: None,
            song_key: None,
            timestamp: "date".to_string(),
            duration: Some("minutes".to_string()),
            duration_unit: DurationUnit::Minutes,
            metric: Some("page_split".to_string()),
            release_date: None,
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            upstream_url_template: DEFAULT_UPSTREAM_TEMPLATE.to_string(),
            timeout_seconds: 30,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_common::SourceDomain;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_mapping_lookup_by_domain() {
        let sources = SourcesConfig::default();
        assert_eq!(sources.mapping(SourceDomain::Music).creator, "artist_name");
        assert_eq!(sources.mapping(SourceDomain::Podcast).creator, "podcast_name");
        assert_eq!(
            sources.mapping(SourceDomain::Reading).duration_unit,
            DurationUnit::Minutes
        );
    }
}
