//! Test utilities and shared test helpers for Chronicle.
//!
//! This module provides common fixtures and helper functions used across
//! all crates in the workspace for unit and integration testing.

use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Test fixture for a calendar date.
pub fn mock_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Test fixture for a wall-clock timestamp.
pub fn mock_datetime(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> NaiveDateTime {
    mock_date(year, month, day)
        .and_hms_opt(hour, min, sec)
        .expect("valid fixture time")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Raw activity exports as they arrive from the loaders.
pub mod record_fixtures {
    use serde_json::{json, Value};

    /// A music play in the default music field layout.
    pub fn music_play(artist: &str, track: &str, played_at: &str, duration_ms: u64) -> Value {
        json!({
            "artist_name": artist,
            "track_name": track,
            "album_name": "Fixture Album",
            "played_at": played_at,
            "duration_ms": duration_ms,
            "popularity": 50,
            "release_date": "2019-05-10",
        })
    }

    /// Three plays of "A" and one unknown-artist play on the same day.
    pub fn artist_scenario() -> Value {
        json!([
            music_play("A", "One", "2024-03-01T10:00:00", 180_000),
            music_play("A", "Two", "2024-03-01T11:00:00", 200_000),
            music_play("Unknown Artist", "Mystery", "2024-03-01T12:00:00", 150_000),
            music_play("A", "Three", "2024-03-01T13:00:00", 220_000),
        ])
    }

    /// A reading session in the default reading field layout.
    pub fn reading_session(author: &str, title: &str, date: &str, pages: u32) -> Value {
        json!({
            "author": author,
            "title": title,
            "date": date,
            "page_split": pages,
            "minutes": 30,
        })
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub const fn minimal_config_yaml() -> &'static str {
        r#"
engine:
  default_top_n: 10
  podcast_top_n: 5
  timezone: utc

proxy:
  upstream_url_template: "https://docs.example.com/export?id={id}"
"#
    }

    /// Create a full test configuration as YAML string.
    pub const fn full_config_yaml() -> &'static str {
        concat!(
            "engine:\n",
            "  default_top_n: 20\n",
            "  podcast_top_n: 3\n",
            "  timezone: utc\n",
            "\n",
            "heatmap:\n",
            "  brackets:\n",
            "    - { label: LATE, start_hour: 0, end_hour: 7 }\n",
            "    - { label: DAY, start_hour: 8, end_hour: 19 }\n",
            "    - { label: EVENING, start_hour: 20, end_hour: 23 }\n",
            "\n",
            "sources:\n",
            "  music:\n",
            "    creator: artistName\n",
            "    title: trackName\n",
            "    timestamp: endTime\n",
            "    duration: msPlayed\n",
            "    duration_unit: milliseconds\n",
            "\n",
            "proxy:\n",
            "  bind_address: \"0.0.0.0:9090\"\n",
            "  upstream_url_template: \"https://docs.example.com/files/{id}/export\"\n",
            "  timeout_seconds: 15\n",
            "  max_response_bytes: 1048576\n",
            "\n",
            "logging:\n",
            "  level: debug\n",
            "  format: json\n"
        )
    }
}

/// Property-based testing strategies using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Strategy for dates between 1990 and 2060.
    pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (0i64..25_567).prop_map(|offset| {
            NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid epoch") + chrono::Duration::days(offset)
        })
    }

    /// Strategy for ordered `(start, end)` pairs at most `max_days` apart.
    pub fn date_range_strategy(max_days: i64) -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
        (date_strategy(), 0..=max_days)
            .prop_map(|(start, span)| (start, start + chrono::Duration::days(span)))
    }
}
