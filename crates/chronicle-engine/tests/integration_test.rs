//! Integration tests for chronicle-engine.
//!
//! These run raw export fixtures through normalization and every
//! aggregation pass, plus property checks on the period and range math.

use chrono::{Datelike, NaiveDate};
use chronicle_common::test_utils::property_testing::{date_range_strategy, date_strategy};
use chronicle_common::test_utils::config_fixtures::full_config_yaml;
use chronicle_common::test_utils::record_fixtures::{artist_scenario, music_play, reading_session};
use chronicle_common::test_utils::{assert_approx_eq, init_test_logging, mock_date, mock_datetime};
use chronicle_common::{ClockZone, SourceDomain, TimeBracket};
use chronicle_config::{Config, ConfigLoader, SourceMapping};
use chronicle_engine::{
    bin_activity, bucketize, period_universe, rank_top, rank_top_named, ActivityEngine, ActivityRecord, Dimension,
    Granularity, Handle, Measure, RangeMapper, RangeSelection, RecordNormalizer,
};
use proptest::prelude::*;
use serde_json::json;

fn music_normalizer() -> RecordNormalizer {
    RecordNormalizer::new(SourceMapping::music(), ClockZone::Utc)
}

#[test]
fn test_unknown_artist_scenario() {
    init_test_logging();

    let records = music_normalizer().normalize_batch(&artist_scenario());
    assert_eq!(records.len(), 4);

    let ranked = rank_top(&records, Dimension::Artist, 10);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name, "A");
    assert_eq!(ranked[0].play_count, 3);
    assert_eq!(ranked[0].indicator_value, Some(50.0));
}

#[test]
fn test_single_month_page_bucket() {
    let engine = ActivityEngine::new(&Config::default());
    let raw = json!([reading_session("Octavia Butler", "Kindred", "2024-06-15", 40)]);
    let records = engine.load(SourceDomain::Reading, &raw);

    let buckets = bucketize(
        &records,
        mock_date(2024, 6, 1),
        mock_date(2024, 6, 30),
        Granularity::Monthly,
        &Measure::Field("page_split".to_string()),
    );
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].period, "2024-06");
    assert_eq!(buckets[0].display_label, "Jun 2024");
    assert_eq!(buckets[0].aggregate_value, 40.0);
}

#[test]
fn test_album_and_track_rankings() {
    let raw = json!([
        music_play("A", "Intro", "2024-01-01T08:00:00Z", 60_000),
        music_play("B", "Intro", "2024-01-01T09:00:00Z", 60_000),
        music_play("B", "Intro", "2024-01-01T10:00:00Z", 60_000),
    ]);
    let records = music_normalizer().normalize_batch(&raw);

    let tracks = rank_top(&records, Dimension::Track, 10);
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].name, "Intro by B");
    assert_eq!(tracks[0].display_name, "Intro");

    let albums = rank_top(&records, Dimension::Album, 10);
    assert_eq!(albums[0].name, "Fixture Album by B");
    assert_eq!(albums[0].indicator_value, Some(2019.0));
}

#[test]
fn test_non_array_input_ranks_nothing() {
    let records = music_normalizer().normalize_batch(&json!({"artist_name": "A"}));
    assert!(records.is_empty());
    assert!(rank_top_named(&records, "artist", 10).is_empty());
}

#[test]
fn test_configured_layout_and_brackets() {
    let config = ConfigLoader::parse(full_config_yaml()).expect("fixture parses");
    let engine = ActivityEngine::new(&config);

    let raw = json!([
        {"artistName": "A", "trackName": "x", "endTime": "2024-06-16 21:15", "msPlayed": 120_000},
        {"artistName": "A", "trackName": "y", "endTime": "2024-06-16 03:00", "msPlayed": "60000"}
    ]);
    let records = engine.load(SourceDomain::Music, &raw);
    let heatmap = engine.heatmap(&records, None);

    assert_eq!(heatmap.bracket_labels, vec!["LATE", "DAY", "EVENING"]);
    assert_eq!(heatmap.cell(0, 2), 2.0);
    assert_eq!(heatmap.cell(0, 0), 1.0);
    assert_eq!(heatmap.max_value, 2.0);
}

#[test]
fn test_range_filter_feeds_ranking() {
    let raw = json!([
        music_play("A", "1", "2024-01-10T10:00:00", 60_000),
        music_play("B", "1", "2024-02-10T10:00:00", 60_000),
        music_play("B", "2", "2024-02-11T10:00:00", 60_000),
    ]);
    let records = music_normalizer().normalize_batch(&raw);

    let mapper = RangeMapper::from_records(&records).expect("dated records");
    let mut selection = RangeSelection::new(mapper);
    let cutoff = mapper.date_to_position(mock_datetime(2024, 2, 1, 0, 0, 0));
    assert!(selection.move_handle(Handle::Start, cutoff));

    let visible = selection.date_range().filter_records(&records);
    let ranked = rank_top(&visible, Dimension::Artist, 10);
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].name, "B");
}

#[test]
fn test_boundary_period_counts() {
    assert_eq!(period_universe(mock_date(2024, 2, 1), mock_date(2024, 3, 1), Granularity::Daily).len(), 30);
    assert_eq!(period_universe(mock_date(2023, 2, 1), mock_date(2023, 3, 1), Granularity::Daily).len(), 29);
    assert_eq!(
        period_universe(mock_date(2023, 11, 15), mock_date(2025, 1, 3), Granularity::Monthly).len(),
        15
    );
    assert_eq!(
        period_universe(mock_date(2023, 11, 15), mock_date(2025, 1, 3), Granularity::Yearly).len(),
        3
    );
}

fn expected_periods(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> usize {
    let years = end.year() - start.year();
    let count = match granularity {
        Granularity::Daily => (end - start).num_days() + 1,
        Granularity::Monthly => i64::from(years * 12 + end.month() as i32 - start.month() as i32 + 1),
        Granularity::Yearly => i64::from(years + 1),
    };
    usize::try_from(count).unwrap_or(0)
}

fn dated(date: NaiveDate, hour: u32, seconds: f64) -> ActivityRecord {
    ActivityRecord {
        creator: Some("A".to_string()),
        timestamp: date.and_hms_opt(hour, 0, 0),
        duration_seconds: seconds,
        ..ActivityRecord::default()
    }
}

fn granularity_strategy() -> impl Strategy<Value = Granularity> {
    prop_oneof![
        Just(Granularity::Yearly),
        Just(Granularity::Monthly),
        Just(Granularity::Daily)
    ]
}

proptest! {
    #[test]
    fn prop_period_universe_is_gapless(
        (start, end) in date_range_strategy(1500),
        granularity in granularity_strategy(),
    ) {
        let periods = period_universe(start, end, granularity);
        prop_assert_eq!(periods.len(), expected_periods(start, end, granularity));

        let keys: Vec<String> = periods.iter().map(|p| granularity.period_key(*p)).collect();
        let mut unique = keys.clone();
        unique.dedup();
        prop_assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn prop_every_in_range_record_is_counted_once(
        (start, end) in date_range_strategy(400),
        offsets in prop::collection::vec(0i64..400, 0..40),
        granularity in granularity_strategy(),
    ) {
        let span = (end - start).num_days();
        let records: Vec<ActivityRecord> = offsets
            .iter()
            .map(|o| dated(start + chrono::Duration::days(o % (span + 1)), 12, 60.0))
            .collect();

        let buckets = bucketize(&records, start, end, granularity, &Measure::Count);
        let counted: u64 = buckets.iter().map(|b| b.record_count).sum();
        prop_assert_eq!(counted as usize, records.len());
    }

    #[test]
    fn prop_heatmap_conserves_minutes(
        rows in prop::collection::vec((date_strategy(), 0u32..24, 0.0f64..10_000.0, any::<bool>()), 0..60),
    ) {
        let records: Vec<ActivityRecord> = rows
            .iter()
            .map(|(date, hour, seconds, has_time)| {
                let mut record = dated(*date, *hour, *seconds);
                if !has_time {
                    record.timestamp = None;
                }
                record
            })
            .collect();

        let binnable: f64 = records
            .iter()
            .filter(|r| r.timestamp.is_some())
            .map(ActivityRecord::minutes)
            .sum();

        let heatmap = bin_activity(&records, &TimeBracket::default_brackets(), None);
        prop_assert!((heatmap.total() - binnable).abs() < 1e-6);
        prop_assert!(heatmap.matrix.iter().flatten().all(|cell| *cell <= heatmap.max_value));
    }

    #[test]
    fn prop_position_round_trip(
        (start, end) in date_range_strategy(3650).prop_filter("non-empty span", |(s, e)| s < e),
        position in 0.0f64..=100.0,
    ) {
        let mapper = RangeMapper::new(
            start.and_hms_opt(0, 0, 0).unwrap_or_default(),
            end.and_hms_opt(0, 0, 0).unwrap_or_default(),
        );
        let back = mapper.date_to_position(mapper.position_to_date(position));
        prop_assert!((back - position).abs() < 1e-6);
    }

    #[test]
    fn prop_rejected_moves_leave_selection_unchanged(
        first in 0.0f64..=100.0,
        second in 0.0f64..=100.0,
    ) {
        let mapper = RangeMapper::new(mock_datetime(2020, 1, 1, 0, 0, 0), mock_datetime(2024, 1, 1, 0, 0, 0));
        let mut selection = RangeSelection::new(mapper);
        selection.move_handle(Handle::End, first);

        let before = selection.clone();
        if !selection.move_handle(Handle::Start, second) {
            prop_assert_eq!(&selection, &before);
        }
        prop_assert!(selection.start() < selection.end());
    }

    #[test]
    fn prop_rank_top_is_bounded_and_deterministic(
        artists in prop::collection::vec(0usize..8, 0..50),
        n in 0usize..6,
    ) {
        let records: Vec<ActivityRecord> = artists
            .iter()
            .map(|i| ActivityRecord {
                creator: Some(if *i == 0 { "Unknown Artist".to_string() } else { format!("Artist {i}") }),
                ..ActivityRecord::default()
            })
            .collect();

        let first = rank_top(&records, Dimension::Artist, n);
        prop_assert!(first.len() <= n);
        prop_assert!(first.iter().all(|e| e.name != "Unknown Artist"));
        prop_assert_eq!(first, rank_top(&records, Dimension::Artist, n));
    }
}

#[test]
fn test_engine_slider_reports_gesture() {
    let records = vec![
        dated(mock_date(2024, 1, 1), 9, 60.0),
        dated(mock_date(2024, 12, 31), 9, 60.0),
    ];
    let engine = ActivityEngine::new(&Config::default());
    let mut slider = engine.slider(&records).expect("dated records");
    let mut changes = slider.subscribe();

    {
        let mut drag = slider.begin_drag(Handle::End);
        drag.move_to(50.0);
        drag.move_to(49.0);
    }

    let change = changes.try_recv().expect("one change after the drag");
    assert_eq!(change.start_date, "2024-01-01");
    assert!(changes.try_recv().is_err());

    let position = slider.selection().position(Handle::End);
    assert_approx_eq(position, 49.0, 1e-6);
}
