//! Coerces loosely typed export rows into [`ActivityRecord`]s.
//!
//! Nothing in here fails: malformed values degrade to zero or `None` so a
//! single bad row can never take down an aggregation pass.

use crate::record::ActivityRecord;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use chronicle_common::{ClockZone, DurationUnit, SourceDomain};
use chronicle_config::{Config, SourceMapping};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Epoch values above this magnitude are read as milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

// `%#z` takes `Z`, `+hh`, `+hhmm` and `+hh:mm`
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Projects raw rows of one source onto [`ActivityRecord`].
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    mapping: SourceMapping,
    zone: ClockZone,
}

impl RecordNormalizer {
    /// Creates a normalizer for an explicit field layout.
    pub const fn new(mapping: SourceMapping, zone: ClockZone) -> Self {
        Self { mapping, zone }
    }

    /// Creates a normalizer for one configured source domain.
    pub fn for_domain(config: &Config, domain: SourceDomain) -> Self {
        Self::new(config.sources.mapping(domain).clone(), config.engine.timezone)
    }

    /// Field layout in use.
    pub const fn mapping(&self) -> &SourceMapping {
        &self.mapping
    }

    /// Normalizes a single row. Returns `None` only when `value` is not an object.
    pub fn normalize(&self, value: &Value) -> Option<ActivityRecord> {
        let row = value.as_object()?;
        let mapping = &self.mapping;

        let field = |name: &Option<String>| name.as_deref().and_then(|n| row.get(n));

        Some(ActivityRecord {
            creator: coerce_text(row.get(&mapping.creator)),
            title: coerce_text(field(&mapping.title)),
            collection: coerce_text(field(&mapping.collection)),
            song_key: coerce_text(field(&mapping.song_key)),
            timestamp: coerce_timestamp(row.get(&mapping.timestamp), self.zone),
            duration_seconds: coerce_duration_seconds(field(&mapping.duration), mapping.duration_unit),
            metric_value: coerce_number(field(&mapping.metric)),
            release_year: parse_release_year(field(&mapping.release_date)),
            measures: collect_measures(row),
        })
    }

    /// Normalizes an array of rows. Anything other than an array yields nothing.
    #[instrument(skip(self, value), fields(creator_field = %self.mapping.creator))]
    pub fn normalize_batch(&self, value: &Value) -> Vec<ActivityRecord> {
        let Some(rows) = value.as_array() else {
            debug!("Input is not an array, nothing to normalize");
            return Vec::new();
        };

        let records: Vec<ActivityRecord> = rows.iter().filter_map(|row| self.normalize(row)).collect();

        let skipped = rows.len() - records.len();
        if skipped > 0 {
            debug!(skipped, "Skipped rows that were not objects");
        }
        debug!("Normalized {} activity records", records.len());
        records
    }
}

/// Trimmed, non-empty text. Numbers are rendered as text so numeric ids still group.
pub fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite number from a JSON number or numeric string.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Duration in seconds; anything unusable becomes 0.
///
/// Clock strings such as `"3:35"` or `"1:02:03"` are always read as
/// `[h:]m:s`, whatever the configured unit.
pub fn coerce_duration_seconds(value: Option<&Value>, unit: DurationUnit) -> f64 {
    let seconds = match value {
        Some(Value::String(s)) if s.contains(':') => parse_clock(s).unwrap_or(0.0),
        other => coerce_number(other).map_or(0.0, |amount| unit.to_seconds(amount)),
    };

    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Parses `m:s` or `h:m:s` into seconds.
pub fn parse_clock(raw: &str) -> Option<f64> {
    let parts: Vec<f64> = raw
        .trim()
        .split(':')
        .map(|part| part.trim().parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0))
        .collect::<Option<_>>()?;

    match parts.as_slice() {
        [m, s] => Some(m * 60.0 + s),
        [h, m, s] => Some(h * 3600.0 + m * 60.0 + s),
        _ => None,
    }
}

/// Wall-clock timestamp in `zone`, or `None` when unparseable.
pub fn coerce_timestamp(value: Option<&Value>, zone: ClockZone) -> Option<NaiveDateTime> {
    match value? {
        Value::Number(n) => from_epoch(n.as_f64()?, zone),
        Value::String(s) => parse_timestamp_str(s.trim(), zone),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str, zone: ClockZone) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(to_zone(dt.with_timezone(&Utc), zone));
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(to_zone(dt.with_timezone(&Utc), zone));
        }
    }

    // No offset: the string already is wall-clock time
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    // Bare digit strings are epochs; short ones like "2024" are not
    if raw.len() >= 9 && raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse::<f64>().ok().and_then(|n| from_epoch(n, zone));
    }
    None
}

fn from_epoch(value: f64, zone: ClockZone) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let millis = if value.abs() > EPOCH_MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    #[allow(clippy::cast_possible_truncation)]
    let dt = DateTime::from_timestamp_millis(millis.round() as i64)?;
    Some(to_zone(dt, zone))
}

fn to_zone(dt: DateTime<Utc>, zone: ClockZone) -> NaiveDateTime {
    match zone {
        ClockZone::Utc => dt.naive_utc(),
        ClockZone::Local => dt.with_timezone(&Local).naive_local(),
    }
}

/// Leading four-digit year of a release date (`"2019-03-01"`, `"2019"`, `2019`).
pub fn parse_release_year(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::String(s) => {
            let head = s.trim().get(..4)?;
            if head.bytes().all(|b| b.is_ascii_digit()) {
                head.parse().ok()
            } else {
                None
            }
        }
        Value::Number(n) => n
            .as_i64()
            .filter(|y| (1000..=9999).contains(y))
            .and_then(|y| i32::try_from(y).ok()),
        _ => None,
    }
}

fn collect_measures(row: &Map<String, Value>) -> BTreeMap<String, f64> {
    row.iter()
        .filter_map(|(key, value)| coerce_number(Some(value)).map(|n| (key.clone(), n)))
        .collect()
}
