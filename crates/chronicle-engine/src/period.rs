//! Dense time-series bucketing.
//!
//! Every period between the requested bounds is emitted, including empty
//! ones, so a chart never has to fill gaps itself.

use crate::record::ActivityRecord;
use chrono::{Datelike, Months, NaiveDate};
use chronicle_common::{month_abbr, ChronicleError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Period size for time-series bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `YYYY`
    Yearly,
    /// `YYYY-MM`
    Monthly,
    /// `YYYY-MM-DD`
    Daily,
}

impl Granularity {
    /// Every granularity, coarsest first.
    pub const ALL: [Self; 3] = [Self::Yearly, Self::Monthly, Self::Daily];

    /// Name used by callers and in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Daily => "daily",
        }
    }

    /// First day of the period containing `date`.
    pub fn period_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
            Self::Monthly => date.with_day(1).unwrap_or(date),
            Self::Daily => date,
        }
    }

    /// Start of the period after the one starting at `period_start`.
    pub fn next_period(self, period_start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Yearly => period_start.checked_add_months(Months::new(12)),
            Self::Monthly => period_start.checked_add_months(Months::new(1)),
            Self::Daily => period_start.succ_opt(),
        }
    }

    /// Canonical key of the period containing `date`.
    pub fn period_key(self, date: NaiveDate) -> String {
        match self {
            Self::Yearly => format!("{:04}", date.year()),
            Self::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            Self::Daily => format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day()),
        }
    }

    /// Human label: `2024`, `Jan 2024` or `Jun 15, 2024`.
    pub fn display_label(self, date: NaiveDate) -> String {
        match self {
            Self::Yearly => date.year().to_string(),
            Self::Monthly => format!("{} {}", month_abbr(date.month()), date.year()),
            Self::Daily => format!("{} {}, {}", month_abbr(date.month()), date.day(), date.year()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ChronicleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yearly" | "year" => Ok(Self::Yearly),
            "monthly" | "month" => Ok(Self::Monthly),
            "daily" | "day" => Ok(Self::Daily),
            other => Err(ChronicleError::validation_field(
                format!("unknown granularity '{other}'"),
                "granularity",
            )),
        }
    }
}

/// Value summed into each bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// One per record.
    Count,
    /// Duration in minutes.
    Minutes,
    /// The record's metric value (popularity, pages).
    Metric,
    /// Any numeric source field by name, e.g. `page_split`.
    Field(String),
}

impl Measure {
    /// Contribution of one record.
    pub fn value_of(&self, record: &ActivityRecord) -> f64 {
        match self {
            Self::Count => 1.0,
            Self::Minutes => record.minutes(),
            Self::Metric => record.metric_value.unwrap_or(0.0),
            Self::Field(name) => record.measure(name),
        }
    }
}

impl FromStr for Measure {
    type Err = ChronicleError;

    /// Reserved names are case-insensitive; anything else names a source field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => Err(ChronicleError::validation_field("measure name is empty", "measure")),
            "count" | "plays" => Ok(Self::Count),
            "minutes" => Ok(Self::Minutes),
            "metric" => Ok(Self::Metric),
            _ => Ok(Self::Field(trimmed.to_string())),
        }
    }
}

/// One period of a dense time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBucket {
    /// Canonical period key.
    pub period: String,
    /// Label for axis ticks.
    pub display_label: String,
    /// Sum of the chosen measure.
    pub aggregate_value: f64,
    /// Number of records in the period, whatever the measure.
    pub record_count: u64,
}

impl PeriodBucket {
    /// Mean contribution per record, zero for an empty bucket.
    pub fn average(&self) -> f64 {
        if self.record_count == 0 {
            0.0
        } else {
            self.aggregate_value / self.record_count as f64
        }
    }
}

/// Start dates of every period touching `[start, end]`, in order.
pub fn period_universe(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    let mut periods = Vec::new();
    if start > end {
        return periods;
    }

    let mut cursor = Some(granularity.period_start(start));
    while let Some(period) = cursor.filter(|p| *p <= end) {
        periods.push(period);
        cursor = granularity.next_period(period);
    }
    periods
}

/// Buckets `records` into every period between `start` and `end` inclusive.
///
/// Records without a timestamp, or whose period falls outside the range,
/// are left out.
#[instrument(skip(records, measure), fields(records = records.len(), %granularity))]
pub fn bucketize(
    records: &[ActivityRecord],
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
    measure: &Measure,
) -> Vec<PeriodBucket> {
    let universe = period_universe(start, end, granularity);

    let mut index: HashMap<String, usize> = HashMap::with_capacity(universe.len());
    let mut buckets: Vec<PeriodBucket> = Vec::with_capacity(universe.len());
    for period in universe {
        let key = granularity.period_key(period);
        index.insert(key.clone(), buckets.len());
        buckets.push(PeriodBucket {
            period: key,
            display_label: granularity.display_label(period),
            aggregate_value: 0.0,
            record_count: 0,
        });
    }

    let mut placed = 0usize;
    for record in records {
        let Some(timestamp) = record.timestamp else {
            continue;
        };
        let key = granularity.period_key(timestamp.date());
        if let Some(&slot) = index.get(&key) {
            let bucket = &mut buckets[slot];
            bucket.aggregate_value += measure.value_of(record);
            bucket.record_count += 1;
            placed += 1;
        }
    }

    debug!("Placed {} records into {} periods", placed, buckets.len());
    buckets
}

/// [`bucketize`] with string-typed granularity and measure.
///
/// An unknown granularity or an empty measure name yields no buckets.
pub fn bucketize_named(
    records: &[ActivityRecord],
    start: NaiveDate,
    end: NaiveDate,
    granularity: &str,
    measure: &str,
) -> Vec<PeriodBucket> {
    let parsed = granularity
        .parse::<Granularity>()
        .and_then(|g| measure.parse::<Measure>().map(|m| (g, m)));

    match parsed {
        Ok((granularity, measure)) => bucketize(records, start, end, granularity, &measure),
        Err(e) => {
            debug!(error = %e, "Ignoring bucketing request");
            Vec::new()
        }
    }
}
