//! Day-of-week by time-of-day activity matrix.

use crate::record::ActivityRecord;
use chrono::{Datelike, Timelike};
use chronicle_common::TimeBracket;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

/// Row labels, Sunday first.
pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Minutes of activity per weekday and time bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    /// `matrix[day][bracket]`, day 0 is Sunday.
    pub matrix: Vec<Vec<f64>>,
    /// Largest cell, zero when nothing was binned.
    pub max_value: f64,
    /// Column labels, one per bracket.
    pub bracket_labels: Vec<String>,
}

impl Heatmap {
    fn empty(brackets: &[TimeBracket]) -> Self {
        Self {
            matrix: vec![vec![0.0; brackets.len()]; DAY_LABELS.len()],
            max_value: 0.0,
            bracket_labels: brackets.iter().map(|b| b.label.clone()).collect(),
        }
    }

    /// Row labels for renderers.
    pub const fn day_labels(&self) -> [&'static str; 7] {
        DAY_LABELS
    }

    /// Raw cell value; out-of-range coordinates read as zero.
    pub fn cell(&self, day: usize, bracket: usize) -> f64 {
        self.matrix
            .get(day)
            .and_then(|row| row.get(bracket))
            .copied()
            .unwrap_or(0.0)
    }

    /// Cell value relative to the busiest cell, in `[0, 1]`.
    pub fn intensity(&self, day: usize, bracket: usize) -> f64 {
        if self.max_value <= 0.0 {
            return 0.0;
        }
        self.cell(day, bracket) / self.max_value
    }

    /// Sum over every cell.
    pub fn total(&self) -> f64 {
        self.matrix.iter().flatten().sum()
    }
}

/// Bins the minutes of each dated record into its weekday and bracket.
///
/// With `filter_key` set, only records whose creator equals it are binned.
/// Records whose hour fits no bracket are dropped.
#[instrument(skip(records, brackets), fields(records = records.len(), brackets = brackets.len()))]
pub fn bin_activity(records: &[ActivityRecord], brackets: &[TimeBracket], filter_key: Option<&str>) -> Heatmap {
    let mut heatmap = Heatmap::empty(brackets);
    let mut binned = 0usize;

    let selected = records
        .iter()
        .filter(|record| filter_key.map_or(true, |key| record.has_creator(key)));

    for record in selected {
        let Some(timestamp) = record.timestamp else {
            continue;
        };

        let hour = timestamp.hour();
        let Some(column) = brackets.iter().position(|b| b.contains(hour)) else {
            trace!(hour, "No bracket covers hour, dropping record");
            continue;
        };

        let day = timestamp.weekday().num_days_from_sunday() as usize;
        heatmap.matrix[day][column] += record.minutes();
        binned += 1;
    }

    heatmap.max_value = heatmap.matrix.iter().flatten().copied().fold(0.0, f64::max);

    debug!("Binned {} records, max cell {:.1} minutes", binned, heatmap.max_value);
    heatmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn play(artist: &str, y: i32, m: u32, d: u32, hour: u32, minutes: f64) -> ActivityRecord {
        ActivityRecord {
            creator: Some(artist.to_string()),
            timestamp: NaiveDate::from_ymd_opt(y, m, d).and_then(|date| date.and_hms_opt(hour, 30, 0)),
            duration_seconds: minutes * 60.0,
            ..ActivityRecord::default()
        }
    }

    #[test]
    fn test_sunday_is_row_zero() {
        // 2024-06-16 is a Sunday
        let heatmap = bin_activity(&[play("A", 2024, 6, 16, 9, 3.0)], &TimeBracket::default_brackets(), None);
        assert_eq!(heatmap.cell(0, 1), 3.0);
        assert_eq!(heatmap.max_value, 3.0);
        assert_eq!(heatmap.intensity(0, 1), 1.0);
    }

    #[test]
    fn test_empty_input_has_zero_intensity() {
        let heatmap = bin_activity(&[], &TimeBracket::default_brackets(), None);
        assert_eq!(heatmap.matrix.len(), 7);
        assert!(heatmap.matrix.iter().all(|row| row.len() == 4));
        assert_eq!(heatmap.max_value, 0.0);
        assert_eq!(heatmap.intensity(3, 2), 0.0);
    }

    #[test]
    fn test_filter_key_restricts_creator() {
        let records = vec![play("A", 2024, 6, 17, 20, 4.0), play("B", 2024, 6, 17, 20, 6.0)];
        let heatmap = bin_activity(&records, &TimeBracket::default_brackets(), Some("A"));
        assert_eq!(heatmap.total(), 4.0);
    }

    #[test]
    fn test_uncovered_hours_are_dropped() {
        let brackets = vec![TimeBracket::new("DAY", 8, 19)];
        let records = vec![play("A", 2024, 6, 17, 3, 5.0), play("A", 2024, 6, 17, 12, 2.0)];
        let heatmap = bin_activity(&records, &brackets, None);
        assert_eq!(heatmap.total(), 2.0);
        assert_eq!(heatmap.bracket_labels, vec!["DAY"]);
    }

    #[test]
    fn test_undated_records_are_skipped() {
        let mut undated = play("A", 2024, 6, 17, 12, 5.0);
        undated.timestamp = None;
        let heatmap = bin_activity(&[undated], &TimeBracket::default_brackets(), None);
        assert_eq!(heatmap.total(), 0.0);
    }

    #[test]
    fn test_out_of_range_cells_read_zero() {
        let heatmap = bin_activity(&[play("A", 2024, 6, 17, 12, 5.0)], &TimeBracket::default_brackets(), None);
        assert_eq!(heatmap.cell(7, 0), 0.0);
        assert_eq!(heatmap.intensity(0, 9), 0.0);
        assert_eq!(heatmap.day_labels()[6], "Sat");
    }
}
