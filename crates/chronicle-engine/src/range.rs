//! Mapping between slider positions and calendar dates, and the selection
//! those positions drive.

use crate::record::ActivityRecord;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use chronicle_common::format_iso_date;
use serde::{Deserialize, Serialize};

/// Lowest slider position.
pub const MIN_POSITION: f64 = 0.0;
/// Highest slider position.
pub const MAX_POSITION: f64 = 100.0;

/// Linear map from `[0, 100]` onto `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeMapper {
    min: NaiveDateTime,
    max: NaiveDateTime,
}

impl RangeMapper {
    /// Creates a mapper; the bounds may be given in either order.
    pub fn new(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    /// Bounds spanning the earliest and latest record timestamps.
    pub fn from_records(records: &[ActivityRecord]) -> Option<Self> {
        let mut stamps = records.iter().filter_map(|r| r.timestamp);
        let first = stamps.next()?;
        let (min, max) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));
        Some(Self { min, max })
    }

    /// Lower bound.
    pub const fn min(&self) -> NaiveDateTime {
        self.min
    }

    /// Upper bound.
    pub const fn max(&self) -> NaiveDateTime {
        self.max
    }

    fn span_millis(&self) -> i64 {
        (self.max - self.min).num_milliseconds()
    }

    /// Date at `position`. Non-finite positions count as 0; others are clamped.
    pub fn position_to_date(&self, position: f64) -> NaiveDateTime {
        let position = clamp_position(position);
        let offset = (self.span_millis() as f64 * position / MAX_POSITION).round() as i64;
        self.min + Duration::milliseconds(offset)
    }

    /// Position of `date`, clamped to `[0, 100]`; 0 when the bounds coincide.
    pub fn date_to_position(&self, date: NaiveDateTime) -> f64 {
        let span = self.span_millis();
        if span <= 0 {
            return MIN_POSITION;
        }
        let offset = (date - self.min).num_milliseconds() as f64;
        clamp_position(offset / span as f64 * MAX_POSITION)
    }
}

fn clamp_position(position: f64) -> f64 {
    if position.is_finite() {
        position.clamp(MIN_POSITION, MAX_POSITION)
    } else {
        MIN_POSITION
    }
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range.
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Records dated inside the range; undated records are dropped.
    pub fn filter_records(&self, records: &[ActivityRecord]) -> Vec<ActivityRecord> {
        records
            .iter()
            .filter(|r| r.timestamp.is_some_and(|t| self.contains(t.date())))
            .cloned()
            .collect()
    }
}

/// Selection change as delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeChange {
    /// `YYYY-MM-DD`
    pub start_date: String,
    /// `YYYY-MM-DD`
    pub end_date: String,
}

impl From<DateRange> for RangeChange {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: format_iso_date(range.start),
            end_date: format_iso_date(range.end),
        }
    }
}

/// One of the two slider handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    /// Lower handle.
    Start,
    /// Upper handle.
    End,
}

/// Current `{start, end}` inside the mapper bounds, always with `start < end`
/// once either handle has moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSelection {
    mapper: RangeMapper,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl RangeSelection {
    /// Selects the whole mapper range.
    pub const fn new(mapper: RangeMapper) -> Self {
        Self {
            start: mapper.min,
            end: mapper.max,
            mapper,
        }
    }

    /// Mapper backing this selection.
    pub const fn mapper(&self) -> &RangeMapper {
        &self.mapper
    }

    /// Lower bound of the selection.
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Upper bound of the selection.
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Handle position on the slider.
    pub fn position(&self, handle: Handle) -> f64 {
        match handle {
            Handle::Start => self.mapper.date_to_position(self.start),
            Handle::End => self.mapper.date_to_position(self.end),
        }
    }

    /// Selection as calendar dates.
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start.date(), self.end.date())
    }

    /// Selection in wire form.
    pub fn change(&self) -> RangeChange {
        self.date_range().into()
    }

    /// Moves `handle` to `date` if ordering stays strict. Returns whether it moved.
    ///
    /// Moving a handle onto its current date is not a move.
    pub fn set(&mut self, handle: Handle, date: NaiveDateTime) -> bool {
        match handle {
            Handle::Start if date < self.end && date != self.start => {
                self.start = date;
                true
            }
            Handle::End if date > self.start && date != self.end => {
                self.end = date;
                true
            }
            _ => false,
        }
    }

    /// Moves `handle` to the date at `position`.
    pub fn move_handle(&mut self, handle: Handle, position: f64) -> bool {
        let date = self.mapper.position_to_date(position);
        self.set(handle, date)
    }

    /// Handle closer in time to `date`; ties go to the start handle.
    pub fn nearest_handle(&self, date: NaiveDateTime) -> Handle {
        let to_start = (date - self.start).abs();
        let to_end = (date - self.end).abs();
        if to_start <= to_end {
            Handle::Start
        } else {
            Handle::End
        }
    }

    /// Track click: moves the nearest handle to the clicked position.
    ///
    /// Returns the handle that moved, or `None` when the move was rejected.
    pub fn click_track(&mut self, position: f64) -> Option<Handle> {
        let date = self.mapper.position_to_date(position);
        let handle = self.nearest_handle(date);
        self.set(handle, date).then_some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn year_2024() -> RangeMapper {
        RangeMapper::new(at(2024, 1, 1), at(2024, 12, 31))
    }

    #[test]
    fn test_endpoints_map_to_bounds() {
        let mapper = year_2024();
        assert_eq!(mapper.position_to_date(0.0), at(2024, 1, 1));
        assert_eq!(mapper.position_to_date(100.0), at(2024, 12, 31));
        assert_eq!(mapper.date_to_position(at(2024, 12, 31)), 100.0);
    }

    #[test]
    fn test_degenerate_span() {
        let mapper = RangeMapper::new(at(2024, 5, 5), at(2024, 5, 5));
        assert_eq!(mapper.date_to_position(at(2024, 5, 5)), 0.0);
        assert_eq!(mapper.position_to_date(70.0), at(2024, 5, 5));
    }

    #[test]
    fn test_bad_positions() {
        let mapper = year_2024();
        assert_eq!(mapper.position_to_date(f64::NAN), at(2024, 1, 1));
        assert_eq!(mapper.position_to_date(f64::INFINITY), at(2024, 1, 1));
        assert_eq!(mapper.position_to_date(-5.0), at(2024, 1, 1));
        assert_eq!(mapper.position_to_date(250.0), at(2024, 12, 31));
    }

    #[test]
    fn test_bounds_are_ordered() {
        let mapper = RangeMapper::new(at(2024, 12, 31), at(2024, 1, 1));
        assert_eq!(mapper.min(), at(2024, 1, 1));
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            ActivityRecord {
                timestamp: Some(at(2024, 3, 1)),
                ..ActivityRecord::default()
            },
            ActivityRecord::default(),
            ActivityRecord {
                timestamp: Some(at(2023, 11, 20)),
                ..ActivityRecord::default()
            },
        ];
        let mapper = RangeMapper::from_records(&records).unwrap();
        assert_eq!(mapper.min(), at(2023, 11, 20));
        assert_eq!(mapper.max(), at(2024, 3, 1));
        assert!(RangeMapper::from_records(&[ActivityRecord::default()]).is_none());
    }

    #[test]
    fn test_start_cannot_cross_end() {
        let mut selection = RangeSelection::new(year_2024());
        assert!(selection.move_handle(Handle::End, 50.0));
        let before = selection.clone();

        assert!(!selection.move_handle(Handle::Start, 50.0));
        assert!(!selection.move_handle(Handle::Start, 80.0));
        assert_eq!(selection, before);

        assert!(!selection.move_handle(Handle::End, 0.0));
        assert_eq!(selection, before);
    }

    #[test]
    fn test_click_moves_nearest_handle() {
        let mut selection = RangeSelection::new(year_2024());
        assert_eq!(selection.click_track(20.0), Some(Handle::Start));
        assert_eq!(selection.click_track(90.0), Some(Handle::End));
        assert!(selection.position(Handle::Start) > 19.9);
        assert!(selection.position(Handle::End) < 90.1);
    }

    #[test]
    fn test_click_on_handle_moves_nothing() {
        let mut selection = RangeSelection::new(year_2024());
        let before = selection.clone();
        assert_eq!(selection.click_track(0.0), None);
        assert_eq!(selection.click_track(100.0), None);
        assert_eq!(selection, before);
    }

    #[test]
    fn test_click_tie_goes_to_start() {
        let mut selection = RangeSelection::new(RangeMapper::new(at(2024, 1, 1), at(2024, 1, 3)));
        assert_eq!(selection.click_track(50.0), Some(Handle::Start));
        assert_eq!(selection.start(), at(2024, 1, 2));
    }

    #[test]
    fn test_change_is_iso_dates() {
        let selection = RangeSelection::new(year_2024());
        let json = serde_json::to_value(selection.change()).unwrap();
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["endDate"], "2024-12-31");
    }

    #[test]
    fn test_filter_records_is_inclusive() {
        let records: Vec<ActivityRecord> = [at(2024, 1, 1), at(2024, 1, 15), at(2024, 2, 1)]
            .into_iter()
            .map(|t| ActivityRecord {
                timestamp: Some(t),
                ..ActivityRecord::default()
            })
            .collect();
        let range = DateRange::new(at(2024, 1, 1).date(), at(2024, 1, 15).date());
        assert_eq!(range.filter_records(&records).len(), 2);
    }
}
