//! Shared utility functions.

use chrono::NaiveDate;

/// Returns `true` when `value` is missing, blank, or equal to `sentinel`.
///
/// Sentinels are compared case-insensitively after trimming, so
/// `" unknown artist "` is treated the same as `"Unknown Artist"`.
pub fn is_placeholder(value: Option<&str>, sentinel: &str) -> bool {
    match value.map(str::trim) {
        None | Some("") => true,
        Some(v) => v.eq_ignore_ascii_case(sentinel),
    }
}

/// Replaces NaN and infinities with zero.
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Converts seconds to minutes without letting non-finite values through.
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    finite_or_zero(seconds / 60.0)
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Three-letter English month abbreviation for `month` in 1-12.
pub const fn month_abbr(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}
