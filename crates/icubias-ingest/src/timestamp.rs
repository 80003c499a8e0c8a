//! Timestamp parsing for measurement rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use icubias_model::Timestamp;

/// Parses a measurement timestamp.
///
/// Accepts ISO 8601-like date-times (with `T` or space separator, optional
/// fractional seconds), date-only values (midnight), and numeric values,
/// which are read as seconds since the Unix epoch.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(seconds) = trimmed.parse::<f64>() {
        return from_epoch_seconds(seconds);
    }
    try_parse_datetime(trimmed).or_else(|| {
        try_parse_date(trimmed).and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

fn from_epoch_seconds(seconds: f64) -> Option<Timestamp> {
    if !seconds.is_finite() {
        return None;
    }
    let millis = (seconds * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

/// Try to parse full datetime formats.
fn try_parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // With fractional seconds
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
    ];

    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            // Offsets are normalised to UTC.
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Try to parse date-only formats.
fn try_parse_date(value: &str) -> Option<NaiveDate> {
    // No compact `%Y%m%d`: all-digit values are epoch seconds.
    let formats = ["%Y-%m-%d", "%Y/%m/%d"];
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}
