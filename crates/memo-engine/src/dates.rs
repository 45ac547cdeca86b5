//! Calendar date parsing for content fields.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse an ISO 8601 date or date-time into a UTC instant.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM`, `YYYY-MM-DDTHH:MM:SS[.fff]` (taken as
/// UTC) and RFC 3339 with an offset. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|d| Utc.from_utc_datetime(&d));
    }

    // Year-month, as used for resume start dates
    NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| Utc.from_utc_datetime(&d))
}

/// Calendar year as written, keeping any UTC offset in the value.
///
/// `2024-01-01T00:30:00+02:00` is 2024 here even though the instant falls
/// in 2023 in UTC.
pub fn calendar_year(raw: &str) -> Option<i32> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => Some(dt.year()),
        Err(_) => parse_date(raw).map(|d| d.year()),
    }
}
