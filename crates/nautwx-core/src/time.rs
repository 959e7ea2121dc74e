// SPDX-License-Identifier: MIT
// Copyright (c) 2026 nautwx contributors

use chrono::{DateTime, Duration, DurationRound, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Offset-carrying layouts tried after RFC 3339 and RFC 2822. `%#z` also
/// takes hour-only offsets such as `+00`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Layouts without an offset; these are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d %b %Y %H:%M:%S%.f",
    "%d %b %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y"];

/// Drops a trailing `Z`, `UTC` or `GMT` zone marker, any case.
fn strip_utc_marker(s: &str) -> &str {
    for marker in ["UTC", "GMT", "Z"] {
        let Some(split) = s.len().checked_sub(marker.len()) else {
            continue;
        };
        if let (Some(head), Some(tail)) = (s.get(..split), s.get(split..)) {
            if tail.eq_ignore_ascii_case(marker) {
                return head.trim_end();
            }
        }
    }
    s
}

/// Parses a date/time in any of the common layouts and normalizes it to UTC.
///
/// Values without an offset are taken as UTC. A bare date means midnight.
/// Day/month-first numeric layouts (`20/09/2025`) are not accepted since they
/// are ambiguous; month names (`20 Sep 2025`) are.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let s = strip_utc_marker(s);
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// ISO 8601 with an explicit `+00:00` offset, e.g. `2025-09-20T06:00:00+00:00`.
pub fn to_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Truncates an instant to the top of its hour.
pub fn floor_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .duration_trunc(Duration::hours(1))
        .unwrap_or(instant)
}

/// Inclusive request window handed to the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// One hour either side of the hour containing `instant`.
    pub fn around(instant: DateTime<Utc>) -> Self {
        let target = floor_hour(instant);
        Self {
            start: target - Duration::hours(1),
            end: target + Duration::hours(1),
        }
    }
}
