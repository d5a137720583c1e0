//! Field parsing helpers for incident rows.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Naive timestamp layouts seen in incident exports, most common first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Layouts that carry a trailing UTC offset (e.g. `+00`, `+00:00`).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Parses an occurrence timestamp.
///
/// Timestamps with an offset keep their local wall-clock time and drop the
/// offset. A bare date parses as midnight.
#[must_use]
pub fn parse_occurred_on(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.naive_local());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses an integer field. Whole-valued decimals such as `"9.0"` are
/// accepted since spreadsheet round-trips commonly produce them.
#[must_use]
pub fn parse_int(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(value) = s.parse::<i32>() {
        return Some(value);
    }

    let value = s.parse::<f64>().ok()?;
    #[allow(clippy::cast_possible_truncation)]
    let truncated = value as i32;
    (value.fract() == 0.0 && f64::from(truncated) == value).then_some(truncated)
}

/// Parses a coordinate. Returns `None` if missing or unparseable.
#[must_use]
pub fn parse_coordinate(s: Option<&str>) -> Option<f64> {
    s?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses the shooting flag. The export uses `Y` for yes and leaves the
/// field blank otherwise; newer exports use `1`/`0`.
#[must_use]
pub fn parse_flag(s: Option<&str>) -> bool {
    matches!(
        s.map(str::trim),
        Some("Y" | "y" | "1" | "true" | "TRUE" | "True")
    )
}
