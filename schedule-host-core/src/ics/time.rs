//! Timestamp parsing and iCalendar date-time formatting.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::DEFAULT_TIME_ZONE;
use crate::error::{HostError, HostResult};

/// Offset-less layouts accepted in schedule documents.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Format `timestamp` as a `FIELD` content line.
///
/// `UTC` yields `FIELD:YYYYMMDDTHHMMSSZ`; any other zone yields
/// `FIELD;TZID=<zone>:YYYYMMDDTHHMMSS` in that zone's wall-clock time.
/// A missing zone means the organizational default.
pub fn format_ical_time(field: &str, timestamp: &str, zone: Option<&str>) -> HostResult<String> {
    let instant = parse_timestamp(timestamp)?;
    let zone_name = zone.filter(|z| !z.is_empty()).unwrap_or(DEFAULT_TIME_ZONE);

    if zone_name == "UTC" {
        return Ok(format!("{}:{}", field, instant.format("%Y%m%dT%H%M%SZ")));
    }

    let tz = resolve_zone(zone_name)?;
    Ok(format!(
        "{};TZID={}:{}",
        field,
        tz.name(),
        instant.with_timezone(&tz).format("%Y%m%dT%H%M%S")
    ))
}

/// Calendar date (`YYYY-MM-DD`) of `timestamp` as seen in `zone`.
pub fn local_date(timestamp: &str, zone: Option<&str>) -> HostResult<String> {
    let instant = parse_timestamp(timestamp)?;
    let tz = resolve_zone(zone.filter(|z| !z.is_empty()).unwrap_or(DEFAULT_TIME_ZONE))?;

    Ok(instant.with_timezone(&tz).format("%Y-%m-%d").to_string())
}

/// Look up an IANA zone identifier.
pub fn resolve_zone(name: &str) -> HostResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| HostError::Format(format!("Unknown time zone '{name}'")))
}

/// Parse an ISO-8601 style timestamp into an instant.
///
/// Timestamps carrying an offset (`Z`, `+09:00`, `+0900`) are taken as-is;
/// timestamps without one are read as wall-clock time in the default zone.
pub fn parse_timestamp(timestamp: &str) -> HostResult<DateTime<Utc>> {
    let s = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| HostError::Format(format!("Malformed timestamp '{timestamp}'")))?;

    let tz = resolve_zone(DEFAULT_TIME_ZONE)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| HostError::Format(format!("Nonexistent local time '{timestamp}'")))
}
