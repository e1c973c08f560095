//! Host interchange: RFC 3339 reference strings in, JSON ranges out.
//!
//! An embedding host passes the reference instant as an RFC 3339 string and
//! receives ranges as a JSON array of `{"start", "end"}` objects, with `end`
//! omitted for zero-duration ranges.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::error::{NaturalTimeError, Result};
use crate::parse::parse_multi;
use crate::range::Range;

/// Parse an RFC 3339 reference instant, keeping its offset.
///
/// # Errors
///
/// Returns [`NaturalTimeError::InvalidDatetime`] if the string cannot be parsed.
pub fn parse_reference(s: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| NaturalTimeError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Express `instant` in an IANA time zone, so that day arithmetic during
/// parsing follows that zone's DST rules.
///
/// # Errors
///
/// Returns [`NaturalTimeError::InvalidTimezone`] if the zone name is unknown.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Utc};
/// use naturaltime::{parse_date, reference_in_timezone};
///
/// let now = DateTime::parse_from_rfc3339("2026-03-07T17:00:00Z").unwrap().with_timezone(&Utc);
/// let reference = reference_in_timezone(now, "America/New_York").unwrap();
/// // DST starts overnight: noon tomorrow is UTC-4, not UTC-5
/// let tomorrow = parse_date("tomorrow", &reference).unwrap();
/// assert_eq!(tomorrow.fixed_offset().to_rfc3339(), "2026-03-08T12:00:00-04:00");
/// ```
pub fn reference_in_timezone(instant: DateTime<Utc>, timezone: &str) -> Result<DateTime<Tz>> {
    let tz = timezone
        .parse::<Tz>()
        .map_err(|_| NaturalTimeError::InvalidTimezone(format!("'{}'", timezone)))?;
    Ok(instant.with_timezone(&tz))
}

/// Serialize ranges parsed from `expression` as a JSON array.
pub fn encode_ranges(expression: &str, ranges: &[Range]) -> Result<String> {
    serde_json::to_string(ranges).map_err(|source| NaturalTimeError::Serialization {
        expression: expression.to_string(),
        source,
    })
}

/// Decode a JSON array of ranges produced for `expression`.
///
/// # Errors
///
/// Returns [`NaturalTimeError::Serialization`] naming `expression` when the
/// payload is not a valid range array.
pub fn decode_ranges(expression: &str, json: &str) -> Result<Vec<Range>> {
    serde_json::from_str(json).map_err(|source| NaturalTimeError::Serialization {
        expression: expression.to_string(),
        source,
    })
}

/// Full host round trip: parse `expression` against an RFC 3339 reference and
/// return every range as JSON.
///
/// Unrecognized phrases produce `"[]"`, not an error.
pub fn parse_multi_json(expression: &str, reference: &str) -> Result<String> {
    let reference = parse_reference(reference)?;
    let ranges = parse_multi(expression, &reference);
    encode_ranges(expression, &ranges)
}

// ── Tests ───────────────────────────────────────────────────────────────────
