//! Caller-facing parse operations.
//!
//! All three operations share one pipeline: tokenize, recognize expressions,
//! resolve each against the reference instant, then assemble ranges. They
//! differ only in how they read the candidate list.

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::assemble::{assemble_ranges, first_instant};
use crate::error::{NaturalTimeError, Result};
use crate::range::Range;
use crate::resolve::{resolve, Candidate, ResolveOptions};
use crate::rules::recognize;
use crate::token::tokenize;

/// Resolve every expression in `expression`, in order of appearance.
fn candidates<Tz: TimeZone>(
    expression: &str,
    reference: &DateTime<Tz>,
    options: &ResolveOptions,
) -> Vec<Candidate<Tz>> {
    let exprs = recognize(&tokenize(expression));
    if exprs.is_empty() {
        debug!(expression, "no temporal anchors recognized");
        return Vec::new();
    }

    exprs
        .iter()
        .filter_map(|expr| {
            let candidate = resolve(expr, reference, options);
            if candidate.is_none() {
                debug!(expression, ?expr, "expression does not resolve to a valid instant");
            }
            candidate
        })
        .collect()
}

/// Parse a phrase to a single instant.
///
/// # Arguments
///
/// * `expression` — Free text such as `"tomorrow"`, `"next Monday"` or `"3pm"`
/// * `reference` — The instant relative expressions resolve against
///
/// # Returns
///
/// The start of the first expression found, in the reference's time zone, or
/// `None` when nothing in the phrase is recognized. A range whose end cannot
/// be bound ("from 3pm") still yields its start.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use naturaltime::parse_date;
///
/// // Sunday
/// let reference = DateTime::parse_from_rfc3339("2023-01-15T12:00:00Z").unwrap();
/// let monday = parse_date("next Monday", &reference).unwrap();
/// assert_eq!(monday.to_rfc3339(), "2023-01-16T12:00:00+00:00");
/// assert!(parse_date("invalid date expression", &reference).is_none());
/// ```
pub fn parse_date<Tz: TimeZone>(expression: &str, reference: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    parse_date_with_options(expression, reference, &ResolveOptions::default())
}

/// Like [`parse_date`], with explicit [`ResolveOptions`].
pub fn parse_date_with_options<Tz: TimeZone>(
    expression: &str,
    reference: &DateTime<Tz>,
    options: &ResolveOptions,
) -> Option<DateTime<Tz>> {
    first_instant(candidates(expression, reference, options))
}

/// Parse a phrase that must describe exactly one range.
///
/// A phrase without an explicit end ("today") yields a zero-duration range.
///
/// # Errors
///
/// Returns [`NaturalTimeError::Ambiguous`] when the phrase produces no range
/// or more than one distinct range.
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Duration};
/// use naturaltime::parse_range;
///
/// let reference = DateTime::parse_from_rfc3339("2023-01-15T12:00:00Z").unwrap();
/// let range = parse_range("tomorrow 9am-5pm", &reference).unwrap();
/// assert_eq!(range.start().to_rfc3339(), "2023-01-16T09:00:00+00:00");
/// assert_eq!(range.duration(), Duration::hours(8));
/// ```
pub fn parse_range<Tz: TimeZone>(expression: &str, reference: &DateTime<Tz>) -> Result<Range> {
    parse_range_with_options(expression, reference, &ResolveOptions::default())
}

/// Like [`parse_range`], with explicit [`ResolveOptions`].
pub fn parse_range_with_options<Tz: TimeZone>(
    expression: &str,
    reference: &DateTime<Tz>,
    options: &ResolveOptions,
) -> Result<Range> {
    let ranges = parse_multi_with_options(expression, reference, options);
    match ranges.as_slice() {
        [range] => Ok(*range),
        _ => Err(NaturalTimeError::Ambiguous {
            expression: expression.to_string(),
            count: ranges.len(),
        }),
    }
}

/// Parse a phrase into every range it describes.
///
/// Returns an empty vector when nothing is recognized. Expressions whose range
/// form fails (dangling connector, rejected end) are left out.
pub fn parse_multi<Tz: TimeZone>(expression: &str, reference: &DateTime<Tz>) -> Vec<Range> {
    parse_multi_with_options(expression, reference, &ResolveOptions::default())
}

/// Like [`parse_multi`], with explicit [`ResolveOptions`].
pub fn parse_multi_with_options<Tz: TimeZone>(
    expression: &str,
    reference: &DateTime<Tz>,
    options: &ResolveOptions,
) -> Vec<Range> {
    assemble_ranges(&candidates(expression, reference, options))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::CrossMidnight;
    use chrono::{Duration, FixedOffset};

    fn reference() -> DateTime<FixedOffset> {
        // Sunday, January 15, 2023, 12:00:00 UTC
        DateTime::parse_from_rfc3339("2023-01-15T12:00:00Z").unwrap()
    }

    fn rfc(expression: &str) -> String {
        parse_date(expression, &reference()).unwrap().to_rfc3339()
    }

    #[test]
    fn test_parse_date_points() {
        assert_eq!(rfc("today"), "2023-01-15T12:00:00+00:00");
        assert_eq!(rfc("now"), "2023-01-15T12:00:00+00:00");
        assert_eq!(rfc("3pm"), "2023-01-15T15:00:00+00:00");
        assert_eq!(rfc("January 20"), "2023-01-20T12:00:00+00:00");
    }

    #[test]
    fn test_parse_date_takes_start_of_range() {
        assert_eq!(rfc("tomorrow 9am-5pm"), "2023-01-16T09:00:00+00:00");
    }

    #[test]
    fn test_parse_date_survives_dangling_connector() {
        assert_eq!(rfc("from 3pm"), "2023-01-15T15:00:00+00:00");
        assert!(parse_multi("from 3pm", &reference()).is_empty());
    }

    #[test]
    fn test_parse_date_unrecognized() {
        assert!(parse_date("invalid date expression", &reference()).is_none());
        assert!(parse_date("", &reference()).is_none());
    }

    #[test]
    fn test_stray_am_word_is_ignored() {
        assert_eq!(rfc("I am free at 3pm"), "2023-01-15T15:00:00+00:00");
        assert!(parse_multi("I am free at 3", &reference()).is_empty());
    }

    #[test]
    fn test_parse_date_invalid_calendar_date() {
        assert!(parse_date("February 30", &reference()).is_none());
    }

    #[test]
    fn test_parse_range_point_has_zero_duration() {
        let range = parse_range("today", &reference()).unwrap();
        assert!(range.is_all_day());
        assert_eq!(range.start(), reference());
    }

    #[test]
    fn test_parse_range_rejects_multiple() {
        let err = parse_range("tomorrow 3pm or friday 10am", &reference()).unwrap_err();
        assert!(matches!(err, NaturalTimeError::Ambiguous { count: 2, .. }));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn test_parse_range_rejects_none() {
        let err = parse_range("lorem ipsum", &reference()).unwrap_err();
        assert!(matches!(err, NaturalTimeError::Ambiguous { count: 0, .. }));
    }

    #[test]
    fn test_parse_range_collapses_duplicates() {
        let range = parse_range("tomorrow, tomorrow", &reference()).unwrap();
        assert_eq!(range.start().to_rfc3339(), "2023-01-16T12:00:00+00:00");
    }

    #[test]
    fn test_parse_multi_in_order() {
        let ranges = parse_multi("friday 10am or tomorrow 3pm", &reference());
        let starts: Vec<String> = ranges.iter().map(|r| r.start().to_rfc3339()).collect();
        assert_eq!(
            starts,
            vec!["2023-01-20T10:00:00+00:00", "2023-01-16T15:00:00+00:00"]
        );
    }

    #[test]
    fn test_parse_range_with_reject_option() {
        let options = ResolveOptions {
            cross_midnight: CrossMidnight::Reject,
            ..ResolveOptions::default()
        };
        assert!(parse_range_with_options("11pm to 1am", &reference(), &options).is_err());
        let range = parse_range("11pm to 1am", &reference()).unwrap();
        assert_eq!(range.duration(), Duration::hours(2));
    }

    #[test]
    fn test_parse_date_with_forward_date() {
        let options = ResolveOptions {
            forward_date: true,
            ..ResolveOptions::default()
        };
        let date = parse_date_with_options("jan 2", &reference(), &options).unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-02T12:00:00+00:00");
    }
}
