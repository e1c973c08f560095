//! Half-open time intervals.
//!
//! A [`Range`] is `[start, start + duration)`: the start instant is inclusive
//! and the end instant is exclusive. Ranges are immutable values; every
//! algebra operation returns a new `Range`.
//!
//! A zero duration marks a point reference with no explicit end ("today",
//! "3pm"). Construction never fails: reversed instants and negative durations
//! collapse to zero duration instead of raising an error.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)`.
///
/// Equality is structural: two ranges are equal when their start instants
/// and durations are equal (the offset used to display the start does not
/// participate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RangeRepr", from = "RangeRepr")]
pub struct Range {
    start: DateTime<FixedOffset>,
    duration: Duration,
}

impl Range {
    /// Create a range from a start instant and a duration.
    ///
    /// Negative durations are clamped to zero, and durations reaching past the
    /// last representable instant are shortened to end there.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, Duration};
    /// use naturaltime::Range;
    ///
    /// let start = DateTime::parse_from_rfc3339("2023-01-15T14:00:00Z").unwrap();
    /// let r = Range::new(start, Duration::hours(2));
    /// assert_eq!(r.end().to_rfc3339(), "2023-01-15T16:00:00+00:00");
    /// assert!(Range::new(start, Duration::hours(-1)).is_all_day());
    /// ```
    pub fn new<Tz: TimeZone>(start: DateTime<Tz>, duration: Duration) -> Self {
        let start = start.fixed_offset();
        let duration = if duration < Duration::zero() {
            Duration::zero()
        } else if start.checked_add_signed(duration).is_none() {
            (latest_end() - start).max(Duration::zero())
        } else {
            duration
        };
        Range { start, duration }
    }

    /// Create a range spanning `start` to `end`.
    ///
    /// If `end` precedes `start` the result is a zero-duration range at `start`.
    pub fn from_times<Tz: TimeZone, Tz2: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz2>) -> Self {
        let start = start.fixed_offset();
        let end = end.fixed_offset();
        if end < start {
            return Range {
                start,
                duration: Duration::zero(),
            };
        }
        Range {
            duration: end - start,
            start,
        }
    }

    /// When the range begins (inclusive).
    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    /// When the range ends (exclusive), in the start's offset.
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.start + self.duration
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// True iff `start <= t < end`.
    pub fn contains<Tz: TimeZone>(&self, t: &DateTime<Tz>) -> bool {
        let t = t.fixed_offset();
        self.start <= t && t < self.end()
    }

    /// True iff `other` lies entirely within this range.
    pub fn contains_range(&self, other: &Range) -> bool {
        other.start >= self.start && other.end() <= self.end()
    }

    /// True iff the two ranges share any instant.
    ///
    /// Ranges that only touch (one ends exactly where the other starts) do not overlap.
    pub fn overlaps(&self, other: &Range) -> bool {
        let (end, other_end) = (self.end(), other.end());
        end >= other.start && self.start <= other_end && end != other.start && other_end != self.start
    }

    /// The overlapping part of two ranges.
    ///
    /// When the ranges do not overlap the result is a zero-duration range at
    /// the later of the two starts. Use [`Range::overlaps`] to tell that
    /// sentinel apart from an instantaneous overlap.
    pub fn intersection(&self, other: &Range) -> Range {
        let start = self.start.max(other.start);
        if !self.overlaps(other) {
            return Range {
                start,
                duration: Duration::zero(),
            };
        }
        let end = self.end().min(other.end());
        Range {
            duration: end - start,
            start,
        }
    }

    /// The smallest range containing both ranges.
    ///
    /// Only meaningful when the ranges overlap or are adjacent; that is not checked.
    pub fn union(&self, other: &Range) -> Range {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Range {
            duration: end - start,
            start,
        }
    }

    /// True iff the range has zero duration (a point or all-day reference).
    pub fn is_all_day(&self) -> bool {
        self.duration.is_zero()
    }
}

/// The latest end any range may have. One day short of chrono's maximum so the
/// end stays representable in every UTC offset.
fn latest_end() -> DateTime<FixedOffset> {
    (DateTime::<Utc>::MAX_UTC - Duration::days(1)).fixed_offset()
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end().to_rfc3339())
    }
}

// ── Interchange representation ──────────────────────────────────────────────

/// Wire shape: `{"start": RFC3339, "end": RFC3339}` with `end` omitted for points.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RangeRepr {
    start: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<DateTime<FixedOffset>>,
}

impl From<Range> for RangeRepr {
    fn from(range: Range) -> Self {
        RangeRepr {
            start: range.start,
            end: (!range.is_all_day()).then(|| range.end()),
        }
    }
}

impl From<RangeRepr> for Range {
    fn from(repr: RangeRepr) -> Self {
        match repr.end {
            Some(end) => Range::from_times(repr.start, end),
            None => Range::new(repr.start, Duration::zero()),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
