//! Anchor resolution against a reference instant.
//!
//! Date anchors resolve first to a calendar date; clock anchors then overlay
//! the time of day. A point without a clock keeps the reference's time of day,
//! and a point without a date uses the reference's date. All arithmetic is
//! wall-clock arithmetic in the reference's own time zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::rules::{DateAnchor, Direction, Expression, Point};

// ── Options ─────────────────────────────────────────────────────────────────

/// Which day begins a week for "this <weekday>".
///
/// Does **not** affect "next Monday" or "last Friday", which are always
/// relative to the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeekStartDay {
    /// ISO 8601 standard (Monday = day 0 of the week).
    #[default]
    Monday,
    /// US/Canada convention (Sunday = day 0 of the week).
    Sunday,
}

/// What to do when a range's end lands at or before its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossMidnight {
    /// An end that borrowed the start's date moves to the following day
    /// ("11pm to 1am" lasts two hours). An end with its own date that still
    /// precedes the start fails.
    #[default]
    RollOver,
    /// Any reversed end fails the range form of the expression.
    Reject,
}

/// Options for the `*_with_options` parse functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Which day starts the week for "this <weekday>".
    pub week_start: WeekStartDay,
    /// Handling of ranges whose end precedes their start.
    pub cross_midnight: CrossMidnight,
    /// Move year-less calendar dates that already passed into the next year.
    ///
    /// Off by default: "January 20" always means January 20 of the reference year.
    pub forward_date: bool,
}

// ── Candidates ──────────────────────────────────────────────────────────────

/// One resolved expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Candidate<Tz: TimeZone> {
    /// A single instant with no explicit end.
    Point(DateTime<Tz>),
    Span {
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    },
    /// The start resolved but the range form failed (dangling connector or
    /// rejected end). Usable as a single date only.
    Broken(DateTime<Tz>),
}

impl<Tz: TimeZone> Candidate<Tz> {
    pub(crate) fn into_start(self) -> DateTime<Tz> {
        match self {
            Candidate::Point(start) | Candidate::Span { start, .. } | Candidate::Broken(start) => {
                start
            }
        }
    }
}

/// Resolve one expression. Returns `None` when the start cannot be placed on
/// the calendar (invalid date such as "February 30", or a DST gap).
pub(crate) fn resolve<Tz: TimeZone>(
    expr: &Expression,
    reference: &DateTime<Tz>,
    options: &ResolveOptions,
) -> Option<Candidate<Tz>> {
    let tz = reference.timezone();
    let local = reference.naive_local();
    let today = local.date();

    // "2pm-4pm tomorrow": a date trailing the end applies to a dateless start.
    let shared = expr
        .end
        .filter(|end| end.trailing_date && expr.start.date.is_none())
        .and_then(|end| end.date);
    let start_date = match expr.start.date.or(shared) {
        Some(anchor) => resolve_date(anchor, today, options)?,
        None => today,
    };
    let start = at_local(&tz, start_date, &expr.start, &local)?;

    if expr.dangling {
        debug!(start = %start.naive_local(), "range form dropped: dangling connector");
        return Some(Candidate::Broken(start));
    }
    let Some(end_point) = &expr.end else {
        return Some(Candidate::Point(start));
    };

    let (end_date, inherited) = match end_point.date {
        Some(anchor) => (resolve_date(anchor, today, options)?, false),
        None => (start_date, true),
    };
    let mut end = at_local(&tz, end_date, end_point, &local)?;

    if end <= start {
        match options.cross_midnight {
            CrossMidnight::RollOver if inherited => {
                end = at_local(&tz, end_date.succ_opt()?, end_point, &local)?;
            }
            policy => {
                debug!(
                    start = %start.naive_local(),
                    end = %end.naive_local(),
                    ?policy,
                    "range form dropped: end precedes start"
                );
                return Some(Candidate::Broken(start));
            }
        }
    }

    Some(Candidate::Span { start, end })
}

/// Place a point on `date`, taking its clock or the reference time of day.
fn at_local<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    point: &Point,
    reference: &NaiveDateTime,
) -> Option<DateTime<Tz>> {
    let time = match point.clock {
        Some(clock) => clock.time()?,
        None => reference.time(),
    };
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

fn resolve_date(anchor: DateAnchor, today: NaiveDate, options: &ResolveOptions) -> Option<NaiveDate> {
    match anchor {
        DateAnchor::DayOffset(days) => today.checked_add_signed(Duration::days(days)),
        DateAnchor::Weekday { weekday, direction } => {
            weekday_date(today, weekday, direction, options.week_start)
        }
        DateAnchor::Calendar { month, day, year } => {
            let date = NaiveDate::from_ymd_opt(year.unwrap_or(today.year()), month, day)?;
            if options.forward_date && year.is_none() && date < today {
                return NaiveDate::from_ymd_opt(today.year() + 1, month, day);
            }
            Some(date)
        }
    }
}

fn weekday_date(
    today: NaiveDate,
    weekday: Weekday,
    direction: Direction,
    week_start: WeekStartDay,
) -> Option<NaiveDate> {
    let current = today.weekday();
    let offset = match direction {
        Direction::Next => {
            // Always future: if today is the same weekday, go to next week
            let days_ahead =
                (weekday.num_days_from_monday() as i64 - current.num_days_from_monday() as i64 + 7)
                    % 7;
            if days_ahead == 0 {
                7
            } else {
                days_ahead
            }
        }
        Direction::This => {
            // Same week: may be past or future
            days_from_week_start(weekday, week_start) - days_from_week_start(current, week_start)
        }
        Direction::Last => {
            let days_back =
                (current.num_days_from_monday() as i64 - weekday.num_days_from_monday() as i64 + 7)
                    % 7;
            -(if days_back == 0 { 7 } else { days_back })
        }
    };
    today.checked_add_signed(Duration::days(offset))
}

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> i64 {
    match week_start {
        WeekStartDay::Monday => weekday.num_days_from_monday() as i64,
        WeekStartDay::Sunday => weekday.num_days_from_sunday() as i64,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
