//! Pattern rules: token sequences → temporal anchors.
//!
//! Every rule implements [`Rule`]: given the token stream and a position, it
//! either recognizes one category of temporal reference starting there or
//! declines. All rules are tried at every position in registry order and all
//! matches are collected; overlapping matches are then settled in favor of the
//! longest token span (registry order breaks ties).
//!
//! After selection two context passes run over the surviving matches:
//!
//! - meridiem inference for clock pairs joined by a connector ("9-11am"),
//! - connector binding, which groups adjacent anchors into [`Expression`]s
//!   with an optional end point ("today from 2pm to 4pm").
//!
//! Anchors are plain data. Only the resolver turns them into instants.

use chrono::{NaiveTime, Weekday};
use tracing::trace;

use crate::token::{Meridiem, Separator, Token};

// ── Anchors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Closest occurrence strictly after the reference day.
    Next,
    /// Occurrence inside the reference week.
    This,
    /// Closest occurrence strictly before the reference day.
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateAnchor {
    DayOffset(i64),
    Weekday {
        weekday: Weekday,
        direction: Direction,
    },
    /// Month/day with an optional explicit year.
    Calendar {
        month: u32,
        day: u32,
        year: Option<i32>,
    },
}

/// How a clock time was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClockForm {
    /// With an am/pm marker ("3pm", "10:30 a.m.").
    Marked,
    /// Colon notation without a marker ("10:30").
    Colon,
    /// A word ("noon", "evening").
    Named,
    /// A lone integer hour with neither colon nor marker ("9" in "9-5").
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClockAnchor {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Option<Meridiem>,
    pub form: ClockForm,
}

impl ClockAnchor {
    fn new(hour: u32, minute: u32, meridiem: Option<Meridiem>, form: ClockForm) -> Self {
        ClockAnchor {
            hour,
            minute,
            meridiem,
            form,
        }
    }

    /// Unmarked 12-hour values that may borrow the other side's marker.
    fn takes_meridiem(&self) -> bool {
        self.meridiem.is_none()
            && matches!(self.form, ClockForm::Colon | ClockForm::Bare)
            && (1..=12).contains(&self.hour)
    }

    pub(crate) fn hour_24(&self) -> u32 {
        self.meridiem.map_or(self.hour, |m| m.to_24h(self.hour))
    }

    pub(crate) fn time(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(self.hour_24(), self.minute, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Date(DateAnchor),
    Clock(ClockAnchor),
}

/// A rule hit over the token span `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Match {
    pub start: usize,
    pub end: usize,
    pub anchor: Anchor,
    pub rule: &'static str,
    priority: usize,
}

impl Match {
    fn len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ── Rule registry ───────────────────────────────────────────────────────────

/// One category of temporal reference.
pub(crate) trait Rule: Sync {
    fn name(&self) -> &'static str;

    /// Try to match at `pos`, returning the number of tokens consumed and the anchor.
    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)>;
}

/// Registry in priority order.
static RULES: &[&dyn Rule] = &[
    &IsoDate,
    &CalendarDate,
    &DayRangeEnd,
    &RelativeDay,
    &WeekdayRule,
    &ClockTime,
    &NamedTime,
    &BareHour,
];

/// Run every rule at every position and keep the non-overlapping best matches,
/// ordered by position.
pub(crate) fn find_anchors(tokens: &[Token]) -> Vec<Match> {
    let mut found = Vec::new();
    for pos in 0..tokens.len() {
        for (priority, rule) in RULES.iter().enumerate() {
            if let Some((len, anchor)) = rule.attempt(tokens, pos) {
                found.push(Match {
                    start: pos,
                    end: pos + len,
                    anchor,
                    rule: rule.name(),
                    priority,
                });
            }
        }
    }

    let mut selected = select(found);
    infer_meridiems(tokens, &mut selected);
    selected
}

/// Longest span first, then registry priority, then leftmost.
fn select(mut found: Vec<Match>) -> Vec<Match> {
    found.sort_by_key(|m| (std::cmp::Reverse(m.len()), m.priority, m.start));

    let mut selected: Vec<Match> = Vec::with_capacity(found.len());
    for candidate in found {
        if selected.iter().any(|kept| kept.overlaps(&candidate)) {
            continue;
        }
        trace!(
            rule = candidate.rule,
            start = candidate.start,
            end = candidate.end,
            "anchor matched"
        );
        selected.push(candidate);
    }
    selected.sort_by_key(|m| m.start);
    selected
}

// ── Rules ───────────────────────────────────────────────────────────────────

/// "today", "tomorrow", "yesterday", "now", "day after tomorrow".
struct RelativeDay;

impl Rule for RelativeDay {
    fn name(&self) -> &'static str {
        "relative day"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let (len, offset) = match words_at(tokens, pos, 3).as_slice() {
            ["day", "after", "tomorrow", ..] => (3, 2),
            ["day", "before", "yesterday", ..] => (3, -2),
            ["today" | "now", ..] => (1, 0),
            ["tomorrow" | "tmrw" | "tmr", ..] => (1, 1),
            ["yesterday", ..] => (1, -1),
            _ => return None,
        };
        Some((len, Anchor::Date(DateAnchor::DayOffset(offset))))
    }
}

/// "next Monday", "this Friday", "last wed", or a bare weekday (next semantics).
struct WeekdayRule;

impl Rule for WeekdayRule {
    fn name(&self) -> &'static str {
        "weekday"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let words = words_at(tokens, pos, 2);
        let (direction, skip) = match *words.first()? {
            "next" | "coming" => (Direction::Next, 1),
            "this" => (Direction::This, 1),
            "last" | "past" | "previous" => (Direction::Last, 1),
            _ => (Direction::Next, 0),
        };
        let weekday = parse_weekday(words.get(skip)?)?;
        Some((
            skip + 1,
            Anchor::Date(DateAnchor::Weekday { weekday, direction }),
        ))
    }
}

/// "3pm", "9 am", "10:00", "10:30pm".
///
/// Twelve-hour notation requires a marker; colon notation may omit it.
struct ClockTime;

impl Rule for ClockTime {
    fn name(&self) -> &'static str {
        "clock time"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let hour = short_number(tokens.get(pos)?)?;
        match tokens.get(pos + 1)? {
            Token::Separator(Separator::Colon) => {
                let Token::Number {
                    value: minute,
                    digits: 2,
                } = *tokens.get(pos + 2)?
                else {
                    return None;
                };
                if minute > 59 {
                    return None;
                }
                let (len, meridiem) = match tokens.get(pos + 3) {
                    Some(Token::Meridiem(m)) => (4, Some(*m)),
                    _ => (3, None),
                };
                let valid = match meridiem {
                    Some(_) => (1..=12).contains(&hour),
                    None => hour <= 23,
                };
                let form = if meridiem.is_some() {
                    ClockForm::Marked
                } else {
                    ClockForm::Colon
                };
                valid.then(|| {
                    (
                        len,
                        Anchor::Clock(ClockAnchor::new(hour, minute, meridiem, form)),
                    )
                })
            }
            Token::Meridiem(m) if (1..=12).contains(&hour) => {
                let clock = ClockAnchor::new(hour, 0, Some(*m), ClockForm::Marked);
                Some((2, Anchor::Clock(clock)))
            }
            _ => None,
        }
    }
}

/// "noon", "midnight", "morning", "end of day", ...
struct NamedTime;

impl Rule for NamedTime {
    fn name(&self) -> &'static str {
        "named time"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let (len, hour) = match words_at(tokens, pos, 3).as_slice() {
            ["end", "of", "day" | "business", ..] => (3, 17),
            ["start", "of", "business", ..] => (3, 9),
            ["morning" | "sob", ..] => (1, 9),
            ["noon" | "midday" | "lunch", ..] => (1, 12),
            ["afternoon", ..] => (1, 13),
            ["eod" | "eob", ..] => (1, 17),
            ["evening", ..] => (1, 18),
            ["night" | "tonight", ..] => (1, 21),
            ["midnight", ..] => (1, 0),
            _ => return None,
        };
        Some((len, Anchor::Clock(ClockAnchor::new(hour, 0, None, ClockForm::Named))))
    }
}

/// "January 20", "jan 20th, 2024", "20 January", "20th of january".
struct CalendarDate;

impl Rule for CalendarDate {
    fn name(&self) -> &'static str {
        "calendar date"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        if let Some(month) = tokens.get(pos).and_then(Token::word).and_then(parse_month) {
            let day = day_of_month(tokens.get(pos + 1)?)?;
            let (extra, year) = trailing_year(tokens, pos + 2);
            return Some((2 + extra, calendar(month, day, year)));
        }

        let day = day_of_month(tokens.get(pos)?)?;
        let mut next = pos + 1;
        if tokens.get(next).and_then(Token::word) == Some("of") {
            next += 1;
        }
        let month = tokens.get(next).and_then(Token::word).and_then(parse_month)?;
        let (extra, year) = trailing_year(tokens, next + 1);
        Some((next + 1 - pos + extra, calendar(month, day, year)))
    }
}

/// The closing day of "January 20-22": a day number after a connector whose
/// left side is a month/day pair.
struct DayRangeEnd;

impl Rule for DayRangeEnd {
    fn name(&self) -> &'static str {
        "day range end"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let day = day_of_month(tokens.get(pos)?)?;
        if pos < 3 || !connects(tokens, pos - 1) {
            return None;
        }
        day_of_month(&tokens[pos - 2])?;
        let month = tokens[pos - 3].word().and_then(parse_month)?;
        Some((1, calendar(month, day, None)))
    }
}

/// ISO 8601 calendar dates: "2023-01-20".
struct IsoDate;

impl Rule for IsoDate {
    fn name(&self) -> &'static str {
        "iso date"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let Token::Number {
            value: year,
            digits: 4,
        } = *tokens.get(pos)?
        else {
            return None;
        };
        if !tokens.get(pos + 1)?.is_separator(Separator::Dash)
            || !tokens.get(pos + 3)?.is_separator(Separator::Dash)
        {
            return None;
        }
        let month = short_number(tokens.get(pos + 2)?).filter(|m| (1..=12).contains(m))?;
        let day = short_number(tokens.get(pos + 4)?).filter(|d| (1..=31).contains(d))?;
        Some((5, calendar(month, day, i32::try_from(year).ok())))
    }
}

/// A lone hour standing next to a range connector ("9-5", "from 9 to 11am").
///
/// Outside a range a bare integer is never read as a time.
struct BareHour;

impl Rule for BareHour {
    fn name(&self) -> &'static str {
        "bare hour"
    }

    fn attempt(&self, tokens: &[Token], pos: usize) -> Option<(usize, Anchor)> {
        let hour = short_number(tokens.get(pos)?).filter(|h| *h <= 23)?;
        if follows_month(tokens, pos)
            || matches!(
                tokens.get(pos + 1),
                Some(Token::Meridiem(_) | Token::Separator(Separator::Colon))
            )
        {
            return None;
        }

        let opens_range =
            connects(tokens, pos + 1) && tokens.get(pos + 2).and_then(short_number).is_some();
        let closes_range = pos >= 2
            && connects(tokens, pos - 1)
            && match &tokens[pos - 2] {
                Token::Meridiem(_) => true,
                t => short_number(t).is_some() && !follows_month(tokens, pos - 2),
            };
        if !opens_range && !closes_range {
            return None;
        }

        Some((1, Anchor::Clock(ClockAnchor::new(hour, 0, None, ClockForm::Bare))))
    }
}

// ── Meridiem inference ──────────────────────────────────────────────────────

/// Share am/pm markers across "X-Y" clock pairs where one side omits it.
fn infer_meridiems(tokens: &[Token], matches: &mut [Match]) {
    for i in 1..matches.len() {
        let (head, tail) = matches.split_at_mut(i);
        let (left, right) = (&mut head[i - 1], &mut tail[0]);
        if right.start != left.end + 1 || !connects(tokens, left.end) {
            continue;
        }
        if let (Anchor::Clock(start), Anchor::Clock(end)) = (&mut left.anchor, &mut right.anchor) {
            pair_meridiems(start, end);
        }
    }
}

fn pair_meridiems(start: &mut ClockAnchor, end: &mut ClockAnchor) {
    match (start.meridiem, end.meridiem) {
        (None, Some(m)) if start.takes_meridiem() => {
            start.meridiem = Some(m);
            if start.hour_24() > end.hour_24() {
                start.meridiem = Some(m.flip());
            }
        }
        (Some(m), None) if end.takes_meridiem() => {
            end.meridiem = Some(m);
            if end.hour_24() <= start.hour_24() {
                end.meridiem = Some(m.flip());
            }
        }
        // "9-5" is business hours; "22-6" stays overnight
        (None, None)
            if start.form == ClockForm::Bare
                && end.form == ClockForm::Bare
                && start.hour > end.hour
                && start.hour < end.hour + 12 =>
        {
            end.hour += 12;
        }
        _ => {}
    }
}

// ── Connector binding ───────────────────────────────────────────────────────

/// A date and/or time-of-day that resolves to one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Point {
    pub date: Option<DateAnchor>,
    pub clock: Option<ClockAnchor>,
    /// The date followed the clock ("4pm tomorrow"), so it may be shared
    /// with a dateless start point.
    pub trailing_date: bool,
}

impl Point {
    fn is_empty(&self) -> bool {
        self.date.is_none() && self.clock.is_none()
    }

    fn accepts(&self, anchor: &Anchor) -> bool {
        match anchor {
            Anchor::Date(_) => self.date.is_none(),
            Anchor::Clock(_) => self.clock.is_none(),
        }
    }

    fn add(&mut self, anchor: Anchor) {
        match anchor {
            Anchor::Date(date) => {
                self.date = Some(date);
                self.trailing_date = self.clock.is_some();
            }
            Anchor::Clock(clock) => self.clock = Some(clock),
        }
    }
}

/// One recognized temporal expression: a start point and an optional end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Expression {
    pub start: Point,
    pub end: Option<Point>,
    /// An opener ("from", "between") or connector had nothing to bind to.
    pub dangling: bool,
}

#[derive(Debug, Clone, Copy)]
enum Item {
    Anchor(Anchor),
    Sep(Separator),
    Gap,
}

/// Group anchors into expressions in order of appearance.
pub(crate) fn bind_expressions(tokens: &[Token], matches: &[Match]) -> Vec<Expression> {
    let mut items = Vec::with_capacity(tokens.len());
    let mut pending = matches.iter().peekable();
    let mut pos = 0;
    while pos < tokens.len() {
        if let Some(m) = pending.next_if(|m| m.start == pos) {
            items.push(Item::Anchor(m.anchor));
            pos = m.end;
            continue;
        }
        items.push(match tokens[pos] {
            Token::Separator(sep) => Item::Sep(sep),
            _ => Item::Gap,
        });
        pos += 1;
    }

    Binder { items: &items, pos: 0 }.expressions()
}

struct Binder<'a> {
    items: &'a [Item],
    pos: usize,
}

impl Binder<'_> {
    fn expressions(mut self) -> Vec<Expression> {
        let mut out = Vec::new();
        while let Some(item) = self.items.get(self.pos) {
            match *item {
                Item::Anchor(_) => out.push(self.expression(None)),
                Item::Sep(sep @ (Separator::From | Separator::Between))
                    if matches!(self.items.get(self.pos + 1), Some(Item::Anchor(_))) =>
                {
                    self.pos += 1;
                    out.push(self.expression(Some(sep)));
                }
                _ => self.pos += 1,
            }
        }
        out
    }

    fn expression(&mut self, opener: Option<Separator>) -> Expression {
        let (start, inner) = self.point();
        let opener = opener.or(inner);

        let joins = match self.items.get(self.pos) {
            Some(Item::Sep(sep)) => {
                sep.is_range_connector()
                    || (*sep == Separator::And && opener == Some(Separator::Between))
            }
            _ => false,
        };
        if !joins {
            return Expression {
                start,
                end: None,
                dangling: opener.is_some(),
            };
        }

        self.pos += 1;
        if !matches!(self.items.get(self.pos), Some(Item::Anchor(_))) {
            return Expression {
                start,
                end: None,
                dangling: true,
            };
        }
        let (end, _) = self.point();
        Expression {
            start,
            end: Some(end),
            dangling: false,
        }
    }

    /// Consume adjacent anchors (optionally joined by "at", "on", "," or an
    /// inner "from") into one point. Returns the inner opener, if any.
    fn point(&mut self) -> (Point, Option<Separator>) {
        let mut point = Point::default();
        let mut opener = None;
        loop {
            match self.items.get(self.pos) {
                Some(Item::Anchor(anchor)) if point.accepts(anchor) => {
                    point.add(*anchor);
                    self.pos += 1;
                }
                Some(Item::Sep(
                    sep @ (Separator::At
                    | Separator::On
                    | Separator::Comma
                    | Separator::From
                    | Separator::Between),
                )) if !point.is_empty()
                    && matches!(
                        self.items.get(self.pos + 1),
                        Some(Item::Anchor(next)) if point.accepts(next)
                    ) =>
                {
                    if matches!(sep, Separator::From | Separator::Between) {
                        opener = Some(*sep);
                    }
                    self.pos += 1;
                }
                _ => break,
            }
        }
        (point, opener)
    }
}

/// Tokens → expressions: the full rule-engine pass.
pub(crate) fn recognize(tokens: &[Token]) -> Vec<Expression> {
    let matches = find_anchors(tokens);
    bind_expressions(tokens, &matches)
}

// ── Token helpers ───────────────────────────────────────────────────────────

/// Up to `max` consecutive word tokens starting at `pos`.
fn words_at(tokens: &[Token], pos: usize, max: usize) -> Vec<&str> {
    tokens
        .iter()
        .skip(pos)
        .take(max)
        .map_while(Token::word)
        .collect()
}

/// A one- or two-digit integer.
fn short_number(token: &Token) -> Option<u32> {
    match *token {
        Token::Number { value, digits } if digits <= 2 => Some(value),
        _ => None,
    }
}

fn day_of_month(token: &Token) -> Option<u32> {
    match *token {
        Token::Number { value, digits: 1 | 2 } | Token::Ordinal(value)
            if (1..=31).contains(&value) =>
        {
            Some(value)
        }
        _ => None,
    }
}

/// Optional ", 2024" / " 2024" after a month/day pair.
fn trailing_year(tokens: &[Token], pos: usize) -> (usize, Option<i32>) {
    let skip = usize::from(tokens.get(pos).is_some_and(|t| t.is_separator(Separator::Comma)));
    match tokens.get(pos + skip) {
        Some(Token::Number { value, digits: 4 }) => (skip + 1, i32::try_from(*value).ok()),
        _ => (0, None),
    }
}

fn calendar(month: u32, day: u32, year: Option<i32>) -> Anchor {
    Anchor::Date(DateAnchor::Calendar { month, day, year })
}

/// Whether the token at `pos` joins a range. `and` only counts when a
/// `between` opens the clause it sits in.
fn connects(tokens: &[Token], pos: usize) -> bool {
    match tokens.get(pos).and_then(Token::separator) {
        Some(Separator::And) => tokens[..pos]
            .iter()
            .rev()
            .find_map(|t| t.separator().filter(|sep| *sep != Separator::Colon))
            == Some(Separator::Between),
        Some(sep) => sep.is_range_connector(),
        None => false,
    }
}

fn follows_month(tokens: &[Token], pos: usize) -> bool {
    pos >= 1 && tokens[pos - 1].word().and_then(parse_month).is_some()
}

/// Parse a weekday name (full and abbreviated).
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse a month name to number (1-12).
fn parse_month(s: &str) -> Option<u32> {
    match s {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
