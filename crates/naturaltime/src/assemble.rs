//! Candidate → [`Range`] assembly.

use chrono::{DateTime, Duration, TimeZone};
use tracing::debug;

use crate::range::Range;
use crate::resolve::Candidate;

/// Convert candidates to ranges in order of appearance.
///
/// Points become zero-duration ranges; candidates whose range form failed are
/// skipped. Structurally identical ranges keep only their first occurrence.
pub(crate) fn assemble_ranges<Tz: TimeZone>(candidates: &[Candidate<Tz>]) -> Vec<Range> {
    let mut ranges: Vec<Range> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let range = match candidate {
            Candidate::Point(at) => Range::new(at.clone(), Duration::zero()),
            Candidate::Span { start, end } => Range::from_times(start.clone(), end.clone()),
            Candidate::Broken(_) => continue,
        };
        if ranges.contains(&range) {
            debug!(%range, "duplicate candidate discarded");
            continue;
        }
        debug!(%range, "candidate assembled");
        ranges.push(range);
    }
    ranges
}

/// The start of the first candidate, including those whose range form failed.
pub(crate) fn first_instant<Tz: TimeZone>(candidates: Vec<Candidate<Tz>>) -> Option<DateTime<Tz>> {
    candidates.into_iter().next().map(Candidate::into_start)
}
