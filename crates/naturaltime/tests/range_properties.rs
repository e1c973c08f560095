//! Property tests for the half-open interval algebra.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use naturaltime::Range;
use proptest::prelude::*;

const BASE: i64 = 1_673_784_000; // 2023-01-15T12:00:00Z

fn instant(offset_secs: i64, tz_hours: i32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(tz_hours * 3600)
        .unwrap()
        .timestamp_opt(BASE + offset_secs, 0)
        .unwrap()
}

prop_compose! {
    fn arb_range()(
        start in -200_000i64..200_000,
        minutes in 0i64..10_000,
        tz in -12i32..=14,
    ) -> Range {
        Range::new(instant(start, tz), Duration::minutes(minutes))
    }
}

prop_compose! {
    fn arb_nonempty_range()(
        start in -200_000i64..200_000,
        minutes in 1i64..10_000,
    ) -> Range {
        Range::new(instant(start, 0), Duration::minutes(minutes))
    }
}

proptest! {
    #[test]
    fn start_included_end_excluded(r in arb_nonempty_range()) {
        prop_assert!(r.contains(&r.start()));
        prop_assert!(!r.contains(&r.end()));
    }

    #[test]
    fn end_never_contained(r in arb_range()) {
        prop_assert!(!r.contains(&r.end()));
    }

    #[test]
    fn contains_matches_bounds(r in arb_range(), offset in -300_000i64..300_000) {
        let t = instant(offset, 3);
        prop_assert_eq!(r.contains(&t), r.start() <= t && t < r.end());
    }

    #[test]
    fn touching_ranges_never_overlap(r1 in arb_range(), minutes in 0i64..10_000) {
        let r2 = Range::new(r1.end(), Duration::minutes(minutes));
        prop_assert!(!r1.overlaps(&r2));
        prop_assert!(!r2.overlaps(&r1));
    }

    #[test]
    fn overlaps_is_symmetric(r1 in arb_range(), r2 in arb_range()) {
        prop_assert_eq!(r1.overlaps(&r2), r2.overlaps(&r1));
    }

    #[test]
    fn intersection_is_within_both(r1 in arb_nonempty_range(), r2 in arb_nonempty_range()) {
        prop_assume!(r1.overlaps(&r2));
        let i = r1.intersection(&r2);
        prop_assert!(r1.contains_range(&i));
        prop_assert!(r2.contains_range(&i));
    }

    #[test]
    fn intersection_without_overlap_is_point_at_later_start(
        r1 in arb_range(),
        r2 in arb_range(),
    ) {
        prop_assume!(!r1.overlaps(&r2));
        let i = r1.intersection(&r2);
        prop_assert!(i.is_all_day());
        prop_assert_eq!(i.start(), r1.start().max(r2.start()));
    }

    #[test]
    fn union_contains_both(r1 in arb_range(), r2 in arb_range()) {
        let u = r1.union(&r2);
        prop_assert!(u.contains_range(&r1));
        prop_assert!(u.contains_range(&r2));
    }

    #[test]
    fn reversed_construction_has_zero_duration(a in -200_000i64..200_000, gap in 1i64..200_000) {
        let r = Range::from_times(instant(a + gap, 0), instant(a, 0));
        prop_assert_eq!(r.duration(), Duration::zero());
        prop_assert_eq!(r.start(), instant(a + gap, 0));
    }

    #[test]
    fn negative_duration_is_clamped(a in -200_000i64..200_000, minutes in 1i64..10_000) {
        let r = Range::new(instant(a, 0), Duration::minutes(-minutes));
        prop_assert!(r.is_all_day());
    }

    #[test]
    fn serde_round_trip_is_exact(r in arb_range()) {
        let json = serde_json::to_string(&r).unwrap();
        let back: Range = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, r);
        let (back_start, r_start) = (back.start(), r.start());
        prop_assert_eq!(back_start.offset(), r_start.offset());
        prop_assert_eq!(serde_json::to_string(&back).unwrap(), json);
    }
}
