//! Parse throughput over representative phrases.

use chrono::{DateTime, Duration, FixedOffset};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use naturaltime::{parse_date, parse_multi, parse_range, Range};
use std::hint::black_box;

const PHRASES: &[&str] = &[
    "today",
    "next Monday",
    "3pm",
    "January 20, 2024",
    "today from 2pm to 4pm",
    "tomorrow 9am-5pm",
    "next Monday 10:00-11:30",
    "between 2 and 4pm tomorrow",
    "tomorrow 3pm or friday 10am",
    "invalid date expression",
];

fn reference() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2023-01-15T12:00:00Z").unwrap()
}

fn bench_parse_date(c: &mut Criterion) {
    let reference = reference();
    let mut group = c.benchmark_group("parse_date");
    for phrase in PHRASES {
        group.bench_with_input(BenchmarkId::from_parameter(phrase), phrase, |b, phrase| {
            b.iter(|| parse_date(black_box(phrase), black_box(&reference)))
        });
    }
    group.finish();
}

fn bench_parse_multi(c: &mut Criterion) {
    let reference = reference();
    c.bench_function("parse_multi_all_phrases", |b| {
        b.iter(|| {
            PHRASES
                .iter()
                .map(|phrase| parse_multi(black_box(phrase), &reference).len())
                .sum::<usize>()
        })
    });
}

fn bench_range_algebra(c: &mut Criterion) {
    let reference = reference();
    let day = parse_range("today from 9am to 5pm", &reference).unwrap();
    let meeting = Range::new(reference, Duration::minutes(45));
    c.bench_function("range_overlap_intersection", |b| {
        b.iter(|| {
            let a = black_box(&day);
            let m = black_box(&meeting);
            (a.overlaps(m), a.intersection(m), a.union(m))
        })
    });
}

criterion_group!(parse_benches, bench_parse_date, bench_parse_multi);
criterion_group!(range_benches, bench_range_algebra);
criterion_main!(parse_benches, range_benches);
