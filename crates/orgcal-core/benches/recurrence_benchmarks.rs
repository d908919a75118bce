use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc, Weekday};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orgcal_core::db::establish_connection;
use orgcal_core::models::NewEventData;
use orgcal_core::recurrence::{expand, expand_with_limits, ExpansionLimits, RecurrenceRule};
use orgcal_core::repository::SqliteRepository;
use orgcal_core::series::{SeriesMutator, UuidV7Generator};
use tokio::runtime::Runtime;

fn anchor_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 31, 18, 30, 0).unwrap()
}

fn bench_expansion_by_frequency(c: &mut Criterion) {
    let start = anchor_start();
    let end = Some(start + Duration::hours(2));
    let until = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();

    let rules = vec![
        ("daily", RecurrenceRule::daily().until(until)),
        ("weekly_single", RecurrenceRule::weekly([]).until(until)),
        (
            "weekly_mwf",
            RecurrenceRule::weekly([Weekday::Mon, Weekday::Wed, Weekday::Fri]).until(until),
        ),
        ("monthly_clamped", RecurrenceRule::monthly(Some(31)).until(until)),
    ];

    let mut group = c.benchmark_group("expansion");

    for (name, rule) in &rules {
        group.bench_with_input(BenchmarkId::new("rule", name), rule, |b, rule| {
            b.iter(|| expand(black_box(start), black_box(end), black_box(rule)))
        });
    }
    group.finish();
}

fn bench_daily_expansion_by_cap(c: &mut Criterion) {
    let start = anchor_start();
    let rule = RecurrenceRule::daily().until(NaiveDate::from_ymd_opt(2035, 1, 1).unwrap());

    let mut group = c.benchmark_group("daily_cap");

    for cap in [30usize, 180, 1000].iter() {
        let limits = ExpansionLimits {
            daily_cap: *cap,
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("cap", cap), &limits, |b, limits| {
            b.iter(|| expand_with_limits(black_box(start), None, black_box(&rule), black_box(limits)))
        });
    }
    group.finish();
}

fn bench_rule_parsing(c: &mut Criterion) {
    let inputs = vec!["daily", "weekly", "weekly:mon,wed,fri", "monthly:31"];

    let mut group = c.benchmark_group("rule_parsing");

    for input in inputs {
        group.bench_with_input(BenchmarkId::new("rule", input), input, |b, input| {
            b.iter(|| black_box(input).parse::<RecurrenceRule>().unwrap())
        });
    }
    group.finish();
}

fn bench_series_creation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("bench.db");
    let mutator = rt.block_on(async {
        let pool = establish_connection(&db_path.to_string_lossy()).await.unwrap();
        SeriesMutator::new(SqliteRepository::new(pool))
    });

    let rule = RecurrenceRule::weekly([Weekday::Tue, Weekday::Thu]);

    c.bench_function("series_creation_weekly", |b| {
        b.iter(|| {
            rt.block_on(async {
                let start = anchor_start() + Duration::days(fastrand::i64(0..365));
                let data = NewEventData {
                    title: "Benchmark Event".to_string(),
                    start_date: start,
                    end_date: Some(start + Duration::hours(1)),
                    ..Default::default()
                };
                mutator
                    .create(black_box(data), black_box(&rule), &UuidV7Generator)
                    .await
                    .unwrap()
            })
        })
    });
}

criterion_group!(
    benches,
    bench_expansion_by_frequency,
    bench_daily_expansion_by_cap,
    bench_rule_parsing,
    bench_series_creation
);
criterion_main!(benches);
