use chrono::DateTime;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cron_seq::{GeneratorOptions, Schedule};

const EXPRESSIONS: &[&str] = &[
    "@hourly",
    "0 * * * * *",
    "0 * * * 1,7 *",
    "0 * * */2 * *",
    "0 * * 6 * *",
    "0 0 12 13 * 5",
    "0 * * * JAN-DEC MON-FRI",
    "0 0 0 29 2 *",
];

const NOW: &[&str] = &["1999-12-31T23:59:59Z", "2000-01-01T00:00:00Z", "2099-12-31T23:59:59Z"];
const TAKE_SAMPLES: usize = 10_000;

const DOCUMENT: &str = "
# maintenance
MAILTO=ops@example.com
SHELL=/bin/sh

0 2 * * * /usr/bin/backup
*/15 9-17 * * mon-fri /usr/bin/poll
@weekly /usr/bin/rotate
";

pub fn new_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("new");
    for expression in EXPRESSIONS {
        group.bench_with_input(BenchmarkId::from_parameter(expression), expression, |b, e| {
            b.iter(|| Schedule::new(*e).unwrap())
        });
    }
    group.bench_function("document", |b| b.iter(|| cron_seq::parse(DOCUMENT).unwrap()));
    group.finish();
}

pub fn upcoming_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("upcoming");
    for expression in EXPRESSIONS {
        for now_str in NOW {
            let now = DateTime::parse_from_rfc3339(now_str).unwrap();
            let schedule = Schedule::new(*expression).unwrap();
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{now_str}/{expression}")),
                &(now, &schedule),
                |b, (now, schedule)| b.iter(|| schedule.upcoming(now)),
            );
        }
    }
    group.finish();
}

pub fn iter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("iter");
    for expression in EXPRESSIONS {
        for now_str in NOW {
            let now = DateTime::parse_from_rfc3339(now_str).unwrap();
            let schedule = Schedule::new(*expression).unwrap();
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{now_str}/{expression}")),
                &(now, &schedule),
                |b, (now, schedule)| b.iter(|| schedule.iter(now).take(TAKE_SAMPLES).count()),
            );

            let options = GeneratorOptions::new(now).with_reverse(true);
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("reverse/{now_str}/{expression}")),
                &(options, &schedule),
                |b, (options, schedule)| b.iter(|| schedule.generator(options.clone()).take(TAKE_SAMPLES).count()),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, new_benchmark, upcoming_benchmark, iter_benchmark);
criterion_main!(benches);
