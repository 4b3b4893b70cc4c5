mod common;

use std::time::Duration;

use common::{generate_signup_csv, signup_rules};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use flowguard::prelude::*;
use futures::io::Cursor;
use tokio::runtime::Runtime;

/// Benchmark comparing strategies on CPU-bound rules
///
/// The directory answers immediately, so this measures scheduling
/// overhead of each strategy rather than overlap.
fn bench_strategies_cpu_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_cpu_bound");
    let runtime = Runtime::new().unwrap();

    let num_records = 10_000;

    for (name, strategy) in [
        ("sequential", Strategy::Sequential),
        ("parallel_4", Strategy::Parallel { concurrency: 4 }),
        ("parallel_16", Strategy::parallel()),
        ("latest", Strategy::Latest),
    ] {
        let setup = || generate_signup_csv(num_records, 10);

        let bench = |csv_data: String| async move {
            let report = StreamValidator::new(signup_rules(Duration::ZERO))
                .with_strategy(strategy)
                .with_error_policy(SilentSkip)
                .add_source(CsvRecordStream::<SignupRecord>::new(Cursor::new(csv_data)))
                .run()
                .await;

            black_box(report);
        };

        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |b, _| {
            b.to_async(&runtime).iter_batched(setup, bench, BatchSize::SmallInput);
        });
    }

    group.finish();
}

/// Benchmark showing overlap of slow lookups
///
/// Each record waits 1ms in the directory. Sequential pays that once per
/// record; Parallel pays it once per `concurrency` records.
fn bench_concurrency_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_io_bound");
    group.sample_size(10);
    let runtime = Runtime::new().unwrap();

    let num_records = 200;

    for concurrency in [1, 4, 16, 64] {
        let setup = || generate_signup_csv(num_records, 0);

        let bench = |csv_data: String| async move {
            let report = StreamValidator::new(signup_rules(Duration::from_millis(1)))
                .with_concurrency(concurrency)
                .add_source(CsvRecordStream::<SignupRecord>::new(Cursor::new(csv_data)))
                .run()
                .await;

            black_box(report);
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(concurrency),
            &concurrency,
            |b, _| {
                b.to_async(&runtime).iter_batched(setup, bench, BatchSize::SmallInput);
            },
        );
    }

    group.finish();
}

/// Benchmark comparing Chain vs Merge for several sources
fn bench_chain_vs_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategy_chain_vs_merge");
    let runtime = Runtime::new().unwrap();

    let num_sources = 4;
    let records_per_source = 2_500;

    for (name, combinator) in [
        ("chain", StreamCombinator::Chain),
        ("merge", StreamCombinator::Merge),
    ] {
        let setup = || {
            (0..num_sources)
                .map(|_| generate_signup_csv(records_per_source, 10))
                .collect::<Vec<_>>()
        };

        let bench = |datasets: Vec<String>| async move {
            let mut validator = StreamValidator::new(signup_rules(Duration::ZERO))
                .with_stream_combinator(combinator)
                .with_concurrency(16);

            for csv_data in datasets {
                validator = validator.add_source(CsvRecordStream::<SignupRecord>::new(Cursor::new(csv_data)));
            }

            black_box(validator.run().await);
        };

        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |b, _| {
            b.to_async(&runtime).iter_batched(setup, bench, BatchSize::SmallInput);
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_strategies_cpu_bound,
    bench_concurrency_scaling,
    bench_chain_vs_merge,
);

criterion_main!(benches);
