use std::time::Duration;

use flowguard::prelude::*;
use futures::StreamExt;
use futures::stream;
use tokio::runtime::Builder;

/// Validation throughput hotpath profiling
///
/// Profiles the engine and each strategy over in-memory sign-up records.
/// Shows how time splits between rule declaration, checks, and stream
/// scheduling.
///
/// Run with: cargo run --release --bin hotpath_validation_throughput --features profiling
#[hotpath::main]
fn main() {
    println!("=== Validation Throughput Hotpath Profile ===");
    println!("Workload: 200K sign-up records per strategy");
    println!("Configuration: 8 worker threads, directory latency 0ms");
    println!();

    let runtime = Builder::new_multi_thread()
        .worker_threads(8)
        .enable_all()
        .build()
        .unwrap();

    let num_records = 200_000;

    println!("Starting profiled execution...");
    println!();

    runtime.block_on(async {
        run_strategy(Strategy::Sequential, num_records).await;
        run_strategy(Strategy::parallel(), num_records).await;
        run_extension_parallel(num_records).await;
    });

    println!();
    println!("Profiling complete. Results above show function-level breakdown.");
}

fn records(num_records: usize) -> Vec<SignupRecord> {
    (0..num_records)
        .map(|i| SignupRecord {
            username: format!("user{}", i),
            email: if i % 10 == 0 {
                format!("user{}.example.com", i)
            } else {
                format!("user{}@example.com", i)
            },
            age: Some((10 + i % 60) as u32),
        })
        .collect()
}

#[hotpath::measure]
async fn run_strategy(strategy: Strategy, num_records: usize) {
    let report = StreamValidator::new(SignupRules::new(UsernameDirectory::new(
        ["admin"],
        Duration::ZERO,
    )))
    .with_strategy(strategy)
    .add_stream(stream::iter(records(num_records)))
    .run()
    .await;

    println!(
        "{}: {} validated, {} invalid",
        strategy,
        report.total(),
        report.invalid_count()
    );
}

#[hotpath::measure]
async fn run_extension_parallel(num_records: usize) {
    let rules = std::sync::Arc::new(SignupRules::new(UsernameDirectory::new(
        ["admin"],
        Duration::ZERO,
    )));

    let invalid = stream::iter(records(num_records))
        .validate_parallel(rules, DEFAULT_CONCURRENCY)
        .filter(|outcome| futures::future::ready(matches!(outcome, Ok(o) if !o.is_valid())))
        .count()
        .await;

    println!("extension parallel: {} invalid", invalid);
}
