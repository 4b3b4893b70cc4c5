//! Example: Parallel Lookups
//!
//! Validates the same batch twice against a directory that takes 100ms
//! per lookup: once with the Sequential strategy, once with Parallel.
//! Sequential pays the latency for every record; Parallel overlaps it
//! across up to `concurrency` records.
//!
//! Usage:
//!   cargo run --example parallel_lookup -- [records] [concurrency]

use std::env;
use std::time::{Duration, Instant};

use flowguard::prelude::*;
use futures::stream;

fn batch(size: usize) -> Vec<SignupRecord> {
    (0..size)
        .map(|i| SignupRecord {
            username: if i % 7 == 0 {
                "support".to_string()
            } else {
                format!("member{}", i)
            },
            email: format!("member{}@example.com", i),
            age: Some(21),
        })
        .collect()
}

async fn timed_run(strategy: Strategy, size: usize) -> (ValidationReport, Duration) {
    let rules = SignupRules::new(UsernameDirectory::new(
        ["admin", "support"],
        Duration::from_millis(100),
    ));

    let start = Instant::now();
    let report = StreamValidator::new(rules)
        .with_strategy(strategy)
        .add_stream(stream::iter(batch(size)))
        .run()
        .await;

    (report, start.elapsed())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("flowguard=info");

    let args: Vec<String> = env::args().collect();
    let size: usize = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(32);
    let concurrency: usize = args
        .get(2)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(DEFAULT_CONCURRENCY);

    eprintln!("=== Parallel Lookup Example ===");
    eprintln!("{} records, 100ms directory latency", size);
    eprintln!();

    for strategy in [Strategy::Sequential, Strategy::Parallel { concurrency }] {
        let (report, elapsed) = timed_run(strategy, size).await;
        eprintln!(
            "{:<14} {:>4} validated, {:>3} taken usernames, {:>6} ms",
            strategy.to_string(),
            report.total(),
            report.invalid_count(),
            elapsed.as_millis()
        );
    }

    Ok(())
}
