//! Example: Chained Sources
//!
//! Validates several sign-up exports one after another using
//! StreamCombinator::Chain. Outcomes come out in file order, so row N of
//! the report is row N of the concatenated input.
//!
//! Use case: When order matters
//! - A main export followed by late registrations
//! - Daily exports processed oldest to newest
//!
//! Usage:
//!   cargo run --example chained_sources -- day1.csv day2.csv day3.csv
//!
//! Or create test files:
//!   echo -e "username,email,age\nalice,alice@example.com,30" > /tmp/day1.csv
//!   echo -e "username,email,age\nadmin,admin@example.com,41" > /tmp/day2.csv
//!   cargo run --example chained_sources -- /tmp/day1.csv /tmp/day2.csv

use std::env;

use flowguard::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("flowguard=info");

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file1.csv> [file2.csv] ...", args[0]);
        eprintln!();
        eprintln!("Example with test data:");
        eprintln!("  echo -e \"username,email,age\\nalice,alice@example.com,30\" > /tmp/day1.csv");
        eprintln!("  echo -e \"username,email,age\\nadmin,admin@example.com,41\" > /tmp/day2.csv");
        eprintln!("  {} /tmp/day1.csv /tmp/day2.csv", args[0]);
        std::process::exit(1);
    }

    let input_files = &args[1..];

    eprintln!("=== Chained Sources Example ===");
    eprintln!("Validating {} files in sequence:", input_files.len());
    for (i, path) in input_files.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, path);
    }
    eprintln!();

    let mut validator = StreamValidator::new(SignupRules::default())
        .with_stream_combinator(StreamCombinator::Chain)
        .with_error_policy(SkipErrors);

    for input_path in input_files {
        let signups = CsvRecordStream::<SignupRecord>::from_file(input_path)
            .await
            .map_err(|e| format!("Failed to open {}: {}", input_path, e))?;
        validator = validator.add_source(signups);
    }

    // Sequential strategy keeps outcomes in input order
    let report = validator.run().await;

    eprintln!(
        "{} records validated, {} valid, {} invalid",
        report.total(),
        report.valid_count(),
        report.invalid_count()
    );
    eprintln!();

    write_report(&report.outcomes, &mut tokio::io::stdout()).await?;

    Ok(())
}
