use std::path::Path;

use flowguard::prelude::*;
use futures::StreamExt;
use tracing::info;

fn main() {
    CliApp::new("flowguard")
        .with_args(parse_args)
        .run(validate_signups);
}

struct Args {
    input_file: String,
    strategy: Strategy,
}

/// Parse and validate command-line arguments
fn parse_args(args: Vec<String>) -> Result<Args, AppError> {
    match args.as_slice() {
        [_, input_file] => Ok(Args {
            input_file: input_file.clone(),
            strategy: Strategy::default(),
        }),
        [_, input_file, strategy] => Ok(Args {
            input_file: input_file.clone(),
            strategy: strategy.parse()?,
        }),
        _ => Err(AppError::InvalidArguments(
            "Usage: flowguard <signups.csv> [sequential|latest|parallel[:n]]".to_string(),
        )),
    }
}

/// Main application logic - validates sign-up records and writes the report
async fn validate_signups(mut writers: Writers, args: Args) -> Result<RunStatus, AppError> {
    if !Path::new(&args.input_file).exists() {
        return Err(AppError::FileNotFound(args.input_file));
    }

    // Single-source topology; see demos/chained_sources.rs for several
    let signups = CsvRecordStream::<SignupRecord>::from_file(&args.input_file).await?;
    info!(input = %args.input_file, strategy = %args.strategy, "Validating signups");

    // Undecodable rows are logged and skipped, the rest still get validated
    let mut outcomes = StreamValidator::new(SignupRules::default())
        .with_strategy(args.strategy)
        .with_error_policy(SkipErrors)
        .add_source(signups)
        .into_stream();

    // Rows are written as outcomes arrive; nothing is held back
    let mut report = ReportWriter::new(&mut writers.stdout);
    let (mut total, mut invalid) = (0usize, 0usize);
    let mut aborted = None;

    while let Some(result) = outcomes.next().await {
        match result {
            Ok(outcome) => {
                total += 1;
                if !outcome.is_valid() {
                    invalid += 1;
                }
                report.write(&outcome).await?;
            }
            Err(error) => {
                aborted = Some(error);
                break;
            }
        }
    }
    report.finish().await?;

    if let Some(error) = aborted {
        return Err(error.into());
    }

    info!(total, valid = total - invalid, invalid, "Validation finished");

    if invalid == 0 {
        Ok(RunStatus::Success)
    } else {
        Ok(RunStatus::Invalid)
    }
}
