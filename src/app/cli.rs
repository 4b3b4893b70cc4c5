use std::future::Future;

use tokio::io::{BufWriter, Stdout};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use super::error::AppError;

/// Buffered output handles passed to the application body
pub struct Writers {
    pub stdout: BufWriter<Stdout>,
}

/// How a run that did not fail should end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every record passed validation
    Success,
    /// At least one record failed validation
    Invalid,
}

impl RunStatus {
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Success => 0,
            RunStatus::Invalid => 2,
        }
    }
}

type ArgParser<A> = Box<dyn FnOnce(Vec<String>) -> Result<A, AppError>>;

/// Reusable CLI application runner that handles:
/// - Logging setup (`RUST_LOG`, falling back to a default filter)
/// - Argument parsing
/// - Signal handling (SIGINT, SIGTERM, SIGHUP)
/// - Exit codes (0 = success, 1 = error, 2 = invalid records, 130 = SIGINT, 143 = SIGTERM)
pub struct CliApp<A = Vec<String>> {
    name: String,
    log_filter: String,
    parse_args: ArgParser<A>,
}

impl CliApp {
    /// Create a new CLI application runner
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log_filter: format!("{}=info", name),
            parse_args: Box::new(|args| Ok(args)),
        }
    }
}

impl<A> CliApp<A> {
    /// Parse the raw process arguments (program name included) with `parse`
    pub fn with_args<B, F>(self, parse: F) -> CliApp<B>
    where
        F: FnOnce(Vec<String>) -> Result<B, AppError> + 'static,
    {
        CliApp {
            name: self.name,
            log_filter: self.log_filter,
            parse_args: Box::new(parse),
        }
    }

    /// Log filter used when `RUST_LOG` is unset
    pub fn with_log_filter(mut self, directives: &str) -> Self {
        self.log_filter = directives.to_string();
        self
    }

    /// Run the CLI application with proper signal handling and resource cleanup
    ///
    /// Builds the tokio runtime, creates a buffered stdout writer and passes
    /// it to the main function with the parsed arguments. The main function
    /// is responsible for flushing.
    ///
    /// This function never returns - it calls std::process::exit with the appropriate code
    pub fn run<F, Fut>(self, main_fn: F) -> !
    where
        F: FnOnce(Writers, A) -> Fut,
        Fut: Future<Output = Result<RunStatus, AppError>>,
    {
        init_tracing(&self.log_filter);

        let args = match (self.parse_args)(std::env::args().collect()) {
            Ok(args) => args,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };

        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                eprintln!("Error: failed to start {} runtime: {}", self.name, e);
                std::process::exit(1);
            }
        };

        let code = runtime.block_on(async move {
            let writers = Writers {
                stdout: BufWriter::new(tokio::io::stdout()),
            };

            // Race main application logic against signal reception
            tokio::select! {
                result = main_fn(writers, args) => {
                    match result {
                        Ok(status) => status.exit_code(),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            1
                        }
                    }
                }
                signal_code = wait_for_signal() => signal_code,
            }
        });

        std::process::exit(code);
    }
}

/// Install the fmt subscriber writing to stderr
///
/// `RUST_LOG` wins over `default_filter`. Calling this more than once is
/// harmless; only the first subscriber is kept.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Wait for any Unix signal (SIGINT, SIGTERM, SIGHUP) or Ctrl+C
/// Returns the exit code to use (130 for SIGINT, 143 for SIGTERM, etc.)
async fn wait_for_signal() -> i32 {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate()).expect("Failed to setup SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("Failed to setup SIGINT handler");
        let mut sighup = signal(SignalKind::hangup()).expect("Failed to setup SIGHUP handler");

        tokio::select! {
            _ = sigterm.recv() => {
                eprintln!("Received SIGTERM");
                143 // 128 + 15
            }
            _ = sigint.recv() => {
                eprintln!("Received SIGINT");
                130 // 128 + 2
            }
            _ = sighup.recv() => {
                eprintln!("Received SIGHUP");
                129 // 128 + 1
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to setup Ctrl+C handler");
        eprintln!("Received Ctrl+C");
        130
    }
}
