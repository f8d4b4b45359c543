use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use govready_install::{run, InstallArgs};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = InstallArgs::parse();
    init_logging(args.verbose);

    let outcome = run(&args).await;
    outcome.report();
    ExitCode::from(outcome.exit_code())
}

/// Diagnostics go to stderr so they never mix with the install narration
/// on stdout. `RUST_LOG` overrides the level derived from `-v`.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 | 1 => "govready_install=info",
        2 => "govready_install=debug",
        _ => "govready_install=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
