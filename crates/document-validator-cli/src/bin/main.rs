//! Document validator CLI
//!
//! Usage:
//!   docval check --specs <FILE> [--lazy] [--max-depth <N>] [--format table|json|yaml]
//!   docval validate --specs <FILE> --document <FILE> [--lazy] [--format table|json|yaml]
//!
//! Exit codes:
//!   0  - Success
//!   1  - Validation errors
//!   2  - Validation warnings only
//!   3  - Invalid input or specs
//!   4  - File error
//!   10 - Internal error

use clap::Parser;
use document_validator_cli::{run_cli, DocvalCli, LogFormat};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = DocvalCli::parse();
    init_tracing(cli.verbose, cli.log_format);
    std::process::exit(run_cli(cli).into());
}

/// RUST_LOG wins over the verbosity flags when set
fn init_tracing(verbose: u8, format: LogFormat) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
