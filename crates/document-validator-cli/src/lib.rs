//! Command-line front end for the document validator
//!
//! `docval check` validates a specs description written in JSON or YAML.
//! `docval validate` converts a JSON document against a specs file and
//! prints the normalized document.
//!
//! ## Exit codes
//!
//! - 0: success
//! - 1: validation errors
//! - 2: validation warnings only
//! - 3: invalid input or specs
//! - 4: file error
//! - 10: internal error

pub mod cli;
pub mod error;

pub use cli::{DocvalCli, DocvalCommands, ExitCode, LogFormat, OutputFormat, Report, ValidationArgs};
pub use error::CliError;

/// Run the CLI, writing reports to stdout and errors to stderr
pub fn run_cli(cli: DocvalCli) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli::run(cli, &mut out) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
