//! CLI module for the document validator
//!
//! This module provides the `docval` subcommands: checking a specs file and
//! validating a JSON document against one.

pub mod commands;
pub mod output;

pub use commands::{DocvalCli, DocvalCommands, LogFormat, ValidationArgs};
pub use output::{OutputFormat, Report};

use std::io::Write;

use crate::error::CliError;

/// Exit codes for CLI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful execution, all validations passed
    Success = 0,
    /// Validation failed with errors
    ValidationError = 1,
    /// Validation passed with warnings
    ValidationWarning = 2,
    /// Invalid input, arguments or specs
    InvalidInput = 3,
    /// File not found or inaccessible
    FileError = 4,
    /// Internal error
    InternalError = 10,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl ExitCode {
    /// Determine exit code from validation result
    pub fn from_validation_result(has_errors: bool, has_warnings: bool) -> Self {
        if has_errors {
            ExitCode::ValidationError
        } else if has_warnings {
            ExitCode::ValidationWarning
        } else {
            ExitCode::Success
        }
    }
}

/// Run the CLI with the given arguments, writing reports to `out`
pub fn run(cli: DocvalCli, out: &mut dyn Write) -> Result<ExitCode, CliError> {
    let quiet = cli.quiet;
    match cli.command {
        DocvalCommands::Check { specs, options } => commands::execute_check(&specs, &options, quiet, out),
        DocvalCommands::Validate {
            specs,
            document,
            options,
        } => commands::execute_validate(&specs, &document, &options, quiet, out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_conversion() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::ValidationError), 1);
        assert_eq!(i32::from(ExitCode::ValidationWarning), 2);
        assert_eq!(i32::from(ExitCode::InvalidInput), 3);
        assert_eq!(i32::from(ExitCode::FileError), 4);
        assert_eq!(i32::from(ExitCode::InternalError), 10);
    }

    #[test]
    fn test_exit_code_from_validation_result() {
        assert_eq!(ExitCode::from_validation_result(false, false), ExitCode::Success);
        assert_eq!(ExitCode::from_validation_result(true, false), ExitCode::ValidationError);
        assert_eq!(ExitCode::from_validation_result(false, true), ExitCode::ValidationWarning);
        assert_eq!(ExitCode::from_validation_result(true, true), ExitCode::ValidationError);
    }
}
