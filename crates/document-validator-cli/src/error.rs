//! Error types for the `docval` command
//!
//! Provides structured error types for file access, parsing and
//! serialization failures.

use thiserror::Error;

use crate::cli::ExitCode;

/// Main error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Specs or document parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization error while rendering output
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Error reported by the validator itself
    #[error(transparent)]
    Validator(#[from] document_validator::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CliError {
    /// Create a file error for `path`
    pub fn file_error(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        CliError::FileError(format!("Failed to read '{}': {}", path.display(), err))
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        match self {
            CliError::InvalidInput(_) | CliError::FileError(_) | CliError::ParseError(_) => true,
            CliError::Validator(err) => {
                err.is_client_error() || matches!(err, document_validator::Error::Config(_))
            }
            CliError::SerializationError(_) | CliError::InternalError(_) => false,
        }
    }

    /// Exit code reported for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::FileError(_) => ExitCode::FileError,
            _ if self.is_user_error() => ExitCode::InvalidInput,
            _ => ExitCode::InternalError,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::FileError(err.to_string())
    }
}
