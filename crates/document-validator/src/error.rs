//! Error types for the document validator
//!
//! Each conversion direction has its own variant so a transport layer can
//! tell who produced the invalid value: an inbound document is the client's
//! fault, an outbound object is the server's.

use thiserror::Error;

use crate::finding::Finding;

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    /// The specs description is malformed
    #[error("invalid specs: {0}")]
    Specs(Finding),

    /// A JSON document does not conform to its specs
    #[error("invalid document: {0}")]
    Document(Finding),

    /// A native object does not conform to its specs
    #[error("invalid object: {0}")]
    Object(Finding),

    /// The document text is not JSON
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// The finding behind a validation failure
    pub fn finding(&self) -> Option<&Finding> {
        match self {
            Error::Specs(finding) | Error::Document(finding) | Error::Object(finding) => Some(finding),
            Error::Json(_) | Error::Config(_) | Error::Internal(_) => None,
        }
    }

    /// Check if the failure comes from data supplied by a client
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Document(_) | Error::Json(_))
    }
}

/// Result type alias for validator operations
pub type Result<T> = std::result::Result<T, Error>;
