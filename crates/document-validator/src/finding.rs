//! Findings produced while validating specs or converting values
//!
//! Every recursive check reports into one [`Findings`] accumulator. The
//! accumulator carries the validation [`Mode`]: in fail-fast mode the first
//! error stops the walk, in lazy mode the walk always runs to completion and
//! the caller inspects the collected errors and warnings afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ValidatorConfig, DEFAULT_MAX_DEPTH};
use crate::error::Error;
use crate::path::Path;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The value (or specs) is rejected
    Error,
    /// The value is accepted but something was lossy
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single error or warning, located by its path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub path: Path,
    pub message: String,
}

impl Finding {
    /// Create an error finding
    pub fn error(path: Path, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            path,
            message: message.into(),
        }
    }

    /// Create a warning finding
    pub fn warning(path: Path, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}'", self.message, self.path)
    }
}

/// How a walk reacts to its first error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Stop at the first error
    #[default]
    FailFast,
    /// Keep walking and collect every error and warning
    Lazy,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::FailFast => write!(f, "fail-fast"),
            Mode::Lazy => write!(f, "lazy"),
        }
    }
}

/// Marker returned through the walk once a fail-fast accumulator received
/// its first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stop;

pub(crate) type Step<T> = std::result::Result<T, Stop>;

/// Accumulator threaded through every recursive check
///
/// Findings are appended in traversal order: depth first, siblings in
/// declaration order. An accumulator is not cleared between calls.
#[derive(Debug, Clone)]
pub struct Findings {
    mode: Mode,
    max_depth: usize,
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
}

impl Default for Findings {
    fn default() -> Self {
        Self::fail_fast()
    }
}

impl Findings {
    /// Create an empty accumulator for the given mode
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            max_depth: DEFAULT_MAX_DEPTH,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn fail_fast() -> Self {
        Self::new(Mode::FailFast)
    }

    pub fn lazy() -> Self {
        Self::new(Mode::Lazy)
    }

    /// Create an accumulator following a validator configuration
    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::new(config.mode).with_max_depth(config.max_depth)
    }

    /// Set the deepest node a walk may visit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// The error a fail-fast walk would have stopped at
    pub fn first_error(&self) -> Option<&Finding> {
        self.errors.first()
    }

    /// Split into `(errors, warnings)`
    pub fn into_parts(self) -> (Vec<Finding>, Vec<Finding>) {
        (self.errors, self.warnings)
    }

    /// Turn the first recorded error into the error of a fail-fast entry point
    pub(crate) fn into_error(self, wrap: fn(Finding) -> Error) -> Error {
        match self.errors.into_iter().next() {
            Some(first) => wrap(first),
            None => Error::Internal("walk stopped without reporting an error".to_string()),
        }
    }

    /// Record an error; fails in fail-fast mode so the walk unwinds with `?`
    pub(crate) fn error(&mut self, path: &Path, message: impl Into<String>) -> Step<()> {
        self.errors.push(Finding::error(path.clone(), message));
        match self.mode {
            Mode::FailFast => Err(Stop),
            Mode::Lazy => Ok(()),
        }
    }

    pub(crate) fn warning(&mut self, path: &Path, message: impl Into<String>) {
        self.warnings.push(Finding::warning(path.clone(), message));
    }

    /// Reject nodes nested deeper than the configured limit.
    ///
    /// Returns `Ok(false)` when the node must not be descended into.
    pub(crate) fn enter(&mut self, path: &Path) -> Step<bool> {
        if path.depth() <= self.max_depth {
            return Ok(true);
        }
        tracing::trace!(path = %path, max_depth = self.max_depth, "nesting depth limit reached");
        let message = format!("nesting depth exceeds the limit of {}", self.max_depth);
        self.error(path, message)?;
        Ok(false)
    }
}
