//! Validator configuration
//!
//! Configuration can be built programmatically or read from the environment:
//!
//! - `DOCVAL_LAZY`: `true`/`false` (also `1`/`0`), collect every finding
//! - `DOCVAL_MAX_DEPTH`: deepest node a walk may visit

use crate::error::{Error, Result};
use crate::finding::Mode;

/// Default nesting limit for schemas and values
pub const DEFAULT_MAX_DEPTH: usize = 64;

pub const ENV_LAZY: &str = "DOCVAL_LAZY";
pub const ENV_MAX_DEPTH: &str = "DOCVAL_MAX_DEPTH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Fail-fast or lazy validation
    pub mode: Mode,
    /// Deepest node a walk may visit before reporting an error
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            mode: Mode::FailFast,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ValidatorConfig {
    /// Configuration collecting every finding
    pub fn lazy() -> Self {
        Self::default().with_mode(Mode::Lazy)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_LAZY) {
            let lazy = parse_flag(&raw)
                .ok_or_else(|| Error::Config(format!("{} must be a boolean (got '{}')", ENV_LAZY, raw)))?;
            if lazy {
                config.mode = Mode::Lazy;
            }
        }

        if let Some(raw) = lookup(ENV_MAX_DEPTH) {
            config.max_depth = raw
                .trim()
                .parse()
                .ok()
                .filter(|depth: &usize| *depth > 0)
                .ok_or_else(|| {
                    Error::Config(format!("{} must be a positive integer (got '{}')", ENV_MAX_DEPTH, raw))
                })?;
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
