//! Engine configuration.
//!
//! Hosts configure the engine at startup, either with builder methods or by
//! loading a TOML document:
//!
//! ```toml
//! seed = 42
//! max_depth = 32
//! log_condition_results = true
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptError};

/// Default recursion limit for a single evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for a [`TriggerEngine`](crate::triggers::TriggerEngine).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the default random source. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Maximum nesting depth one evaluation may reach.
    ///
    /// Graphs are acyclic, so this only guards the call stack against
    /// pathologically deep (e.g. imported) expressions.
    pub max_depth: usize,

    /// Log each condition result at `debug` level.
    pub log_condition_results: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_depth: DEFAULT_MAX_DEPTH,
            log_condition_results: false,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the random seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the evaluation depth limit (builder pattern). Clamped to at least 1.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Enable condition result logging (builder pattern).
    #[must_use]
    pub fn log_conditions(mut self) -> Self {
        self.log_condition_results = true;
        self
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ScriptError::Config` if the TOML is invalid or describes an
    /// unusable configuration.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ScriptError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check the configuration for unusable values.
    ///
    /// # Errors
    /// Returns `ScriptError::Config` if `max_depth` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(ScriptError::Config("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}
