//! Configuration management for `throttle-core`.
//!
//! A bucket is described by its sustained rate and the level it starts at.
//! Configurations can be written by hand or loaded from a YAML file:
//!
//! ```yaml
//! rate: 50
//! initial_fill: empty
//! ```
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::ThrottleError;

/// Rate used when a configuration file omits one.
pub const DEFAULT_RATE: u32 = 100;

/// The token level a bucket starts at.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialFill {
    /// Start at capacity; the first second's burst is honoured immediately.
    #[default]
    Full,
    /// Start with no tokens; every grant must first be earned by elapsed time.
    Empty,
}

/// Construction parameters for a [`crate::TokenBucket`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BucketConfig {
    /// Sustained throughput in tokens per second. Also the burst capacity.
    pub rate: u32,
    pub initial_fill: InitialFill,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            initial_fill: InitialFill::Full,
        }
    }
}

impl BucketConfig {
    pub fn new(rate: u32) -> Self {
        Self {
            rate,
            ..Self::default()
        }
    }

    pub fn with_initial_fill(mut self, initial_fill: InitialFill) -> Self {
        self.initial_fill = initial_fill;
        self
    }

    /// Rejects configurations no bucket can be built from.
    pub fn validate(&self) -> Result<(), ThrottleError> {
        if self.rate == 0 {
            return Err(ThrottleError::InvalidRate(self.rate));
        }
        Ok(())
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ThrottleError> {
        let config: BucketConfig =
            serde_yml::from_str(yaml).map_err(|e| ThrottleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a bucket configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading bucket configuration from {}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read bucket config {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to parse bucket config {}", path.display()))?;
        debug!("Loaded bucket config: {:?}", config);
        Ok(config)
    }
}
