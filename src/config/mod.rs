//! Configuration module for dropsweep.
//!
//! The daemon is configured via a JSON file, with support for environment
//! variable interpolation using `${VAR_NAME}` syntax.
//!
//! # Example
//!
//! ```json
//! {
//!   "api": { "token": "${DO_API_TOKEN}" },
//!   "sweep": { "threshold_secs": 86400, "delete_stale": false }
//! }
//! ```

mod api;
mod observability;
mod sweep;

use std::path::Path;

pub use api::*;
pub use observability::*;
use serde::{Deserialize, Serialize};
pub use sweep::*;

/// Root configuration for the sweeper.
///
/// Only the `api` section is required (it carries the token); everything else
/// has conservative defaults, including `delete_stale = false` so a bare
/// config never deletes anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweeperConfig {
    /// DigitalOcean API access.
    pub api: ApiConfig,

    /// Staleness threshold, delete policy, and sweep schedule.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl SweeperConfig {
    /// Load configuration from a JSON file.
    ///
    /// Environment variables in the format `${VAR_NAME}` are expanded.
    /// Missing required variables will cause an error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e, path.as_ref().to_path_buf()))?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a JSON string.
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        let expanded = expand_env_vars(contents)?;

        let config: SweeperConfig = serde_json::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration for consistency and completeness.
    ///
    /// The sweep core assumes a validated config: these checks run once at
    /// startup, before anything touches the API.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.api.token.trim().is_empty() {
            return Err(ConfigError::Validation(
                "api.token must not be empty".into(),
            ));
        }

        if self.api.per_page == 0 || self.api.per_page > 200 {
            return Err(ConfigError::Validation(format!(
                "api.per_page must be between 1 and 200, got {}",
                self.api.per_page
            )));
        }

        if self.sweep.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "sweep.interval_secs must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {1}: {0}")]
    Io(std::io::Error, std::path::PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Expand `${VAR_NAME}` references with values from the environment.
fn expand_env_vars(input: &str) -> Result<String, ConfigError> {
    let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static regex");
    let mut result = String::with_capacity(input.len());
    let mut last_end = 0;

    for cap in re.captures_iter(input) {
        let matched = cap.get(0).expect("capture 0 always present");
        result.push_str(&input[last_end..matched.start()]);

        let var_name = &cap[1];
        let value = std::env::var(var_name)
            .map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;
        result.push_str(&value);

        last_end = matched.end();
    }

    result.push_str(&input[last_end..]);

    Ok(result)
}
