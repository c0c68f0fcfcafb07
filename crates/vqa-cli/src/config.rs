//! Run configuration for the `vqa` CLI.
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. Command-line flags
//! 2. Environment variables (with `VQA_` prefix)
//! 3. Configuration file (YAML, `--config`)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Optimizer method names accepted by the CLI.
pub const METHODS: &[&str] = &[
    "cobyla",
    "nelder-mead",
    "powell",
    "adaptive",
    "gradient-descent",
    "gd",
    "adam",
];

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Optimizer and logging settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Optimization method (see [`METHODS`])
    #[serde(default = "default_method")]
    pub method: String,

    /// Optimizer iteration budget
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Convergence tolerance
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Step size for gradient methods
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Seed for the initial parameters
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Log level used when no `-v` flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_method() -> String {
    "cobyla".to_string()
}

fn default_max_iterations() -> usize {
    300
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_learning_rate() -> f64 {
    0.1
}

fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            max_iterations: default_max_iterations(),
            tolerance: default_tolerance(),
            learning_rate: default_learning_rate(),
            seed: default_seed(),
            log_level: default_log_level(),
        }
    }
}

impl RunConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::IoError(format!("{}: {e}", path.as_ref().display()))
        })?;

        serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Defaults or file, then environment overrides.
    ///
    /// The result is not validated: command-line flags still take precedence,
    /// so callers validate once every layer has been applied.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.merge_env(|key| std::env::var(key).ok())
    }

    /// Apply `VQA_*` overrides. Only variables that are set take effect.
    ///
    /// `lookup` abstracts the environment so overrides can be tested.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VQA_METHOD") {
            self.method = v;
        }
        if let Some(v) = lookup("VQA_MAX_ITERATIONS") {
            self.max_iterations = parse_env("VQA_MAX_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("VQA_TOLERANCE") {
            self.tolerance = parse_env("VQA_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("VQA_LEARNING_RATE") {
            self.learning_rate = parse_env("VQA_LEARNING_RATE", &v)?;
        }
        if let Some(v) = lookup("VQA_SEED") {
            self.seed = parse_env("VQA_SEED", &v)?;
        }
        if let Some(v) = lookup("VQA_LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let method = self.method.to_ascii_lowercase();
        if !METHODS.contains(&method.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Unknown method '{}'. Available: {}",
                self.method,
                METHODS.join(", ")
            )));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}: cannot parse '{value}'")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
