use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Compiler configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize, PartialEq)]
pub struct CompilerConfig {
    /// Page size applied to top-level list queries that pass no `limit`
    #[validate(range(
        min = 1,
        max = 10000,
        message = "Default limit must be between 1 and 10000"
    ))]
    #[serde(default)]
    pub default_limit: Option<u64>,

    /// Maximum association / function nesting depth accepted from a client
    #[validate(range(
        min = 1,
        max = 256,
        message = "Max depth must be between 1 and 256"
    ))]
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    32
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_limit: Some(20),
            max_depth: default_max_depth(),
        }
    }
}

impl CompilerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_limit: u64 = parse_env_var("GQLPLAN_DEFAULT_LIMIT", "20")?;
        let config = Self {
            // 0 disables the implicit page size
            default_limit: (default_limit > 0).then_some(default_limit),
            max_depth: parse_env_var("GQLPLAN_MAX_DEPTH", "32")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
