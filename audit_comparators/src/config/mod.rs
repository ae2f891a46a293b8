//! Engine configuration
//!
//! Defaults can be overridden through environment variables or a TOML file.
//!
//! ```toml
//! max_nesting_depth = 16
//! max_rendered_value_length = 1024
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Default limit on nested comparator delegation
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

/// Default limit on characters of an actual value rendered into a message
pub const DEFAULT_MAX_RENDERED_VALUE_LENGTH: usize = 2048;

const MIN_NESTING_DEPTH: usize = 1;

const MIN_RENDERED_VALUE_LENGTH: usize = 16;

/// Runtime settings for the comparator engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum depth of comparator-to-comparator delegation
    pub max_nesting_depth: usize,

    /// Maximum characters of an actual value included in a verdict message
    pub max_rendered_value_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: env_limit(
                "AUDIT_MAX_NESTING_DEPTH",
                env::var("AUDIT_MAX_NESTING_DEPTH").ok(),
                DEFAULT_MAX_NESTING_DEPTH,
                MIN_NESTING_DEPTH,
            ),
            max_rendered_value_length: env_limit(
                "AUDIT_MAX_RENDERED_VALUE_LENGTH",
                env::var("AUDIT_MAX_RENDERED_VALUE_LENGTH").ok(),
                DEFAULT_MAX_RENDERED_VALUE_LENGTH,
                MIN_RENDERED_VALUE_LENGTH,
            ),
        }
    }
}

/// Environment override for a limit; unparseable or below `minimum` keeps `default`
fn env_limit(name: &str, raw: Option<String>, default: usize, minimum: usize) -> usize {
    let raw = match raw {
        Some(raw) => raw,
        None => return default,
    };

    match raw.trim().parse::<usize>() {
        Ok(value) if value >= minimum => value,
        _ => {
            log_warning!("Ignoring invalid environment override",
                "variable" => name,
                "value" => raw,
                "minimum" => minimum,
                "using" => default
            );
            default
        }
    }
}

impl EngineConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Set the delegation depth limit
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Check limits are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nesting_depth < MIN_NESTING_DEPTH {
            return Err(ConfigError::InvalidValue {
                field: "max_nesting_depth".to_string(),
                reason: format!("must be at least {}", MIN_NESTING_DEPTH),
            });
        }

        if self.max_rendered_value_length < MIN_RENDERED_VALUE_LENGTH {
            return Err(ConfigError::InvalidValue {
                field: "max_rendered_value_length".to_string(),
                reason: format!("must be at least {}", MIN_RENDERED_VALUE_LENGTH),
            });
        }

        Ok(())
    }
}
