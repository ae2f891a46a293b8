// src/error.rs
//! Error types for the comparator engine
//!
//! Only malformed rule specifications and registry misuse surface as errors.
//! Data that simply does not satisfy a rule is reported as a failed
//! [`Verdict`](crate::types::Verdict), never as a `ComparatorError`.

/// Rule specification and dispatch errors
#[derive(Debug, thiserror::Error)]
pub enum ComparatorError {
    #[error("Rule for comparator '{comparator}' is missing required key '{key}'")]
    MissingKey { comparator: String, key: String },

    #[error("Rule for comparator '{comparator}' names no mode; expected one of {expected:?}")]
    MissingRuleKey {
        comparator: String,
        expected: Vec<&'static str>,
    },

    #[error("Rule for comparator '{comparator}' names several modes {keys:?}; exactly one is allowed")]
    AmbiguousRule {
        comparator: String,
        keys: Vec<String>,
    },

    #[error("Invalid rule for '{comparator}::{mode}': {reason}")]
    InvalidRule {
        comparator: String,
        mode: String,
        reason: String,
    },

    #[error("Invalid number expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No comparator registered for type '{0}'")]
    UnknownComparator(String),

    #[error("Duplicate comparator registration: {type_tag}")]
    DuplicateComparator { type_tag: String },

    #[error("Rule nesting for check '{check_id}' exceeds the configured limit of {limit}")]
    NestingTooDeep { check_id: String, limit: usize },
}

impl ComparatorError {
    /// Build an [`ComparatorError::InvalidRule`] for a comparator mode
    pub fn invalid_rule(comparator: &str, mode: &str, reason: impl Into<String>) -> Self {
        ComparatorError::InvalidRule {
            comparator: comparator.to_string(),
            mode: mode.to_string(),
            reason: reason.into(),
        }
    }

    /// Stable event code used when this error is logged
    pub fn code(&self) -> crate::logging::Code {
        use crate::logging::codes;
        match self {
            ComparatorError::MissingKey { .. }
            | ComparatorError::MissingRuleKey { .. }
            | ComparatorError::AmbiguousRule { .. }
            | ComparatorError::InvalidRule { .. } => codes::MALFORMED_RULE,
            ComparatorError::InvalidExpression { .. } | ComparatorError::InvalidPattern { .. } => {
                codes::INVALID_OPERAND
            }
            ComparatorError::UnknownComparator(_) | ComparatorError::DuplicateComparator { .. } => {
                codes::REGISTRY_FAILURE
            }
            ComparatorError::NestingTooDeep { .. } => codes::NESTING_LIMIT,
        }
    }
}

/// Engine configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
