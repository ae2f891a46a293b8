//! Rule specification access
//!
//! A rule specification is the JSON object under a check's `comparator`
//! key: a `type` tag, one mode key, and optional flags such as
//! `ignore_case`.

use crate::error::ComparatorError;
use serde_json::{Map, Value};

/// Key naming the comparator a rule is routed to
pub const TYPE_KEY: &str = "type";

/// Flag key for case-insensitive string comparison
pub const IGNORE_CASE_KEY: &str = "ignore_case";

/// Borrowed view of a rule specification object
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RuleSpec<'a> {
    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: &'a Value) -> Result<Self, ComparatorError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ComparatorError::InvalidRule {
                comparator: "<unknown>".to_string(),
                mode: "<none>".to_string(),
                reason: format!("rule specification must be a mapping, got {}", other),
            }),
        }
    }

    /// The `type` tag
    pub fn type_tag(&self) -> Result<&'a str, ComparatorError> {
        match self.fields.get(TYPE_KEY) {
            Some(Value::String(tag)) => Ok(tag.as_str()),
            Some(other) => Err(ComparatorError::InvalidRule {
                comparator: "<unknown>".to_string(),
                mode: TYPE_KEY.to_string(),
                reason: format!("'type' must be a string, got {}", other),
            }),
            None => Err(ComparatorError::MissingKey {
                comparator: "<unknown>".to_string(),
                key: TYPE_KEY.to_string(),
            }),
        }
    }

    /// `ignore_case` flag, false when absent
    pub fn ignore_case(&self) -> bool {
        matches!(self.fields.get(IGNORE_CASE_KEY), Some(Value::Bool(true)))
    }

    /// Required key; absence is a configuration defect
    pub fn require(&self, comparator: &str, key: &str) -> Result<&'a Value, ComparatorError> {
        self.fields.get(key).ok_or_else(|| ComparatorError::MissingKey {
            comparator: comparator.to_string(),
            key: key.to_string(),
        })
    }

    /// Pick the single mode key present out of `modes`
    pub fn select_mode(
        &self,
        comparator: &str,
        modes: &[&'static str],
    ) -> Result<&'static str, ComparatorError> {
        let present: Vec<&'static str> = modes
            .iter()
            .copied()
            .filter(|mode| self.fields.contains_key(*mode))
            .collect();

        match present.as_slice() {
            [mode] => Ok(*mode),
            [] => Err(ComparatorError::MissingRuleKey {
                comparator: comparator.to_string(),
                expected: modes.to_vec(),
            }),
            many => Err(ComparatorError::AmbiguousRule {
                comparator: comparator.to_string(),
                keys: many.iter().map(|m| m.to_string()).collect(),
            }),
        }
    }
}

/// If `pattern` is a single-entry-keyed mapping whose first value is itself a
/// typed rule (`{field: {type: ..., ...}}`), return that nested rule
pub fn nested_typed_rule(pattern: &Value) -> Option<&Value> {
    let (_, inner) = pattern.as_object()?.iter().next()?;
    match inner {
        Value::Object(fields) if fields.contains_key(TYPE_KEY) => Some(inner),
        _ => None,
    }
}

/// True when `value` is a mapping carrying a `type` tag
pub fn is_typed_rule(value: &Value) -> bool {
    value
        .as_object()
        .map_or(false, |fields| fields.contains_key(TYPE_KEY))
}
