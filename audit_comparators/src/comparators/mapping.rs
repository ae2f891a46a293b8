//! # Dict comparator
//!
//! Compares attribute mappings (a service record, a package entry, ...).
//!
//! ```yaml
//! comparator:
//!   type: dict
//!   match:
//!     name: sshd
//!     running: true
//!     pid:
//!       type: number
//!       match: "> 0"
//! ```
//!
//! Only the attributes named in the rule are compared; extra actual
//! attributes are ignored. A rule value that is itself a typed rule is handed
//! to the comparator for that type.

use super::{Comparator, EvaluationContext};
use crate::error::ComparatorError;
use crate::types::{case_equal, is_typed_rule, RuleSpec, Verdict};
use serde_json::{Map, Value};

const COMPARATOR: &str = "dict";
const MODES: &[&str] = &["match", "match_any", "match_key_any", "match_key_all"];

/// Comparator for attribute mappings
#[derive(Debug, Default, Clone, Copy)]
pub struct MappingComparator;

impl MappingComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare the attributes named in `expected`; returns the first mismatch
    fn mismatch(
        &self,
        ctx: &EvaluationContext<'_>,
        actual: &Map<String, Value>,
        expected: &Map<String, Value>,
        ignore_case: bool,
    ) -> Result<Option<String>, ComparatorError> {
        for (key, expected_value) in expected {
            let actual_value = match actual.get(key) {
                Some(value) => value,
                None => return Ok(Some(format!("key '{}' not found", key))),
            };

            if is_typed_rule(expected_value) {
                let verdict = ctx.delegate(expected_value, actual_value)?;
                if !verdict.passed() {
                    return Ok(Some(format!("key '{}': {}", key, verdict.message)));
                }
                continue;
            }

            match (expected_value, actual_value) {
                (Value::Object(nested_expected), Value::Object(nested_actual)) => {
                    if let Some(reason) =
                        self.mismatch(ctx, nested_actual, nested_expected, ignore_case)?
                    {
                        return Ok(Some(format!("{}.{}", key, reason)));
                    }
                }
                _ => {
                    if !case_equal(actual_value, expected_value, ignore_case) {
                        return Ok(Some(format!(
                            "key '{}' expected {} got {}",
                            key,
                            ctx.render(expected_value),
                            ctx.render(actual_value)
                        )));
                    }
                }
            }
        }

        Ok(None)
    }

    fn expected_mapping<'v>(
        mode: &str,
        value: &'v Value,
    ) -> Result<&'v Map<String, Value>, ComparatorError> {
        value.as_object().ok_or_else(|| {
            ComparatorError::invalid_rule(COMPARATOR, mode, format!("expected a mapping, got {}", value))
        })
    }

    fn expected_keys<'v>(mode: &str, value: &'v Value) -> Result<Vec<&'v str>, ComparatorError> {
        let list = value.as_array().ok_or_else(|| {
            ComparatorError::invalid_rule(COMPARATOR, mode, "expected a list of keys")
        })?;
        list.iter()
            .map(|key| {
                key.as_str().ok_or_else(|| {
                    ComparatorError::invalid_rule(COMPARATOR, mode, format!("key must be a string, got {}", key))
                })
            })
            .collect()
    }
}

impl Comparator for MappingComparator {
    fn type_tag(&self) -> &'static str {
        COMPARATOR
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["mapping"]
    }

    fn modes(&self) -> &'static [&'static str] {
        MODES
    }

    fn compare(
        &self,
        ctx: &EvaluationContext<'_>,
        rule: &RuleSpec<'_>,
        actual: &Value,
    ) -> Result<Verdict, ComparatorError> {
        let mode = rule.select_mode(COMPARATOR, self.modes())?;
        log_debug!("Running dict comparator", "check_id" => ctx.check_id(), "mode" => mode);

        let expected = rule.require(COMPARATOR, mode)?;
        let ignore_case = rule.ignore_case();
        let actual_map = match actual.as_object() {
            Some(map) => map,
            None => {
                return Ok(Verdict::fail(format!(
                    "dict::{} failure. {} is not a mapping",
                    mode,
                    ctx.render(actual)
                )))
            }
        };

        match mode {
            "match" => {
                let expected_map = Self::expected_mapping(mode, expected)?;
                Ok(match self.mismatch(ctx, actual_map, expected_map, ignore_case)? {
                    None => Verdict::check_passed(),
                    Some(reason) => Verdict::fail(format!(
                        "dict::match failure. {}. Got={}",
                        reason,
                        ctx.render(actual)
                    )),
                })
            }
            "match_any" => {
                let candidates = expected.as_array().ok_or_else(|| {
                    ComparatorError::invalid_rule(COMPARATOR, mode, "expected a list of mappings")
                })?;
                for candidate in candidates {
                    let expected_map = Self::expected_mapping(mode, candidate)?;
                    if self.mismatch(ctx, actual_map, expected_map, ignore_case)?.is_none() {
                        return Ok(Verdict::check_passed());
                    }
                }
                Ok(Verdict::fail(format!(
                    "dict::match_any failure. Got={}",
                    ctx.render(actual)
                )))
            }
            "match_key_any" => {
                let keys = Self::expected_keys(mode, expected)?;
                Ok(Verdict::from_bool(
                    keys.iter().any(|key| actual_map.contains_key(*key)),
                    || format!("dict::match_key_any failure. None of {:?} found", keys),
                ))
            }
            _ => {
                let keys = Self::expected_keys(mode, expected)?;
                let missing: Vec<&str> = keys
                    .iter()
                    .copied()
                    .filter(|key| !actual_map.contains_key(*key))
                    .collect();
                Ok(Verdict::from_bool(missing.is_empty(), || {
                    format!("dict::match_key_all failure. Missing keys {:?}", missing)
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ComparatorError;
    use crate::registry::create_default_registry;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_match_compares_named_attributes_only() {
        let registry = create_default_registry();
        let spec = json!({"type": "dict", "match": {"name": "abc", "running": false}});
        let actual = json!({"name": "abc", "running": false, "pid": 12});
        assert!(registry.run("d1", &spec, &actual).unwrap().passed());

        let verdict = registry
            .run("d1", &spec, &json!({"name": "abc", "running": true}))
            .unwrap();
        assert!(!verdict.passed());
        assert!(verdict.message.contains("running"));
    }

    #[test]
    fn test_match_missing_key_fails() {
        let registry = create_default_registry();
        let spec = json!({"type": "dict", "match": {"name": "abc"}});
        let verdict = registry.run("d2", &spec, &json!({"id": 1})).unwrap();
        assert!(!verdict.passed());
        assert!(verdict.message.contains("key 'name' not found"));
    }

    #[test]
    fn test_match_delegates_typed_values() {
        let registry = create_default_registry();
        let spec = json!({
            "type": "mapping",
            "match": {"name": "abc", "offset": {"type": "number", "match": "<= 15"}}
        });
        assert!(registry.run("d3", &spec, &json!({"name": "abc", "offset": 10})).unwrap().passed());
        assert!(!registry.run("d3", &spec, &json!({"name": "abc", "offset": 20})).unwrap().passed());
    }

    #[test]
    fn test_match_nested_mapping_and_ignore_case() {
        let registry = create_default_registry();
        let spec = json!({
            "type": "dict",
            "ignore_case": true,
            "match": {"unit": {"state": "ACTIVE"}}
        });
        let actual = json!({"unit": {"state": "active", "sub": "running"}});
        assert!(registry.run("d4", &spec, &actual).unwrap().passed());
    }

    #[test]
    fn test_non_mapping_actual_fails() {
        let registry = create_default_registry();
        let spec = json!({"type": "dict", "match": {"name": "abc"}});
        let verdict = registry.run("d5", &spec, &json!("abc")).unwrap();
        assert!(!verdict.passed());
        assert!(verdict.message.contains("is not a mapping"));
    }

    #[test]
    fn test_match_any() {
        let registry = create_default_registry();
        let spec = json!({
            "type": "dict",
            "match_any": [{"name": "abc", "running": false}, {"name": "xyz", "running": true}]
        });
        assert!(registry.run("d6", &spec, &json!({"name": "xyz", "running": true})).unwrap().passed());
        assert!(!registry.run("d6", &spec, &json!({"name": "xyz", "running": false})).unwrap().passed());
    }

    #[test]
    fn test_key_presence_modes() {
        let registry = create_default_registry();
        let actual = json!({"name": "abc", "pid": 1});

        let any = json!({"type": "dict", "match_key_any": ["uid", "pid"]});
        assert!(registry.run("d7", &any, &actual).unwrap().passed());

        let all = json!({"type": "dict", "match_key_all": ["name", "uid"]});
        let verdict = registry.run("d7", &all, &actual).unwrap();
        assert!(!verdict.passed());
        assert!(verdict.message.contains("uid"));
    }

    #[test]
    fn test_non_mapping_rule_is_an_error() {
        let registry = create_default_registry();
        let spec = json!({"type": "dict", "match": "abc"});
        assert_matches!(
            registry.run("d8", &spec, &json!({"a": 1})),
            Err(ComparatorError::InvalidRule { .. })
        );
    }
}
