//! # String comparator
//!
//! ```yaml
//! comparator:
//!   type: string
//!   match: "enforcing"
//!   ignore_case: true
//! ```
//!
//! Modes: `match`, `match_any` (list of strings), `regex_match` (pattern).

use super::{Comparator, EvaluationContext};
use crate::error::ComparatorError;
use crate::types::{RuleSpec, Verdict};
use regex::RegexBuilder;
use serde_json::Value;
use std::borrow::Cow;

const COMPARATOR: &str = "string";
const MODES: &[&str] = &["match", "match_any", "regex_match"];

/// Textual form of a scalar; `None` for mappings, lists and null
fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn text_equal(actual: &str, expected: &str, ignore_case: bool) -> bool {
    if ignore_case {
        actual.to_lowercase() == expected.to_lowercase()
    } else {
        actual == expected
    }
}

fn expected_text<'a>(mode: &str, value: &'a Value) -> Result<Cow<'a, str>, ComparatorError> {
    as_text(value).ok_or_else(|| {
        ComparatorError::invalid_rule(COMPARATOR, mode, format!("expected a string, got {}", value))
    })
}

/// Comparator for string values
#[derive(Debug, Default, Clone, Copy)]
pub struct StringComparator;

impl StringComparator {
    pub fn new() -> Self {
        Self
    }
}

impl Comparator for StringComparator {
    fn type_tag(&self) -> &'static str {
        COMPARATOR
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
        log_debug!("Running string comparator", "check_id" => ctx.check_id(), "mode" => mode);

        let expected = rule.require(COMPARATOR, mode)?;
        let ignore_case = rule.ignore_case();
        let text = match as_text(actual) {
            Some(text) => text,
            None => {
                return Ok(Verdict::fail(format!(
                    "string::{} failure. {} is not a string",
                    mode,
                    ctx.render(actual)
                )))
            }
        };

        let passed = match mode {
            "match" => text_equal(&text, &expected_text(mode, expected)?, ignore_case),
            "match_any" => {
                let candidates = expected.as_array().ok_or_else(|| {
                    ComparatorError::invalid_rule(COMPARATOR, mode, "expected a list of strings")
                })?;
                let mut found = false;
                for candidate in candidates {
                    if text_equal(&text, &expected_text(mode, candidate)?, ignore_case) {
                        found = true;
                        break;
                    }
                }
                found
            }
            _ => {
                let pattern = expected_text(mode, expected)?;
                let regex = RegexBuilder::new(&pattern)
                    .case_insensitive(ignore_case)
                    .build()
                    .map_err(|e| ComparatorError::InvalidPattern {
                        pattern: pattern.to_string(),
                        reason: e.to_string(),
                    })?;
                regex.is_match(&text)
            }
        };

        Ok(Verdict::from_bool(passed, || {
            format!(
                "string::{} failure. Expected={} Got={}",
                mode,
                ctx.render(expected),
                ctx.render(actual)
            )
        }))
    }
}
