//! # Boolean comparator
//!
//! ```yaml
//! comparator:
//!   type: boolean
//!   match: true
//! ```

use super::{Comparator, EvaluationContext};
use crate::error::ComparatorError;
use crate::types::{RuleSpec, Verdict};
use serde_json::Value;

const COMPARATOR: &str = "boolean";
const MODES: &[&str] = &["match"];

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

/// Comparator for boolean values
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanComparator;

impl BooleanComparator {
    pub fn new() -> Self {
        Self
    }
}

impl Comparator for BooleanComparator {
    fn type_tag(&self) -> &'static str {
        COMPARATOR
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["bool"]
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
        log_debug!("Running boolean::match", "check_id" => ctx.check_id());

        let raw = rule.require(COMPARATOR, mode)?;
        let expected = as_bool(raw).ok_or_else(|| {
            ComparatorError::invalid_rule(COMPARATOR, mode, format!("expected a boolean, got {}", raw))
        })?;

        Ok(match as_bool(actual) {
            Some(value) => Verdict::from_bool(value == expected, || {
                format!("boolean::match failure. Expected={} Got={}", expected, value)
            }),
            None => Verdict::fail(format!(
                "boolean::match failure. {} is not a boolean",
                ctx.render(actual)
            )),
        })
    }
}
