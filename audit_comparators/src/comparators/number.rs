//! # Number comparator
//!
//! ```yaml
//! comparator:
//!   type: number
//!   match: ">= 10"        # operators: > >= < <= == != (bare value means ==)
//! ```
//!
//! `match_any` takes a list of expressions and passes when any holds.

use super::{Comparator, EvaluationContext};
use crate::error::ComparatorError;
use crate::types::{RuleSpec, Verdict};
use serde_json::Value;
use std::fmt;

const COMPARATOR: &str = "number";
const MODES: &[&str] = &["match", "match_any"];

/// Relational operator of a number expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberOperator {
    Equals,
    NotEqual,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl NumberOperator {
    // Two-character operators first so ">=" is not read as ">"
    const PREFIXES: [(&'static str, NumberOperator); 6] = [
        (">=", NumberOperator::GreaterThanOrEqual),
        ("<=", NumberOperator::LessThanOrEqual),
        ("==", NumberOperator::Equals),
        ("!=", NumberOperator::NotEqual),
        (">", NumberOperator::GreaterThan),
        ("<", NumberOperator::LessThan),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumberOperator::Equals => "==",
            NumberOperator::NotEqual => "!=",
            NumberOperator::GreaterThan => ">",
            NumberOperator::GreaterThanOrEqual => ">=",
            NumberOperator::LessThan => "<",
            NumberOperator::LessThanOrEqual => "<=",
        }
    }

    fn apply(&self, actual: f64, operand: f64) -> bool {
        match self {
            NumberOperator::Equals => actual == operand,
            NumberOperator::NotEqual => actual != operand,
            NumberOperator::GreaterThan => actual > operand,
            NumberOperator::GreaterThanOrEqual => actual >= operand,
            NumberOperator::LessThan => actual < operand,
            NumberOperator::LessThanOrEqual => actual <= operand,
        }
    }
}

/// Parsed comparison such as `>= 10`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberExpression {
    pub operator: NumberOperator,
    pub operand: f64,
}

impl NumberExpression {
    /// Parse from a rule value: a JSON number or an expression string
    pub fn parse(value: &Value) -> Result<Self, ComparatorError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .map(|operand| Self {
                    operator: NumberOperator::Equals,
                    operand,
                })
                .ok_or_else(|| ComparatorError::InvalidExpression {
                    expression: n.to_string(),
                    reason: "number out of range".to_string(),
                }),
            Value::String(text) => Self::parse_str(text),
            other => Err(ComparatorError::InvalidExpression {
                expression: other.to_string(),
                reason: "expected a number or an expression string".to_string(),
            }),
        }
    }

    pub fn parse_str(text: &str) -> Result<Self, ComparatorError> {
        let trimmed = text.trim();
        let (operator, rest) = NumberOperator::PREFIXES
            .iter()
            .find_map(|(prefix, op)| trimmed.strip_prefix(prefix).map(|rest| (*op, rest)))
            .unwrap_or((NumberOperator::Equals, trimmed));

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ComparatorError::InvalidExpression {
                expression: text.to_string(),
                reason: "missing operand".to_string(),
            });
        }

        let operand = rest
            .parse::<f64>()
            .map_err(|e| ComparatorError::InvalidExpression {
                expression: text.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { operator, operand })
    }

    pub fn evaluate(&self, actual: f64) -> bool {
        self.operator.apply(actual, self.operand)
    }
}

impl fmt::Display for NumberExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operand.fract() == 0.0 && self.operand.abs() < 1e15 {
            write!(f, "{} {}", self.operator.as_str(), self.operand as i64)
        } else {
            write!(f, "{} {}", self.operator.as_str(), self.operand)
        }
    }
}

/// Read the actual value as a number (JSON number or numeric string)
fn actual_number(actual: &Value) -> Option<f64> {
    match actual {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Comparator for numeric values
#[derive(Debug, Default, Clone, Copy)]
pub struct NumberComparator;

impl NumberComparator {
    pub fn new() -> Self {
        Self
    }

    fn match_one(
        &self,
        ctx: &EvaluationContext<'_>,
        expected: &Value,
        actual: f64,
        raw_actual: &Value,
    ) -> Result<Verdict, ComparatorError> {
        let expression = NumberExpression::parse(expected)?;
        Ok(Verdict::from_bool(expression.evaluate(actual), || {
            format!(
                "number::match failure. Expected={} Got={}",
                expression,
                ctx.render(raw_actual)
            )
        }))
    }

    fn match_any(
        &self,
        ctx: &EvaluationContext<'_>,
        expected: &Value,
        actual: f64,
        raw_actual: &Value,
    ) -> Result<Verdict, ComparatorError> {
        let candidates = expected.as_array().ok_or_else(|| {
            ComparatorError::invalid_rule(COMPARATOR, "match_any", "expected a list of expressions")
        })?;

        for candidate in candidates {
            if NumberExpression::parse(candidate)?.evaluate(actual) {
                return Ok(Verdict::check_passed());
            }
        }

        Ok(Verdict::fail(format!(
            "number::match_any failure. Expected any of {} Got={}",
            ctx.render(expected),
            ctx.render(raw_actual)
        )))
    }
}

impl Comparator for NumberComparator {
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
        log_debug!("Running number comparator", "check_id" => ctx.check_id(), "mode" => mode);

        let expected = rule.require(COMPARATOR, mode)?;
        let number = match actual_number(actual) {
            Some(number) => number,
            None => {
                return Ok(Verdict::fail(format!(
                    "number::{} failure. {} is not a number",
                    mode,
                    ctx.render(actual)
                )))
            }
        };

        match mode {
            "match" => self.match_one(ctx, expected, number, actual),
            _ => self.match_any(ctx, expected, number, actual),
        }
    }
}
