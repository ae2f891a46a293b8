//! Element shape classification
//!
//! Probe output mixes scalars, numeric-looking strings and attribute mappings
//! in the same sequence. Handlers classify each element once and branch on
//! the result.

use serde_json::{Map, Value};

/// Shape of one element of an actual sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementShape<'a> {
    /// Integer, integral float, or string holding an integer
    Numeric(i64),
    /// Attribute set
    Mapping(&'a Map<String, Value>),
    /// Anything else: text, booleans, fractional numbers, null, nested lists
    Scalar(&'a Value),
}

impl<'a> ElementShape<'a> {
    pub fn classify(value: &'a Value) -> Self {
        if let Some(number) = as_integer(value) {
            return ElementShape::Numeric(number);
        }
        match value {
            Value::Object(map) => ElementShape::Mapping(map),
            other => ElementShape::Scalar(other),
        }
    }
}

/// Interpret a value as an integer when it unambiguously holds one
///
/// Failure to coerce is not an error; it only means the value is not numeric.
pub fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
