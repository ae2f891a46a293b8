//! List rule handlers
//!
//! Each handler receives the actual sequence and delegates element-level
//! comparisons to sibling comparators through [`EvaluationContext::delegate`].

use super::rule::ListRule;
use crate::comparators::{EvaluationContext, NumberExpression};
use crate::error::ComparatorError;
use crate::types::{
    case_equal, compare_values, nested_typed_rule, values_equal, ElementShape, Outcome, Verdict,
    TYPE_KEY,
};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;

/// Run the handler for `rule` over `items` (`actual` is the same sequence, for messages)
pub(super) fn evaluate(
    ctx: &EvaluationContext<'_>,
    rule: &ListRule<'_>,
    ignore_case: bool,
    actual: &Value,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    match rule {
        ListRule::Size(expression) => size(ctx, expression, items),
        ListRule::Match(expected) => match_exact(ctx, expected, actual, items),
        ListRule::MatchAny(patterns) => match_any(ctx, patterns, ignore_case, actual, items),
        ListRule::MatchAll(patterns) => match_all(ctx, patterns, ignore_case, actual, items),
        ListRule::MatchAnyIfKeyValueMatches { match_key, args } => {
            match_any_if_keyvalue_matches(ctx, match_key, args, ignore_case, actual, items)
        }
        ListRule::FilterCompare { filter, compare } => filter_compare(ctx, filter, compare, items),
    }
}

// ============================================================================
// Delegation helpers
// ============================================================================

/// Number delegation where a non-numeric pattern simply counts as "no match"
fn delegate_number(
    ctx: &EvaluationContext<'_>,
    spec: &Value,
    number: i64,
) -> Result<bool, ComparatorError> {
    match ctx.delegate(spec, &json!(number)) {
        Ok(verdict) => Ok(verdict.passed()),
        Err(ComparatorError::InvalidExpression { expression, .. }) => {
            log_debug!("Pattern is not a number expression", "check_id" => ctx.check_id(), "pattern" => expression);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn dict_rule(mode: &str, expected: Value, ignore_case: bool) -> Value {
    json!({TYPE_KEY: "dict", mode: expected, "ignore_case": ignore_case})
}

/// Scalar element against one pattern: typed sub-rule, or case-normalized equality
fn scalar_satisfies(
    ctx: &EvaluationContext<'_>,
    item: &Value,
    pattern: &Value,
    ignore_case: bool,
) -> Result<bool, ComparatorError> {
    if let Some(nested) = nested_typed_rule(pattern) {
        return Ok(ctx.delegate(nested, item)?.passed());
    }
    if pattern.is_object() {
        return Ok(false);
    }
    Ok(case_equal(item, pattern, ignore_case))
}

// ============================================================================
// size
// ============================================================================

fn size(
    ctx: &EvaluationContext<'_>,
    expression: &Value,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    let spec = json!({TYPE_KEY: "number", "match": expression});
    let verdict = ctx.delegate(&spec, &json!(items.len()))?;

    Ok(Verdict::from_bool(verdict.passed(), || {
        format!(
            "list::size failure. Expected={} Got={}",
            ctx.render(expression),
            items.len()
        )
    }))
}

// ============================================================================
// match
// ============================================================================

/// Sort a copy of `items`, by `key` first when the elements are mappings
fn sorted_copy(items: &[Value], key: Option<&str>) -> Vec<Value> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let by_key = match key {
            Some(key) => compare_values(
                a.get(key).unwrap_or(&Value::Null),
                b.get(key).unwrap_or(&Value::Null),
            ),
            None => Ordering::Equal,
        };
        by_key.then_with(|| compare_values(a, b))
    });
    sorted
}

fn match_exact(
    ctx: &EvaluationContext<'_>,
    expected: &[Value],
    actual: &Value,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    if items.is_empty() {
        log_debug!("Empty list received in list::match", "check_id" => ctx.check_id());
        return Ok(Verdict::fail(format!(
            "list::match failure. {} is not a non-empty list",
            ctx.render(actual)
        )));
    }

    let first = ElementShape::classify(&items[0]);

    // Only the first elements are compared on this path; a pass here skips
    // the full comparison.
    if let (ElementShape::Numeric(number), Some(expected_first)) = (first, expected.first()) {
        let spec = json!({TYPE_KEY: "number", "match": expected_first});
        if delegate_number(ctx, &spec, number)? {
            return Ok(Verdict::check_passed());
        }
    }

    let sort_key = match first {
        ElementShape::Mapping(map) => map.keys().next().map(String::as_str),
        _ => None,
    };

    let actual_sorted = sorted_copy(items, sort_key);
    let expected_sorted = sorted_copy(expected, sort_key);

    let equal = actual_sorted.len() == expected_sorted.len()
        && actual_sorted
            .iter()
            .zip(&expected_sorted)
            .all(|(a, e)| values_equal(a, e));

    Ok(Verdict::from_bool(equal, || {
        format!("list::match failure. Got={}", ctx.render(actual))
    }))
}

// ============================================================================
// match_any
// ============================================================================

fn match_any(
    ctx: &EvaluationContext<'_>,
    patterns: &[Value],
    ignore_case: bool,
    actual: &Value,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    let mapping_patterns: Vec<Value> = patterns.iter().filter(|p| p.is_object()).cloned().collect();
    let number_patterns: Vec<Value> = patterns
        .iter()
        .filter(|p| NumberExpression::parse(p).is_ok())
        .cloned()
        .collect();
    let has_mapping_patterns = !mapping_patterns.is_empty();
    let has_number_patterns = !number_patterns.is_empty();
    let dict_any = dict_rule("match_any", Value::Array(mapping_patterns), ignore_case);
    let number_any = json!({TYPE_KEY: "number", "match_any": number_patterns});

    for item in items {
        match ElementShape::classify(item) {
            ElementShape::Mapping(_) => {
                if has_mapping_patterns && ctx.delegate(&dict_any, item)?.passed() {
                    return Ok(Verdict::check_passed());
                }
                continue;
            }
            ElementShape::Numeric(number) => {
                if has_number_patterns && delegate_number(ctx, &number_any, number)? {
                    return Ok(Verdict::check_passed());
                }
            }
            ElementShape::Scalar(_) => {}
        }

        for pattern in patterns {
            if scalar_satisfies(ctx, item, pattern, ignore_case)? {
                return Ok(Verdict::check_passed());
            }
        }
    }

    Ok(Verdict::fail(format!(
        "list::match_any failure. Got={}",
        ctx.render(actual)
    )))
}

// ============================================================================
// match_all
// ============================================================================

fn element_satisfies(
    ctx: &EvaluationContext<'_>,
    item: &Value,
    pattern: &Value,
    ignore_case: bool,
) -> Result<bool, ComparatorError> {
    match ElementShape::classify(item) {
        ElementShape::Mapping(_) => {
            if !pattern.is_object() {
                return Ok(false);
            }
            let spec = dict_rule("match", pattern.clone(), ignore_case);
            Ok(ctx.delegate(&spec, item)?.passed())
        }
        ElementShape::Numeric(_) | ElementShape::Scalar(_) => {
            scalar_satisfies(ctx, item, pattern, ignore_case)
        }
    }
}

fn match_all(
    ctx: &EvaluationContext<'_>,
    patterns: &[Value],
    ignore_case: bool,
    actual: &Value,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    for pattern in patterns {
        let mut found = false;
        for item in items {
            if element_satisfies(ctx, item, pattern, ignore_case)? {
                found = true;
                break;
            }
        }

        if !found {
            return Ok(Verdict::fail(format!(
                "list::match_all failure. No element satisfies {}. Got={}",
                ctx.render(pattern),
                ctx.render(actual)
            )));
        }
    }

    Ok(Verdict::check_passed())
}

// ============================================================================
// match_any_if_keyvalue_matches
// ============================================================================

/// Aggregate state of a keyed scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// An element carrying the key value matched all expected attributes
    Matched,
    /// The key value was found but its attributes never matched
    Mismatched,
    /// No element carried any of the expected key values
    KeyAbsent,
}

fn scan_keyvalue(
    ctx: &EvaluationContext<'_>,
    match_key: &str,
    args: &[&Map<String, Value>],
    ignore_case: bool,
    items: &[Value],
) -> Result<KeyMatch, ComparatorError> {
    let mut mismatched = false;

    for item in items {
        let fields = match ElementShape::classify(item) {
            ElementShape::Mapping(fields) => fields,
            _ => continue,
        };
        let key_value = match fields.get(match_key) {
            Some(value) => value,
            None => continue,
        };

        for arg in args {
            match arg.get(match_key) {
                Some(expected) if values_equal(key_value, expected) => {}
                _ => continue,
            }

            let spec = dict_rule("match", Value::Object((*arg).clone()), ignore_case);
            match ctx.delegate(&spec, item)?.outcome {
                Outcome::Passed => return Ok(KeyMatch::Matched),
                Outcome::Failed => mismatched = true,
                // The built-in dict comparator never yields this; other dispatchers may
                Outcome::NotApplicable => {}
            }
        }
    }

    Ok(if mismatched {
        KeyMatch::Mismatched
    } else {
        KeyMatch::KeyAbsent
    })
}

fn match_any_if_keyvalue_matches(
    ctx: &EvaluationContext<'_>,
    match_key: &str,
    args: &[&Map<String, Value>],
    ignore_case: bool,
    actual: &Value,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    Ok(match scan_keyvalue(ctx, match_key, args, ignore_case, items)? {
        KeyMatch::Matched => Verdict::check_passed(),
        KeyMatch::Mismatched => Verdict::fail(format!(
            "list::match_any_if_keyvalue_matches failure. Got={}",
            ctx.render(actual)
        )),
        KeyMatch::KeyAbsent => Verdict::not_applicable(format!(
            "Check Passed. No element with a matching '{}' value",
            match_key
        )),
    })
}

// ============================================================================
// filter_compare
// ============================================================================

fn filter_compare(
    ctx: &EvaluationContext<'_>,
    filter: &Map<String, Value>,
    compare: &Map<String, Value>,
    items: &[Value],
) -> Result<Verdict, ComparatorError> {
    let filter_rule = json!({TYPE_KEY: "dict", "match": filter});

    let mut filtered = Vec::new();
    for item in items {
        if ctx.delegate(&filter_rule, item)?.passed() {
            filtered.push(item.clone());
        }
    }

    log_debug!("list::filter_compare filtered elements",
        "check_id" => ctx.check_id(),
        "kept" => filtered.len(),
        "total" => items.len()
    );

    let mut nested = Map::new();
    nested.insert(TYPE_KEY.to_string(), Value::String("list".to_string()));
    for (key, value) in compare {
        nested.insert(key.clone(), value.clone());
    }

    ctx.delegate(&Value::Object(nested), &Value::Array(filtered))
}
