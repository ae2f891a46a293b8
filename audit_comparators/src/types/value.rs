//! Helpers over loosely typed JSON values
//!
//! Actual data comes from system probes and rule values from check
//! definitions, so both sides are plain `serde_json::Value`. Equality here is
//! numeric-aware (`1 == 1.0`), which plain `Value` equality is not.

use serde_json::Value;
use std::borrow::Cow;
use std::cmp::Ordering;

/// Lowercase string values when `ignore_case` is set; pass everything else through
pub fn apply_case(value: &Value, ignore_case: bool) -> Cow<'_, Value> {
    match value {
        Value::String(s) if ignore_case => Cow::Owned(Value::String(s.to_lowercase())),
        _ => Cow::Borrowed(value),
    }
}

/// Scalar equality after case normalization of both sides
pub fn case_equal(actual: &Value, expected: &Value, ignore_case: bool) -> bool {
    values_equal(&apply_case(actual, ignore_case), &apply_case(expected, ignore_case))
}

/// Deep equality with numeric comparison across integer/float representations
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(i), Some(j)) => i == j,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, v)| ym.get(k).map_or(false, |other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total ordering over JSON values
///
/// Values of different kinds order by kind (null < bool < number < string <
/// array < object). Objects compare by their key-sorted entries, so the order
/// is consistent with [`values_equal`].
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i.cmp(&j),
            _ => {
                let (fx, fy) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
                fx.partial_cmp(&fy).unwrap_or(Ordering::Equal)
            }
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(xs), Value::Array(ys)) => {
            for (x, y) in xs.iter().zip(ys) {
                match compare_values(x, y) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            xs.len().cmp(&ys.len())
        }
        (Value::Object(xm), Value::Object(ym)) => {
            let mut xe: Vec<_> = xm.iter().collect();
            let mut ye: Vec<_> = ym.iter().collect();
            xe.sort_by(|l, r| l.0.cmp(r.0));
            ye.sort_by(|l, r| l.0.cmp(r.0));
            for ((xk, xv), (yk, yv)) in xe.iter().zip(&ye) {
                match xk.cmp(yk).then_with(|| compare_values(xv, yv)) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            xe.len().cmp(&ye.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compact JSON rendering for diagnostics, truncated to `max_len` characters
pub fn render_value(value: &Value, max_len: usize) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    };

    if rendered.chars().count() <= max_len {
        return rendered;
    }

    let mut truncated: String = rendered.chars().take(max_len).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn apply_case_only_touches_strings() {
        assert_eq!(*apply_case(&json!("ABC"), true), json!("abc"));
        assert_eq!(*apply_case(&json!("ABC"), false), json!("ABC"));
        assert_eq!(*apply_case(&json!(10), true), json!(10));
    }

    #[test]
    fn numbers_compare_across_representations() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(values_equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
    }

    #[test]
    fn object_equality_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"name": "abc", "running": false}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"running": false, "name": "abc"}"#).unwrap();
        assert!(values_equal(&a, &b));
        assert_eq!(compare_values(&a, &b), Ordering::Equal);
    }

    #[test]
    fn ordering_ranks_kinds_then_values() {
        assert_eq!(compare_values(&json!(null), &json!(false)), Ordering::Less);
        assert_eq!(compare_values(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(compare_values(&json!(2.5), &json!(2)), Ordering::Greater);
        assert_eq!(compare_values(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(compare_values(&json!([1, 2]), &json!([1])), Ordering::Greater);
        assert_eq!(compare_values(&json!(99), &json!("1")), Ordering::Less);
    }

    #[test]
    fn render_truncates_long_values() {
        let value = json!(["aaaaaaaaaa", "bbbbbbbbbb"]);
        assert_eq!(render_value(&value, 1000), r#"["aaaaaaaaaa","bbbbbbbbbb"]"#);
        assert_eq!(render_value(&value, 5), r#"["aaa..."#);
        assert_eq!(render_value(&json!("plain"), 100), "plain");
    }
}
