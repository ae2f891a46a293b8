//! Parsed list rules
//!
//! The raw rule is inspected once, here, and turned into a [`ListRule`]
//! variant. Handlers then switch on the variant instead of probing keys.

use crate::error::ComparatorError;
use crate::types::RuleSpec;
use serde_json::{Map, Value};

pub(super) const COMPARATOR: &str = "list";

pub const SIZE: &str = "size";
pub const MATCH: &str = "match";
pub const MATCH_ANY: &str = "match_any";
pub const MATCH_ALL: &str = "match_all";
pub const MATCH_ANY_IF_KEYVALUE_MATCHES: &str = "match_any_if_keyvalue_matches";
pub const FILTER_COMPARE: &str = "filter_compare";

/// Every list mode, in documentation order
pub const MODES: &[&str] = &[
    SIZE,
    MATCH,
    MATCH_ANY,
    MATCH_ALL,
    MATCH_ANY_IF_KEYVALUE_MATCHES,
    FILTER_COMPARE,
];

/// One list rule with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum ListRule<'a> {
    /// Number expression applied to the sequence length
    Size(&'a Value),
    /// Order-insensitive exact match against this sequence
    Match(&'a [Value]),
    /// Some actual element satisfies some pattern
    MatchAny(&'a [Value]),
    /// Every pattern is satisfied by some actual element
    MatchAll(&'a [Value]),
    /// Compare attributes only for elements whose `match_key` value is named in `args`
    MatchAnyIfKeyValueMatches {
        match_key: &'a str,
        args: Vec<&'a Map<String, Value>>,
    },
    /// Keep elements matching `filter`, then evaluate `compare` on what is left
    FilterCompare {
        filter: &'a Map<String, Value>,
        compare: &'a Map<String, Value>,
    },
}

impl<'a> ListRule<'a> {
    pub fn mode(&self) -> &'static str {
        match self {
            ListRule::Size(_) => SIZE,
            ListRule::Match(_) => MATCH,
            ListRule::MatchAny(_) => MATCH_ANY,
            ListRule::MatchAll(_) => MATCH_ALL,
            ListRule::MatchAnyIfKeyValueMatches { .. } => MATCH_ANY_IF_KEYVALUE_MATCHES,
            ListRule::FilterCompare { .. } => FILTER_COMPARE,
        }
    }

    /// Parse the single list mode present in `rule`
    pub fn parse(rule: &RuleSpec<'a>) -> Result<Self, ComparatorError> {
        let mode = rule.select_mode(COMPARATOR, MODES)?;
        let payload = rule.require(COMPARATOR, mode)?;

        match mode {
            SIZE => Ok(ListRule::Size(payload)),
            MATCH => Ok(ListRule::Match(sequence(mode, payload)?)),
            MATCH_ANY => Ok(ListRule::MatchAny(sequence(mode, payload)?)),
            MATCH_ALL => Ok(ListRule::MatchAll(sequence(mode, payload)?)),
            MATCH_ANY_IF_KEYVALUE_MATCHES => parse_keyvalue(payload),
            _ => parse_filter_compare(payload),
        }
    }
}

fn sequence<'a>(mode: &str, payload: &'a Value) -> Result<&'a [Value], ComparatorError> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| ComparatorError::invalid_rule(COMPARATOR, mode, "expected a list"))
}

fn mapping<'a>(
    mode: &str,
    what: &str,
    value: &'a Value,
) -> Result<&'a Map<String, Value>, ComparatorError> {
    value.as_object().ok_or_else(|| {
        ComparatorError::invalid_rule(
            COMPARATOR,
            mode,
            format!("'{}' must be a mapping, got {}", what, value),
        )
    })
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
) -> Result<&'a Value, ComparatorError> {
    fields.get(key).ok_or_else(|| ComparatorError::MissingKey {
        comparator: COMPARATOR.to_string(),
        key: key.to_string(),
    })
}

fn parse_keyvalue(payload: &Value) -> Result<ListRule<'_>, ComparatorError> {
    let mode = MATCH_ANY_IF_KEYVALUE_MATCHES;
    let fields = mapping(mode, mode, payload)?;

    let match_key = required(fields, "match_key")?.as_str().ok_or_else(|| {
        ComparatorError::invalid_rule(COMPARATOR, mode, "'match_key' must be a string")
    })?;

    let args = sequence(mode, required(fields, "args")?)?
        .iter()
        .map(|arg| mapping(mode, "args entry", arg))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ListRule::MatchAnyIfKeyValueMatches { match_key, args })
}

fn parse_filter_compare(payload: &Value) -> Result<ListRule<'_>, ComparatorError> {
    let mode = FILTER_COMPARE;
    let fields = mapping(mode, mode, payload)?;

    Ok(ListRule::FilterCompare {
        filter: mapping(mode, "filter", required(fields, "filter")?)?,
        compare: mapping(mode, "compare", required(fields, "compare")?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn parse(value: &Value) -> Result<ListRule<'_>, ComparatorError> {
        ListRule::parse(&RuleSpec::from_value(value).unwrap())
    }

    #[test]
    fn parses_each_mode() {
        let size = json!({"type": "list", "size": ">= 2"});
        assert_eq!(parse(&size).unwrap(), ListRule::Size(&json!(">= 2")));

        let exact = json!({"type": "list", "match": [1, 2]});
        assert_eq!(parse(&exact).unwrap().mode(), MATCH);

        let any = json!({"type": "list", "match_any": ["a"]});
        assert_matches!(parse(&any).unwrap(), ListRule::MatchAny(p) if p.len() == 1);

        let all = json!({"type": "list", "match_all": []});
        assert_matches!(parse(&all).unwrap(), ListRule::MatchAll(p) if p.is_empty());

        let keyvalue = json!({
            "type": "list",
            "match_any_if_keyvalue_matches": {"match_key": "name", "args": [{"name": "abc"}]}
        });
        assert_matches!(
            parse(&keyvalue).unwrap(),
            ListRule::MatchAnyIfKeyValueMatches { match_key: "name", args } if args.len() == 1
        );

        let filter = json!({
            "type": "list",
            "filter_compare": {"filter": {"name": "abc"}, "compare": {"size": 1}}
        });
        assert_eq!(parse(&filter).unwrap().mode(), FILTER_COMPARE);
    }

    #[test]
    fn missing_match_key_is_a_missing_key_error() {
        let value = json!({
            "type": "list",
            "match_any_if_keyvalue_matches": {"args": [{"name": "abc"}]}
        });
        assert_matches!(parse(&value), Err(ComparatorError::MissingKey { key, .. }) if key == "match_key");
    }

    #[test]
    fn missing_filter_is_a_missing_key_error() {
        let value = json!({"type": "list", "filter_compare": {"compare": {"size": 1}}});
        assert_matches!(parse(&value), Err(ComparatorError::MissingKey { key, .. }) if key == "filter");
    }

    #[test]
    fn two_modes_are_ambiguous() {
        let value = json!({"type": "list", "size": 1, "match_any": [1]});
        assert_matches!(parse(&value), Err(ComparatorError::AmbiguousRule { .. }));
    }

    #[test]
    fn no_mode_is_rejected() {
        let value = json!({"type": "list", "ignore_case": true});
        assert_matches!(parse(&value), Err(ComparatorError::MissingRuleKey { .. }));
    }

    #[test]
    fn non_list_payload_is_invalid() {
        let value = json!({"type": "list", "match": "abc"});
        assert_matches!(parse(&value), Err(ComparatorError::InvalidRule { .. }));
    }
}
