// src/comparators/list/mod.rs
//! # List comparator
//!
//! Matches a sequence produced by a probe (package lists, service records,
//! mount entries, ...) against an expected-result rule. Exactly one mode key
//! selects the matching semantics:
//!
//! - `size`: number expression on the sequence length
//!   ```yaml
//!   comparator:
//!     type: list
//!     size: ">= 10"
//!   ```
//! - `match`: order-insensitive exact match against the given sequence
//! - `match_any`: some element satisfies some pattern
//! - `match_all`: every pattern is satisfied by some element
//! - `match_any_if_keyvalue_matches`: compare attributes only for elements
//!   whose `match_key` value is named in `args`. Passes when the named
//!   entity is absent or matches; fails when it is present and mismatches.
//!   ```yaml
//!   comparator:
//!     type: list
//!     match_any_if_keyvalue_matches:
//!       match_key: name
//!       args:
//!         - name: rsync
//!           running: false
//!   ```
//! - `filter_compare`: keep elements matching a dict filter, then evaluate
//!   a nested list rule on the remainder
//!   ```yaml
//!   comparator:
//!     type: list
//!     filter_compare:
//!       filter:
//!         name: abc
//!         offset:
//!           type: number
//!           match: <= 15
//!       compare:
//!         size: ">= 4"
//!   ```
//!
//! Patterns inside `match_any`/`match_all` may be `{field: {type: ..., ...}}`
//! mappings; the inner rule is evaluated as a standalone rule against the
//! element. `ignore_case` applies to string equality in the pattern modes.

mod matching;
pub mod rule;

pub use matching::KeyMatch;
pub use rule::ListRule;

use super::{Comparator, EvaluationContext};
use crate::error::ComparatorError;
use crate::types::{RuleSpec, Verdict};
use serde_json::Value;

/// Comparator for sequences
#[derive(Debug, Default, Clone, Copy)]
pub struct ListComparator;

impl ListComparator {
    pub fn new() -> Self {
        Self
    }
}

impl Comparator for ListComparator {
    fn type_tag(&self) -> &'static str {
        rule::COMPARATOR
    }

    fn modes(&self) -> &'static [&'static str] {
        rule::MODES
    }

    fn compare(
        &self,
        ctx: &EvaluationContext<'_>,
        spec: &RuleSpec<'_>,
        actual: &Value,
    ) -> Result<Verdict, ComparatorError> {
        let list_rule = ListRule::parse(spec)?;
        let mode = list_rule.mode();
        log_debug!("Running list comparator",
            "check_id" => ctx.check_id(),
            "mode" => mode,
            "depth" => ctx.depth()
        );

        let items = match actual.as_array() {
            Some(items) => items,
            None => {
                log_debug!("Actual value is not a list",
                    "check_id" => ctx.check_id(),
                    "code" => crate::logging::codes::SHAPE_MISMATCH
                );
                return Ok(Verdict::fail(format!(
                    "list::{} failure. {} is not an instance of list",
                    mode,
                    ctx.render(actual)
                )));
            }
        };

        matching::evaluate(ctx, &list_rule, spec.ignore_case(), actual, items)
    }
}
