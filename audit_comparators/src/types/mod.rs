//! Core value types shared by every comparator

pub mod rule_spec;
pub mod shape;
pub mod value;
pub mod verdict;

pub use rule_spec::{is_typed_rule, nested_typed_rule, RuleSpec, IGNORE_CASE_KEY, TYPE_KEY};
pub use shape::{as_integer, ElementShape};
pub use value::{apply_case, case_equal, compare_values, render_value, values_equal};
pub use verdict::{Outcome, Verdict};
