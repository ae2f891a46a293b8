// src/comparators/mod.rs
//! Comparator implementations and the capability traits they share
//!
//! A comparator evaluates one kind of rule (`number`, `string`, `boolean`,
//! `dict`, `list`) against an actual value. Comparators never call each
//! other directly: nested rules go back through [`EvaluationContext::delegate`],
//! which routes them via whatever [`Dispatch`] implementation drives the
//! evaluation (normally [`ComparatorRegistry`](crate::registry::ComparatorRegistry)).

pub mod boolean;
pub mod list;
pub mod mapping;
pub mod number;
pub mod string;

pub use boolean::BooleanComparator;
pub use list::ListComparator;
pub use mapping::MappingComparator;
pub use number::{NumberComparator, NumberExpression};
pub use string::StringComparator;

use crate::config::EngineConfig;
use crate::error::ComparatorError;
use crate::types::{render_value, RuleSpec, Verdict};
use serde_json::Value;

// ============================================================================
// Capability Traits
// ============================================================================

/// Evaluator for one rule type
pub trait Comparator: Send + Sync {
    /// Primary `type` tag this comparator answers to
    fn type_tag(&self) -> &'static str;

    /// Additional tags routed to this comparator
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Mode keys this comparator understands
    fn modes(&self) -> &'static [&'static str];

    /// Evaluate `rule` against `actual`
    fn compare(
        &self,
        ctx: &EvaluationContext<'_>,
        rule: &RuleSpec<'_>,
        actual: &Value,
    ) -> Result<Verdict, ComparatorError>;
}

/// Routes a standalone rule specification to the comparator for its `type`
pub trait Dispatch: Send + Sync {
    fn dispatch(
        &self,
        ctx: &EvaluationContext<'_>,
        spec: &Value,
        actual: &Value,
    ) -> Result<Verdict, ComparatorError>;
}

// ============================================================================
// Evaluation Context
// ============================================================================

/// Per-evaluation state threaded through nested comparisons
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    check_id: &'a str,
    dispatcher: &'a dyn Dispatch,
    config: &'a EngineConfig,
    depth: usize,
}

impl<'a> EvaluationContext<'a> {
    /// Root context for one check
    pub fn new(check_id: &'a str, dispatcher: &'a dyn Dispatch, config: &'a EngineConfig) -> Self {
        Self {
            check_id,
            dispatcher,
            config,
            depth: 0,
        }
    }

    pub fn check_id(&self) -> &'a str {
        self.check_id
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Hand a nested rule specification back to the dispatcher
    pub fn delegate(&self, spec: &Value, actual: &Value) -> Result<Verdict, ComparatorError> {
        let child = Self {
            depth: self.depth + 1,
            ..*self
        };

        if child.depth > self.config.max_nesting_depth {
            return Err(ComparatorError::NestingTooDeep {
                check_id: self.check_id.to_string(),
                limit: self.config.max_nesting_depth,
            });
        }

        self.dispatcher.dispatch(&child, spec, actual)
    }

    /// Render a value for a verdict message within the configured length
    pub fn render(&self, value: &Value) -> String {
        render_value(value, self.config.max_rendered_value_length)
    }
}

impl std::fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("check_id", &self.check_id)
            .field("depth", &self.depth)
            .finish()
    }
}
