//! # Audit Comparators - expected-result matching for audit checks
//!
//! A probe collects an actual value from a host (a package list, a service
//! record, a sysctl number). A check's `comparator` rule describes what that
//! value should look like. This crate evaluates the rule against the value and
//! returns a [`Verdict`].
//!
//! ```
//! use audit_comparators::prelude::*;
//! use serde_json::json;
//!
//! let registry = create_default_registry();
//! let rule = json!({"type": "list", "size": ">= 2"});
//! let verdict = registry.run("example", &rule, &json!([1, 2, 3])).unwrap();
//! assert!(verdict.passed());
//! ```

#[macro_use]
pub mod logging;

pub mod comparators;
pub mod config;
pub mod error;
pub mod registry;
pub mod types;

// Convenience re-exports
pub use config::EngineConfig;
pub use error::{ComparatorError, ConfigError};
pub use registry::{create_default_registry, create_registry_with_config, ComparatorRegistry};
pub use types::{Outcome, Verdict};

pub mod prelude {
    pub use crate::comparators::{
        BooleanComparator, Comparator, Dispatch, EvaluationContext, ListComparator,
        MappingComparator, NumberComparator, NumberExpression, StringComparator,
    };

    pub use crate::comparators::list::{KeyMatch, ListRule};
    pub use crate::config::EngineConfig;
    pub use crate::error::{ComparatorError, ConfigError};
    pub use crate::registry::{
        create_default_registry, create_registry_with_config, ComparatorRegistry, RegistryBuilder,
    };
    pub use crate::types::{ElementShape, Outcome, RuleSpec, Verdict};
}
