// src/registry.rs
//! Comparator registry and rule dispatch
//!
//! The registry maps `type` tags (and their aliases) to comparators and
//! implements [`Dispatch`], so nested rules raised by one comparator are
//! routed back through the same table.

use crate::comparators::{
    BooleanComparator, Comparator, Dispatch, EvaluationContext, ListComparator, MappingComparator,
    NumberComparator, StringComparator,
};
use crate::config::EngineConfig;
use crate::error::ComparatorError;
use crate::types::{RuleSpec, Verdict};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Comparator lookup table keyed by `type` tag
pub struct ComparatorRegistry {
    /// Tag and alias entries share one comparator instance
    comparators: HashMap<String, Arc<dyn Comparator>>,

    config: EngineConfig,
}

impl ComparatorRegistry {
    /// Create an empty registry with configuration from the environment
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an empty registry with explicit configuration
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            comparators: HashMap::new(),
            config,
        }
    }

    /// Register a comparator under its tag and every alias
    pub fn register(&mut self, comparator: Box<dyn Comparator>) -> Result<(), ComparatorError> {
        let comparator: Arc<dyn Comparator> = Arc::from(comparator);
        let tags: Vec<&'static str> = std::iter::once(comparator.type_tag())
            .chain(comparator.aliases().iter().copied())
            .collect();

        // Check every tag before inserting any
        if let Some(taken) = tags.iter().find(|tag| self.comparators.contains_key(**tag)) {
            return Err(ComparatorError::DuplicateComparator {
                type_tag: taken.to_string(),
            });
        }

        for tag in tags {
            self.comparators.insert(tag.to_string(), Arc::clone(&comparator));
        }

        log_debug!("Registered comparator",
            "type" => comparator.type_tag(),
            "aliases" => comparator.aliases().join(","),
            "modes" => comparator.modes().join(",")
        );

        Ok(())
    }

    /// Get the comparator for a tag or alias
    pub fn get(&self, type_tag: &str) -> Result<&dyn Comparator, ComparatorError> {
        self.comparators
            .get(type_tag)
            .map(|c| c.as_ref())
            .ok_or_else(|| ComparatorError::UnknownComparator(type_tag.to_string()))
    }

    /// List every registered tag and alias, sorted
    pub fn list_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.comparators.keys().cloned().collect();
        types.sort();
        types
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one rule specification against an actual value
    ///
    /// `check_id` only labels log events and nesting errors.
    pub fn run(
        &self,
        check_id: &str,
        spec: &Value,
        actual: &Value,
    ) -> Result<Verdict, ComparatorError> {
        let ctx = EvaluationContext::new(check_id, self, &self.config);

        match self.dispatch(&ctx, spec, actual) {
            Ok(verdict) => {
                log_debug!("Check evaluated",
                    "check_id" => check_id,
                    "outcome" => verdict.outcome.as_str()
                );
                Ok(verdict)
            }
            Err(e) => {
                log_error!(e.code(), "Rule evaluation failed",
                    "check_id" => check_id,
                    "error" => &e
                );
                Err(e)
            }
        }
    }
}

impl Dispatch for ComparatorRegistry {
    fn dispatch(
        &self,
        ctx: &EvaluationContext<'_>,
        spec: &Value,
        actual: &Value,
    ) -> Result<Verdict, ComparatorError> {
        let rule = RuleSpec::from_value(spec)?;
        let comparator = self.get(rule.type_tag()?)?;
        comparator.compare(ctx, &rule, actual)
    }
}

impl Default for ComparatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("types", &self.list_types())
            .field("config", &self.config)
            .finish()
    }
}

// ============================================================================
// Registry Builder
// ============================================================================

/// Builder for registries with a custom comparator set
pub struct RegistryBuilder {
    registry: ComparatorRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            registry: ComparatorRegistry::new(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.registry.config = config;
        self
    }

    pub fn add_comparator(mut self, comparator: Box<dyn Comparator>) -> Result<Self, ComparatorError> {
        self.registry.register(comparator)?;
        Ok(self)
    }

    /// Add the built-in number, string, boolean, dict and list comparators
    pub fn with_builtin_comparators(self) -> Result<Self, ComparatorError> {
        self.add_comparator(Box::new(NumberComparator::new()))?
            .add_comparator(Box::new(StringComparator::new()))?
            .add_comparator(Box::new(BooleanComparator::new()))?
            .add_comparator(Box::new(MappingComparator::new()))?
            .add_comparator(Box::new(ListComparator::new()))
    }

    pub fn build(self) -> ComparatorRegistry {
        self.registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with every built-in comparator and environment configuration
pub fn create_default_registry() -> ComparatorRegistry {
    create_registry_with_config(EngineConfig::default())
}

/// Registry with every built-in comparator and explicit configuration
pub fn create_registry_with_config(config: EngineConfig) -> ComparatorRegistry {
    match RegistryBuilder::new()
        .with_config(config.clone())
        .with_builtin_comparators()
    {
        Ok(builder) => {
            let registry = builder.build();
            log_info!("Comparator registry ready",
                "types" => registry.list_types().join(","),
                "max_nesting_depth" => registry.config().max_nesting_depth
            );
            registry
        }
        Err(e) => {
            // Built-in tags are distinct; only reachable if that changes
            log_error!(e.code(), "Built-in comparator registration failed", "error" => e);
            ComparatorRegistry::with_config(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Outcome;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_default_registry_types() {
        let registry = create_default_registry();
        assert_eq!(
            registry.list_types(),
            vec!["bool", "boolean", "dict", "list", "mapping", "number", "string"]
        );
        assert!(registry.get("mapping").is_ok());
        assert!(matches!(
            registry.get("regex"),
            Err(ComparatorError::UnknownComparator(t)) if t == "regex"
        ));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = create_default_registry();
        let result = registry.register(Box::new(ListComparator::new()));
        assert_matches!(
            result,
            Err(ComparatorError::DuplicateComparator { type_tag }) if type_tag == "list"
        );
    }

    #[test]
    fn test_duplicate_alias_leaves_registry_unchanged() {
        let mut registry = ComparatorRegistry::with_config(EngineConfig::default());
        registry.register(Box::new(BooleanComparator::new())).unwrap();

        let before = registry.list_types();
        assert!(registry.register(Box::new(BooleanComparator::new())).is_err());
        assert_eq!(registry.list_types(), before);
    }

    #[test]
    fn test_builder() {
        let registry = RegistryBuilder::new()
            .with_config(EngineConfig::default().with_max_nesting_depth(4))
            .add_comparator(Box::new(NumberComparator::new()))
            .unwrap()
            .build();

        assert_eq!(registry.list_types(), vec!["number"]);
        assert_eq!(registry.config().max_nesting_depth, 4);

        let full = RegistryBuilder::new().with_builtin_comparators().unwrap().build();
        assert_eq!(full.list_types().len(), 7);
    }

    #[test]
    fn test_missing_mode_lists_comparator_modes() {
        let registry = create_default_registry();
        for tag in ["number", "string", "bool", "dict", "list"] {
            let modes = registry.get(tag).unwrap().modes().to_vec();
            let result = registry.run("r0", &json!({"type": tag}), &json!(null));
            assert_matches!(result, Err(ComparatorError::MissingRuleKey { expected, .. }) if expected == modes);
        }
    }

    #[test]
    fn test_unknown_type() {
        let registry = create_default_registry();
        let result = registry.run("r1", &json!({"type": "regex", "match": "x"}), &json!("x"));
        assert_matches!(result, Err(ComparatorError::UnknownComparator(t)) if t == "regex");
    }

    #[test]
    fn test_missing_type_key() {
        let registry = create_default_registry();
        let result = registry.run("r2", &json!({"match": 1}), &json!(1));
        assert_matches!(result, Err(ComparatorError::MissingKey { key, .. }) if key == "type");
    }

    #[test]
    fn test_non_mapping_spec() {
        let registry = create_default_registry();
        let result = registry.run("r3", &json!(["type", "list"]), &json!([]));
        assert_matches!(result, Err(ComparatorError::InvalidRule { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let config = EngineConfig::default().with_max_nesting_depth(2);
        let registry = create_registry_with_config(config);

        // list -> filter dict -> number: depth 2
        let shallow = json!({
            "type": "list",
            "filter_compare": {
                "filter": {"n": {"type": "number", "match": "> 0"}},
                "compare": {"match_all": []}
            }
        });
        assert!(registry.run("r4", &shallow, &json!([{"n": 1}])).is_ok());

        // list -> dict -> list -> number: depth 3
        let deep = json!({
            "type": "list",
            "match_all": [{"items": {"type": "list", "size": 1}}]
        });
        let actual = json!([{"items": [1]}]);
        let via_dict = json!({"type": "dict", "match": {"items": {"type": "list", "size": 1}}});
        assert!(registry.run("r4", &via_dict, &json!({"items": [1]})).is_ok());
        assert_matches!(
            registry.run("r4", &deep, &actual),
            Err(ComparatorError::NestingTooDeep { limit: 2, .. })
        );
    }

    #[test]
    fn test_run_reports_outcome() {
        let registry = create_default_registry();
        let verdict = registry
            .run("r5", &json!({"type": "number", "match": "> 5"}), &json!(3))
            .unwrap();
        assert_eq!(verdict.outcome, Outcome::Failed);
    }
}
