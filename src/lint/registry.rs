//! Rule registry for header lint rules.
//!
//! The [`RuleRegistry`] stores the header rules in registration order, so
//! rules always run, and report, in the same sequence.

use super::key_order::KeyOrderRule;
use super::rule::{HeaderContext, HeaderRule};
use super::validate::SchemaRule;
use super::Diagnostic;

/// Registry of header lint rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn HeaderRule>>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a registry with all built-in header rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SchemaRule));
        registry.register(Box::new(KeyOrderRule));
        registry
    }

    /// Register a rule. A rule with the same code replaces the earlier one.
    pub fn register(&mut self, rule: Box<dyn HeaderRule>) {
        self.rules.retain(|existing| existing.code() != rule.code());
        self.rules.push(rule);
    }

    /// Iterate over all rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn HeaderRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Run every rule over a header.
    pub fn check(&self, ctx: &HeaderContext<'_>) -> Vec<Diagnostic> {
        self.iter().flat_map(|rule| rule.check(ctx)).collect()
    }

    /// Get the number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
