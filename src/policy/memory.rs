//! In-memory policy for analysis over pre-parsed rules.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::PolicySource;
use crate::types::{AccessRule, TypeId};

/// In-memory policy source.
///
/// Uses BTreeSet for deterministic type lookup; rules enumerate in
/// insertion order (the graph build is order-independent, so any
/// stable order is acceptable).
#[derive(Debug, Clone, Default)]
pub struct MemoryPolicy {
    types: BTreeSet<TypeId>,
    rules: Vec<Arc<AccessRule>>,
}

impl MemoryPolicy {
    /// Create a new empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, returning its id.
    ///
    /// Registering the same name twice is a no-op.
    pub fn add_type(&mut self, name: &str) -> TypeId {
        let ty = TypeId::new(name);
        self.types.insert(ty.clone());
        ty
    }

    /// Add a rule, registering both endpoint types.
    pub fn add_rule(&mut self, rule: AccessRule) -> Arc<AccessRule> {
        self.types.insert(rule.source.clone());
        self.types.insert(rule.target.clone());
        let rule = Arc::new(rule);
        self.rules.push(Arc::clone(&rule));
        rule
    }

    /// Convenience for building allow rules.
    pub fn allow(
        &mut self,
        source: &str,
        target: &str,
        class: &str,
        perms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Arc<AccessRule> {
        self.add_rule(AccessRule::new(source, target, class, perms))
    }

    /// Number of registered types.
    pub fn num_types(&self) -> usize {
        self.types.len()
    }

    /// Number of rules.
    pub fn num_rules(&self) -> usize {
        self.rules.len()
    }
}

impl PolicySource for MemoryPolicy {
    fn lookup_type(&self, name: &str) -> Option<TypeId> {
        self.types.get(name).cloned()
    }

    fn rules(&self) -> Box<dyn Iterator<Item = Arc<AccessRule>> + '_> {
        Box::new(self.rules.iter().cloned())
    }
}
