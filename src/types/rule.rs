//! Access rules granted by the policy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::ty::TypeId;

/// A grant of a permission set from a source type to a target type for
/// one object class.
///
/// Rules are immutable and shared by reference once handed to the
/// analysis. The derived `Ord` is the canonical rule ordering
/// (source name, target name, class, permission set) used wherever
/// record order must be deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccessRule {
    /// Subject type granted the access.
    pub source: TypeId,
    /// Object type the access applies to.
    pub target: TypeId,
    /// Object class the permissions belong to.
    pub class: String,
    /// Granted permissions, in name order.
    pub perms: BTreeSet<String>,
}

impl AccessRule {
    /// Create a new rule.
    pub fn new(
        source: impl Into<TypeId>,
        target: impl Into<TypeId>,
        class: impl Into<String>,
        perms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            class: class.into(),
            perms: perms.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for AccessRule {
    /// Renders the rule as a policy statement,
    /// e.g. `allow node1 node2:infoflow { low_r med_r };`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "allow {} {}:{} ", self.source, self.target, self.class)?;
        if self.perms.len() == 1 {
            // Single permission renders without braces.
            if let Some(perm) = self.perms.iter().next() {
                write!(f, "{}", perm)?;
            }
        } else {
            write!(f, "{{ ")?;
            for perm in &self.perms {
                write!(f, "{} ", perm)?;
            }
            write!(f, "}}")?;
        }
        write!(f, ";")
    }
}
