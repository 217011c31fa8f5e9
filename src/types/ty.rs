//! Security type identity.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Identity of a security type (a domain or label in the policy).
///
/// Wraps the type's name and implements `Ord` so every collection keyed
/// by types iterates in name order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeId(Arc<str>);

impl TypeId {
    /// Create a new TypeId from a type name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Get the type name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeId {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

// Lets BTree collections of TypeId be probed with &str, consistently
// with Ord (both compare the underlying name).
impl Borrow<str> for TypeId {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}
