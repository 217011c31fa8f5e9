//! Policy collaborators: type resolution and rule enumeration.
//!
//! Parsing policy source is out of scope; the analysis consumes any
//! [`PolicySource`] supplied at construction. [`MemoryPolicy`] is the
//! in-memory implementation for pre-parsed rule sets and tests.

pub mod memory;

pub use memory::MemoryPolicy;

use std::sync::Arc;

use crate::types::{AccessRule, TypeId};

/// Source of policy data for the analysis.
///
/// Implementations must enumerate rules in a deterministic order.
pub trait PolicySource {
    /// Resolve a type name. `None` when the name is unknown to the
    /// policy; the analysis surfaces that as an unknown-type fault.
    fn lookup_type(&self, name: &str) -> Option<TypeId>;

    /// Enumerate all access rules, lazily.
    fn rules(&self) -> Box<dyn Iterator<Item = Arc<AccessRule>> + '_>;
}
