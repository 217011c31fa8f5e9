//! Flow results: edge records, steps, and paths.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::rule::AccessRule;
use super::ty::TypeId;

/// One originating rule together with the permission subset through
/// which it contributes to a directed flow edge.
///
/// A rule's write subset and read subset are independent slices of its
/// permission set; when one rule contributes to both directions it
/// appears in two records on two different edges, each restricted to
/// the permissions flowing that way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// The rule justifying the flow.
    pub rule: Arc<AccessRule>,
    /// The subset of the rule's permissions flowing in this direction.
    pub perms: BTreeSet<String>,
}

impl EdgeRecord {
    /// Create a new record.
    pub fn new(rule: Arc<AccessRule>, perms: BTreeSet<String>) -> Self {
        Self { rule, perms }
    }
}

/// A directed flow edge: information can move from `source` to
/// `target`, justified by one or more rules.
///
/// `weight` is the maximum permission weight among all contributing
/// permissions across all records. `records` holds one entry per
/// originating rule, in canonical rule order; distinct rules are never
/// merged into a single representative.
///
/// Query results reuse this type directly: a path step and a one-hop
/// flow are both copies of one filtered-graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Type the information flows out of.
    pub source: TypeId,
    /// Type the information flows into.
    pub target: TypeId,
    /// Maximum contributing permission weight.
    pub weight: u8,
    /// Justifying records, in canonical rule order.
    pub records: Vec<EdgeRecord>,
}

impl FlowEdge {
    pub(crate) fn new(source: TypeId, target: TypeId) -> Self {
        Self {
            source,
            target,
            weight: 0,
            records: Vec::new(),
        }
    }

    /// Append a contributing record and raise the edge weight to the
    /// group's maximum if it exceeds the current one.
    pub(crate) fn push_record(
        &mut self,
        rule: &Arc<AccessRule>,
        perms: BTreeSet<String>,
        weight: u8,
    ) {
        self.records.push(EdgeRecord::new(Arc::clone(rule), perms));
        self.weight = self.weight.max(weight);
    }

    /// Iterate over the rules justifying this edge.
    pub fn rules(&self) -> impl Iterator<Item = &Arc<AccessRule>> {
        self.records.iter().map(|r| &r.rule)
    }
}

/// An information-flow path: ordered steps from a source type to a
/// target type, each step copied from one filtered-graph edge.
pub type Path = Vec<FlowEdge>;
