//! Flow graph construction from rules and permission classifications.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::FlowGraph;
use crate::permmap::{PermMapError, PermissionMap};
use crate::types::AccessRule;

/// Error type for graph construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BuildError {
    /// The permission map could not resolve a pairing a rule grants.
    /// This is a configuration fault, fatal to the whole build; no
    /// partial graph is ever returned.
    #[error(transparent)]
    PermMap(#[from] PermMapError),
}

/// Build the full flow graph from an iterator of rules.
///
/// Each rule's permissions are classified by the map and partitioned
/// into a write group (edge source -> target) and a read group (edge
/// target -> source). A `Both` permission joins both groups; an
/// `Unmapped` permission is dropped entirely. Every contributing rule
/// gets its own record on the edge, restricted to the subset flowing
/// that direction, and the edge weight is the maximum contributing
/// permission weight per direction.
///
/// The result is deterministic for identical input regardless of rule
/// enumeration order: adjacency is ordered by type name, weights
/// aggregate by max, and records are sorted canonically once all rules
/// are processed. A self-referential rule needs no special case; it may
/// produce a self-loop edge.
pub fn build_flow_graph<I, M>(rules: I, permmap: &M) -> Result<FlowGraph, BuildError>
where
    I: IntoIterator<Item = Arc<AccessRule>>,
    M: PermissionMap + ?Sized,
{
    let mut graph = FlowGraph::default();
    let mut rule_count = 0usize;

    for rule in rules {
        rule_count += 1;

        let mut write_perms: BTreeSet<String> = BTreeSet::new();
        let mut write_weight = 0u8;
        let mut read_perms: BTreeSet<String> = BTreeSet::new();
        let mut read_weight = 0u8;

        for perm in &rule.perms {
            let entry = permmap.lookup(&rule.class, perm)?;
            if entry.direction.flows_write() {
                write_perms.insert(perm.clone());
                write_weight = write_weight.max(entry.weight);
            }
            if entry.direction.flows_read() {
                read_perms.insert(perm.clone());
                read_weight = read_weight.max(entry.weight);
            }
        }

        if !write_perms.is_empty() {
            graph
                .upsert_edge(&rule.source, &rule.target)
                .push_record(&rule, write_perms, write_weight);
        }
        if !read_perms.is_empty() {
            graph
                .upsert_edge(&rule.target, &rule.source)
                .push_record(&rule, read_perms, read_weight);
        }
    }

    graph.sort_records();

    tracing::debug!(
        rules = rule_count,
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        "flow graph built"
    );

    Ok(graph)
}
